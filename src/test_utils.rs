use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::actor::spawn_fetch_actor;
use crate::api::{
    ChannelInfoSink, ConversationApi, ConversationPage, FetchError, PageQuery, SinkError,
};
use crate::app::Console;
use crate::cache::{ChannelInfoStore, RealtimeCache};
use crate::config::SyncConfig;
use crate::conversation::{ChannelIdentity, ChannelInfo, ConversationRecord, Tab};

pub fn record(id: &str, ts: i64, msg: &str) -> ConversationRecord {
    ConversationRecord {
        last_message_text: msg.to_string(),
        last_message_at: ts,
        ..ConversationRecord::new(ChannelIdentity::new(id, 5))
    }
}

pub fn identity(id: &str) -> ChannelIdentity {
    ChannelIdentity::new(id, 5)
}

/// Page whose channel sidecar mirrors its records.
pub fn page_of(records: Vec<ConversationRecord>, has_more: bool) -> ConversationPage {
    let channels = records
        .iter()
        .map(|r| ChannelInfo {
            identity: r.identity.clone(),
            name: Some(format!("name-{}", r.identity.channel_id)),
            avatar: None,
            extra: Default::default(),
        })
        .collect();
    ConversationPage {
        records,
        has_more,
        channels,
    }
}

/// Console wired to `api` through a real fetch actor, page size 2.
/// Must be called inside a tokio runtime.
pub fn console(api: Arc<FakeApi>) -> Console {
    let fetcher = spawn_fetch_actor(api, Arc::new(ChannelInfoStore::default()));
    Console::new(
        SyncConfig {
            page_size: 2,
            only_recently_completed: true,
        },
        Arc::new(RealtimeCache::default()),
        fetcher,
    )
}

/// In-memory [`ConversationApi`] with scripted responses and call counting.
/// While held, page requests park until released.
#[derive(Default)]
pub struct FakeApi {
    pages: Mutex<HashMap<Tab, VecDeque<Result<ConversationPage, FetchError>>>>,
    queries: Mutex<Vec<PageQuery>>,
    page_calls: [AtomicUsize; 3],
    waiting: Mutex<Option<Result<u32, FetchError>>>,
    waiting_calls: AtomicUsize,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeApi {
    pub fn set_pages(&self, tab: Tab, pages: Vec<ConversationPage>) {
        self.pages
            .lock()
            .unwrap()
            .insert(tab, pages.into_iter().map(Ok).collect());
    }

    pub fn push_result(&self, tab: Tab, result: Result<ConversationPage, FetchError>) {
        self.pages
            .lock()
            .unwrap()
            .entry(tab)
            .or_default()
            .push_back(result);
    }

    pub fn set_waiting_count(&self, result: Result<u32, FetchError>) {
        *self.waiting.lock().unwrap() = Some(result);
    }

    pub fn page_calls(&self, tab: Tab) -> usize {
        self.page_calls[tab.index()].load(Ordering::SeqCst)
    }

    pub fn waiting_calls(&self) -> usize {
        self.waiting_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<PageQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Park page requests until [`FakeApi::release`] is called.
    pub fn hold(&self) {
        *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self, requests: usize) {
        if let Some(gate) = self.gate.lock().unwrap().as_ref() {
            gate.add_permits(requests);
        }
    }
}

#[async_trait]
impl ConversationApi for FakeApi {
    async fn fetch_conversations(&self, query: &PageQuery) -> Result<ConversationPage, FetchError> {
        self.page_calls[query.tab.index()].fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }

        self.pages
            .lock()
            .unwrap()
            .get_mut(&query.tab)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Ok(ConversationPage::default()))
    }

    async fn fetch_waiting_count(&self) -> Result<u32, FetchError> {
        self.waiting_calls.fetch_add(1, Ordering::SeqCst);
        self.waiting.lock().unwrap().clone().unwrap_or(Ok(0))
    }
}

pub struct FailingSink;

impl ChannelInfoSink for FailingSink {
    fn store(&self, _infos: Vec<ChannelInfo>) -> Result<(), SinkError> {
        Err(SinkError("sidebar cache offline".to_string()))
    }
}
