use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{ChannelInfoSink, ConversationApi, ConversationPage};
use crate::constants::{FETCH_COMMAND_CAPACITY, FETCH_EVENT_CAPACITY};

use super::{FetchActorHandle, FetchCommand, FetchEvent, PageRequest};

/// Spawn the fetch actor and return a handle to control it.
/// Each request runs as its own task, so tabs never wait on each other.
pub fn spawn_fetch_actor(
    api: Arc<dyn ConversationApi>,
    sink: Arc<dyn ChannelInfoSink>,
) -> FetchActorHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(FETCH_COMMAND_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(FETCH_EVENT_CAPACITY);

    tokio::spawn(fetch_actor(api, sink, cmd_rx, event_tx));

    FetchActorHandle { cmd_tx, event_rx }
}

async fn fetch_actor(
    api: Arc<dyn ConversationApi>,
    sink: Arc<dyn ChannelInfoSink>,
    mut cmd_rx: mpsc::Receiver<FetchCommand>,
    event_tx: mpsc::Sender<FetchEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            FetchCommand::Page(request) => {
                tokio::spawn(run_page_request(
                    Arc::clone(&api),
                    Arc::clone(&sink),
                    request,
                    event_tx.clone(),
                ));
            }
            FetchCommand::WaitingCount => {
                let api = Arc::clone(&api);
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let result = api.fetch_waiting_count().await;
                    if let Err(e) = event_tx.send(FetchEvent::WaitingCountFetched(result)).await {
                        tracing::debug!("Failed to send WaitingCountFetched event: {}", e);
                    }
                });
            }
            FetchCommand::Shutdown => {
                tracing::info!("Fetch actor shutting down");
                break;
            }
        }
    }
}

async fn run_page_request(
    api: Arc<dyn ConversationApi>,
    sink: Arc<dyn ChannelInfoSink>,
    request: PageRequest,
    event_tx: mpsc::Sender<FetchEvent>,
) {
    tracing::debug!(
        "Fetching {} page (ticket={}, offset={}, size={})",
        request.tab(),
        request.ticket,
        request.query.offset,
        request.query.page_size
    );

    let mut result = api.fetch_conversations(&request.query).await;
    if let Ok(ref mut page) = result {
        forward_channel_infos(sink.as_ref(), page);
    }

    if let Err(e) = event_tx
        .send(FetchEvent::PageFetched { request, result })
        .await
    {
        tracing::debug!("Failed to send PageFetched event: {}", e);
    }
}

/// Hand the page's channel sidecar to the sink. Failures are logged only;
/// they never fail the conversation fetch.
fn forward_channel_infos(sink: &dyn ChannelInfoSink, page: &mut ConversationPage) {
    let channels = std::mem::take(&mut page.channels);
    if channels.is_empty() {
        return;
    }
    let count = channels.len();
    match sink.store(channels) {
        Ok(()) => tracing::debug!("Forwarded {} channel infos", count),
        Err(e) => tracing::warn!("Dropping {} channel infos: {}", count, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::PageKind;
    use crate::api::PageQuery;
    use crate::cache::ChannelInfoStore;
    use crate::conversation::{ChannelIdentity, Tab};
    use crate::test_utils::{FailingSink, FakeApi, page_of, record};

    fn request(tab: Tab, ticket: u64) -> PageRequest {
        PageRequest {
            ticket,
            kind: PageKind::Initial,
            query: PageQuery {
                tab,
                page_size: 20,
                offset: 0,
                only_recently_completed: false,
            },
        }
    }

    #[tokio::test]
    async fn test_page_fetch_forwards_channel_infos() {
        let api = Arc::new(FakeApi::default());
        api.set_pages(Tab::Mine, vec![page_of(vec![record("a", 100, "hi")], false)]);
        let store = Arc::new(ChannelInfoStore::default());

        let mut handle = spawn_fetch_actor(api.clone(), store.clone());
        handle
            .cmd_tx
            .send(FetchCommand::Page(request(Tab::Mine, 7)))
            .await
            .unwrap();

        match handle.event_rx.recv().await.unwrap() {
            FetchEvent::PageFetched { request, result } => {
                assert_eq!(request.ticket, 7);
                let page = result.unwrap();
                assert_eq!(page.records.len(), 1);
                assert!(page.channels.is_empty());
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(store.get(&ChannelIdentity::new("a", 5)).is_some());
        assert_eq!(api.page_calls(Tab::Mine), 1);
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_fetch() {
        let api = Arc::new(FakeApi::default());
        api.set_pages(Tab::All, vec![page_of(vec![record("a", 100, "hi")], true)]);

        let mut handle = spawn_fetch_actor(api, Arc::new(FailingSink));
        handle
            .cmd_tx
            .send(FetchCommand::Page(request(Tab::All, 1)))
            .await
            .unwrap();

        match handle.event_rx.recv().await.unwrap() {
            FetchEvent::PageFetched { result, .. } => assert!(result.unwrap().has_more),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_waiting_count_round_trip() {
        let api = Arc::new(FakeApi::default());
        api.set_waiting_count(Ok(12));

        let mut handle = spawn_fetch_actor(api, Arc::new(ChannelInfoStore::default()));
        handle.cmd_tx.send(FetchCommand::WaitingCount).await.unwrap();

        match handle.event_rx.recv().await.unwrap() {
            FetchEvent::WaitingCountFetched(result) => assert_eq!(result, Ok(12)),
            other => panic!("unexpected event: {:?}", other),
        }
        handle.shutdown().await;
    }
}
