//! REST client for the conversation backend

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::conversation::{Tab, normalize_channel_info_values, normalize_conversation_values};

use super::{ConversationApi, ConversationPage, FetchError, PageQuery};

/// Entries stay untyped here and are decoded one by one, so a single bad
/// entry cannot fail the page.
#[derive(Deserialize)]
struct PageResponse {
    #[serde(default)]
    conversations: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    channels: Vec<Value>,
}

#[derive(Deserialize)]
struct CountResponse {
    count: u32,
}

/// [`ConversationApi`] over HTTP + JSON
#[derive(Clone)]
pub struct HttpConversationApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpConversationApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn conversations_url(&self, tab: Tab) -> String {
        format!("{}/conversations/{}", self.base_url, tab.as_str())
    }

    fn waiting_count_url(&self) -> String {
        format!("{}/conversations/waiting-count", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

/// Query parameters for a page request.
fn page_params(query: &PageQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", query.page_size.to_string()),
        ("offset", query.offset.to_string()),
    ];
    if query.tab == Tab::All {
        params.push((
            "only_recently_completed",
            query.only_recently_completed.to_string(),
        ));
    }
    params
}

fn decode_page(body: &str) -> Result<ConversationPage, FetchError> {
    let page: PageResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(ConversationPage {
        records: normalize_conversation_values(page.conversations),
        has_more: page.has_more,
        channels: normalize_channel_info_values(page.channels),
    })
}

#[async_trait]
impl ConversationApi for HttpConversationApi {
    async fn fetch_conversations(&self, query: &PageQuery) -> Result<ConversationPage, FetchError> {
        let request = self
            .client
            .get(self.conversations_url(query.tab))
            .query(&page_params(query));

        let body = self
            .send(request)
            .await?
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        decode_page(&body)
    }

    async fn fetch_waiting_count(&self) -> Result<u32, FetchError> {
        let response = self.send(self.client.get(self.waiting_count_url())).await?;
        let count: CountResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(count.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ChannelIdentity;

    fn api() -> HttpConversationApi {
        HttpConversationApi::new(&ApiConfig {
            base_url: "https://support.example.com/v1/".to_string(),
            token: None,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let api = api();
        assert_eq!(
            api.conversations_url(Tab::Unassigned),
            "https://support.example.com/v1/conversations/unassigned"
        );
        assert_eq!(
            api.waiting_count_url(),
            "https://support.example.com/v1/conversations/waiting-count"
        );
    }

    #[test]
    fn test_recently_completed_flag_only_for_all_tab() {
        let mut query = PageQuery {
            tab: Tab::Mine,
            page_size: 20,
            offset: 40,
            only_recently_completed: true,
        };
        let params = page_params(&query);
        assert_eq!(params.len(), 2);
        assert!(params.contains(&("offset", "40".to_string())));

        query.tab = Tab::All;
        let params = page_params(&query);
        assert!(params.contains(&("only_recently_completed", "true".to_string())));
    }

    #[test]
    fn test_decode_page_skips_malformed_entries() {
        let body = r#"{
            "conversations": [
                {"channel_id": "v1", "channel_type": 5, "last_message": "hi", "timestamp": 100},
                {"channel_type": 5, "last_message": "no id"}
            ],
            "has_more": true,
            "channels": [{"channel_id": "v1", "channel_type": 5, "name": "Ada"}]
        }"#;

        let page = decode_page(body).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].identity, ChannelIdentity::new("v1", 5));
        assert!(page.has_more);
        assert_eq!(page.channels[0].name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_decode_page_keeps_valid_records_beside_badly_typed_ones() {
        for bad in [
            r#"{"channel_id": "v2", "channel_type": 5, "unread": -1}"#,
            r#"{"channel_id": "v2", "channel_type": 300}"#,
            r#"{"channel_id": 42, "channel_type": 5}"#,
        ] {
            let body = format!(
                r#"{{"conversations": [
                    {{"channel_id": "v1", "channel_type": 5, "last_message": "hi"}},
                    {}
                ], "has_more": false}}"#,
                bad
            );
            let page = decode_page(&body).unwrap();
            assert_eq!(page.records.len(), 1, "body: {}", body);
            assert_eq!(page.records[0].identity, ChannelIdentity::new("v1", 5));
        }
    }

    #[test]
    fn test_decode_page_rejects_garbage() {
        assert!(matches!(decode_page("<html>"), Err(FetchError::Decode(_))));
    }
}
