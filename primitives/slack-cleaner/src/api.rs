//! Thin client for the three Slack web API methods the cleaner calls.
//!
//! Every call is a GET with the token passed as the `token` query
//! parameter. Bodies are decoded into the typed pages below; semantic
//! checks (`ok:false`, missing collections) are left to the callers so
//! each can decide whether the outcome is fatal.

use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    config::{
        CHANNEL_LIMIT, CHANNEL_METHOD, CHANNEL_TYPES, CleanerConfig, DELETE_METHOD,
        HISTORY_METHOD,
    },
    error::{Error, Result},
};

/// Pagination block shared by the cursor-paginated methods.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Channel as returned by `conversations.list`.
#[derive(Debug, Deserialize)]
pub struct RawChannel {
    pub id: String,
    /// Absent for direct messages.
    #[serde(default)]
    pub name: Option<String>,
}

/// One `conversations.list` page.
#[derive(Debug, Deserialize)]
pub struct ChannelPage {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub channels: Option<Vec<RawChannel>>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// Message as returned by `conversations.history`.
#[derive(Debug, Deserialize)]
pub struct RawMessage {
    /// Missing for bot and some system messages.
    #[serde(default)]
    pub user: Option<String>,
    pub ts: String,
}

/// One `conversations.history` page.
#[derive(Debug, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<RawMessage>>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// Result of a single `chat.delete` call.
#[derive(Debug, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DeleteResponse {
    /// Only an explicit `"ok": true` counts as a deletion.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.ok == Some(true)
    }
}

/// Returns the continuation cursor when the page announces a further page.
fn next_cursor(metadata: Option<&ResponseMetadata>) -> Option<&str> {
    metadata
        .and_then(|m| m.next_cursor.as_deref())
        .filter(|c| !c.is_empty())
}

impl ChannelPage {
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        next_cursor(self.response_metadata.as_ref())
    }
}

impl HistoryPage {
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        next_cursor(self.response_metadata.as_ref())
    }
}

/// Authenticated handle on the Slack web API.
pub struct SlackClient {
    http: Client,
    token: String,
    config: CleanerConfig,
}

impl SlackClient {
    /// Builds a client. No request timeout is configured.
    pub fn new(token: impl Into<String>, config: CleanerConfig) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            token: token.into(),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Issues a GET against `method` and decodes the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        query.push(("token", self.token.as_str()));
        query.extend_from_slice(params);

        let response = self
            .http
            .get(self.config.method_url(method))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(method, %status, bytes = body.len(), "slack api response");

        serde_json::from_str(&body).map_err(|source| Error::Decode { method, source })
    }

    /// Fetches one page of `conversations.list`.
    pub async fn conversations_list(&self, cursor: Option<&str>) -> Result<ChannelPage> {
        let limit = CHANNEL_LIMIT.to_string();
        let mut params = vec![("limit", limit.as_str()), ("types", CHANNEL_TYPES)];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }
        self.get(CHANNEL_METHOD, &params).await
    }

    /// Fetches one page of `conversations.history` for `channel`.
    pub async fn conversations_history(
        &self,
        channel: &str,
        cursor: Option<&str>,
    ) -> Result<HistoryPage> {
        let mut params = vec![("channel", channel)];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }
        self.get(HISTORY_METHOD, &params).await
    }

    /// Deletes the message identified by `ts` from `channel`.
    pub async fn chat_delete(&self, channel: &str, ts: &str) -> Result<DeleteResponse> {
        self.get(DELETE_METHOD, &[("channel", channel), ("ts", ts)])
            .await
    }
}
