//! Message history pagination.

use tracing::debug;

use crate::{
    api::SlackClient,
    config::HISTORY_METHOD,
    error::{Error, Result},
};

/// Author and timestamp of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMetadatum {
    /// `None` for messages without a human author, such as bot posts.
    pub user: Option<String>,
    pub timestamp: String,
}

/// Collects author and timestamp for every message in `channel`.
///
/// Pages are appended in the order Slack returns them. An `ok:false` page or
/// one without `messages` aborts the walk; nothing partial is returned.
pub async fn message_metadata(
    client: &SlackClient,
    channel: &str,
) -> Result<Vec<MessageMetadatum>> {
    let mut metadata = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = client
            .conversations_history(channel, cursor.as_deref())
            .await?;
        pages += 1;

        if page.ok == Some(false) {
            return Err(Error::Api {
                method: HISTORY_METHOD,
                error: page.error.unwrap_or_else(|| "unknown".to_string()),
            });
        }

        let next = page.next_cursor().map(ToOwned::to_owned);
        let messages = page
            .messages
            .ok_or_else(|| Error::malformed(HISTORY_METHOD, "missing `messages`"))?;
        debug!(channel, page = pages, count = messages.len(), "history page");

        metadata.extend(messages.into_iter().map(|m| MessageMetadatum {
            user: m.user,
            timestamp: m.ts,
        }));

        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(channel, pages, messages = metadata.len(), "history exhausted");
    Ok(metadata)
}
