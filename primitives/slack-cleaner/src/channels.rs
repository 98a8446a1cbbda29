//! Conversation listing.

use std::io::Write;

use tracing::{debug, info};

use crate::{
    api::SlackClient,
    config::CHANNEL_METHOD,
    error::{Error, Result},
};

/// A conversation visible to the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: Option<String>,
}

/// Lists every private channel, group DM and DM the token can see.
///
/// Follows `next_cursor` until the listing is exhausted, keeping API order.
pub async fn list_channels(client: &SlackClient) -> Result<Vec<Channel>> {
    let mut channels = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = client.conversations_list(cursor.as_deref()).await?;
        pages += 1;

        if page.ok == Some(false) {
            return Err(Error::Api {
                method: CHANNEL_METHOD,
                error: page.error.unwrap_or_else(|| "unknown".to_string()),
            });
        }

        let next = page.next_cursor().map(ToOwned::to_owned);
        let batch = page
            .channels
            .ok_or_else(|| Error::malformed(CHANNEL_METHOD, "missing `channels`"))?;
        debug!(page = pages, count = batch.len(), "channel page");

        channels.extend(batch.into_iter().map(|c| Channel {
            id: c.id,
            name: c.name,
        }));

        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!(pages, channels = channels.len(), "listed channels");
    Ok(channels)
}

/// Writes one `id: <id>, name: <name>` line per channel, `-` standing in
/// for a missing name.
pub fn write_channels<W: Write>(channels: &[Channel], out: &mut W) -> Result<()> {
    for channel in channels {
        writeln!(
            out,
            "id: {}, name: {}",
            channel.id,
            channel.name.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}
