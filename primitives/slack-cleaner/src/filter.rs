//! Author filtering.

use std::io::Write;

use crate::{error::Result, history::MessageMetadatum};

/// Returns the timestamps of the messages `user` authored, in input order.
///
/// Writes the scanned and matched counts to `out` so the operator sees them
/// before anything is deleted.
pub fn user_timestamps<W: Write>(
    metadata: &[MessageMetadatum],
    user: &str,
    out: &mut W,
) -> Result<Vec<String>> {
    let timestamps: Vec<String> = metadata
        .iter()
        .filter(|m| m.user.as_deref() == Some(user))
        .map(|m| m.timestamp.clone())
        .collect();

    writeln!(
        out,
        "Found {} messages, {} for specified user.",
        metadata.len(),
        timestamps.len()
    )?;

    Ok(timestamps)
}
