//! Error type shared by every Slack call and the operator output.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{method}: response is not valid JSON: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{method} failed: {error}")]
    Api { method: &'static str, error: String },
    #[error("{method}: unexpected response shape: {reason}")]
    MalformedResponse {
        method: &'static str,
        reason: String,
    },
}

impl Error {
    #[must_use]
    pub fn malformed(method: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            method,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
