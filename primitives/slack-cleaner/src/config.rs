//! Fixed Slack endpoints and limits, plus the per-run configuration.

use std::time::Duration;

/// Base URL of the Slack web API.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Channel listing method.
pub const CHANNEL_METHOD: &str = "conversations.list";

/// Message history method.
pub const HISTORY_METHOD: &str = "conversations.history";

/// Message deletion method.
pub const DELETE_METHOD: &str = "chat.delete";

/// Page size requested from `conversations.list`.
pub const CHANNEL_LIMIT: u32 = 999;

/// Conversation types requested from `conversations.list`.
///
/// Public channels are left out on purpose.
pub const CHANNEL_TYPES: &str = "private_channel,mpim,im";

/// Pause after every delete attempt, in seconds.
pub const DEFAULT_DELETE_DELAY_SECS: u64 = 3;

/// Settings for one invocation. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanerConfig {
    /// Base URL every method name is appended to.
    pub api_base: String,
    /// Pause after each `chat.delete` call.
    pub delete_delay: Duration,
}

impl CleanerConfig {
    #[must_use]
    pub fn new(api_base: impl Into<String>, delete_delay: Duration) -> Self {
        Self {
            api_base: api_base.into(),
            delete_delay,
        }
    }

    /// Returns the full URL of a web API method.
    #[must_use]
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base.trim_end_matches('/'))
    }
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self::new(
            SLACK_API_BASE,
            Duration::from_secs(DEFAULT_DELETE_DELAY_SECS),
        )
    }
}
