//! Slack Cleaner - Bulk Message Removal
//!
//! Lists the conversations a token can see and removes every message a
//! given user posted in one of them.
//!
//! The pipeline is strictly sequential:
//!
//! 1. [`history::message_metadata`] walks `conversations.history` page by page.
//! 2. [`filter::user_timestamps`] keeps the timestamps authored by the target user.
//! 3. [`deleter::delete_user_messages`] issues one `chat.delete` per timestamp,
//!    pausing a fixed delay after each attempt.
//!
//! [`channels::list_channels`] backs the listing mode used to discover
//! channel ids.

pub mod api;
pub mod channels;
pub mod config;
pub mod deleter;
pub mod error;
pub mod filter;
pub mod history;

pub use {
    api::SlackClient,
    channels::{Channel, list_channels},
    config::CleanerConfig,
    deleter::{DeletionTally, delete_user_messages},
    error::{Error, Result},
    filter::user_timestamps,
    history::{MessageMetadatum, message_metadata},
};
