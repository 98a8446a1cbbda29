//! Slack Cleaner - Bulk Message Removal CLI
//!
//! Lists conversations, or deletes every message a user posted in one.
//!
//! # Usage
//!
//! ```bash
//! # List private channels, group DMs and DMs with their ids
//! slack-cleaner xoxp-123
//!
//! # Delete every message U0123 posted in G0456
//! slack-cleaner xoxp-123 G0456 U0123
//!
//! # Token from the environment (listing only)
//! SLACK_CLEANER_TOKEN=xoxp-123 slack-cleaner
//! ```
//!
//! Operator output goes to stdout; logs go to stderr.

use std::{io::Write, time::Duration};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use slack_cleaner::{
    CleanerConfig, SlackClient,
    channels::write_channels,
    config::{DEFAULT_DELETE_DELAY_SECS, SLACK_API_BASE},
    delete_user_messages, list_channels,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Lists Slack conversations or bulk-deletes a user's messages from one.
#[derive(Parser, Debug)]
#[command(name = "slack-cleaner")]
#[command(about = "Lists Slack channels or deletes a user's messages from one")]
struct Args {
    /// Slack user token.
    #[arg(env = "SLACK_CLEANER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Channel to clean up (requires USER_ID).
    channel_id: Option<String>,

    /// User whose messages are deleted.
    user_id: Option<String>,

    /// Anything past USER_ID; only ever leads to the usage text.
    #[arg(hide = true, num_args = 0..)]
    extra: Vec<String>,

    /// Base URL of the Slack web API.
    #[arg(long, env = "SLACK_CLEANER_API_BASE", default_value = SLACK_API_BASE)]
    api_base: String,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// What a given argument shape asks for.
#[derive(Debug, PartialEq, Eq)]
enum Mode<'a> {
    List {
        token: &'a str,
    },
    Delete {
        token: &'a str,
        channel: &'a str,
        user: &'a str,
    },
    Usage,
}

impl Args {
    fn mode(&self) -> Mode<'_> {
        if !self.extra.is_empty() {
            return Mode::Usage;
        }
        match (
            self.token.as_deref(),
            self.channel_id.as_deref(),
            self.user_id.as_deref(),
        ) {
            (Some(token), None, None) => Mode::List { token },
            (Some(token), Some(channel), Some(user)) => Mode::Delete {
                token,
                channel,
                user,
            },
            _ => Mode::Usage,
        }
    }

    fn config(&self) -> CleanerConfig {
        CleanerConfig::new(
            self.api_base.clone(),
            Duration::from_secs(DEFAULT_DELETE_DELAY_SECS),
        )
    }
}

/// Logs go to stderr so stdout stays the operator's record of the run.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut stdout = std::io::stdout().lock();

    match args.mode() {
        Mode::List { token } => {
            let client = SlackClient::new(token, args.config())?;
            let channels = list_channels(&client)
                .await
                .context("failed to list channels")?;
            write_channels(&channels, &mut stdout)?;
        }
        Mode::Delete {
            token,
            channel,
            user,
        } => {
            let client = SlackClient::new(token, args.config())?;
            info!(channel, user, "starting cleanup");
            let tally = delete_user_messages(&client, channel, user, &mut stdout)
                .await
                .with_context(|| format!("failed to clean up channel {channel}"))?;
            writeln!(stdout, "{tally}")?;
        }
        Mode::Usage => {
            Args::command().print_help()?;
        }
    }

    Ok(())
}
