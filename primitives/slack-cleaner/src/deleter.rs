//! Sequential bulk deletion.
//!
//! Runs `Fetching -> Filtering -> Deleting(i) -> Done` once, never
//! revisiting an earlier phase. Every delete attempt is followed by the same
//! fixed pause regardless of its outcome; that pause is the only rate-limit
//! handling there is.

use std::{fmt, io::Write};

use tracing::{debug, info, warn};

use crate::{
    api::SlackClient, error::Result, filter::user_timestamps, history::message_metadata,
};

/// Printed when a failed delete carries no `error` field.
const BAD_RESPONSE: &str = "Bad response.";

/// Outcome counts for a deletion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeletionTally {
    pub success: usize,
    pub failure: usize,
}

impl fmt::Display for DeletionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deleted {} successfully and failed to delete {}.",
            self.success, self.failure
        )
    }
}

/// Removes every message `user` posted in `channel`.
///
/// Writes the filter counts and the error string of each failed delete to
/// `out`. History and transport errors abort the run; a refused delete is
/// counted and the run continues.
pub async fn delete_user_messages<W: Write>(
    client: &SlackClient,
    channel: &str,
    user: &str,
    out: &mut W,
) -> Result<DeletionTally> {
    info!(channel, user, "fetching history");
    let metadata = message_metadata(client, channel).await?;

    info!(channel, messages = metadata.len(), "filtering");
    let timestamps = user_timestamps(&metadata, user, out)?;

    delete_timestamps(client, channel, &timestamps, out).await
}

/// Issues one `chat.delete` per timestamp, in order, against `channel`.
///
/// A transport or decode failure ends the run after the partial tally is
/// written to `out`.
pub async fn delete_timestamps<W: Write>(
    client: &SlackClient,
    channel: &str,
    timestamps: &[String],
    out: &mut W,
) -> Result<DeletionTally> {
    let delay = client.config().delete_delay;
    let mut tally = DeletionTally::default();

    for (i, ts) in timestamps.iter().enumerate() {
        debug!(channel, ts = %ts, index = i, total = timestamps.len(), "deleting");
        let response = match client.chat_delete(channel, ts).await {
            Ok(response) => response,
            Err(e) => {
                writeln!(out, "Stopped early. {tally}")?;
                return Err(e);
            }
        };

        if response.is_ok() {
            tally.success += 1;
        } else {
            tally.failure += 1;
            let error = response.error.as_deref().unwrap_or(BAD_RESPONSE);
            warn!(channel, ts = %ts, error, "delete failed");
            writeln!(out, "{error}")?;
        }

        tokio::time::sleep(delay).await;
    }

    info!(
        channel,
        success = tally.success,
        failure = tally.failure,
        "done"
    );
    Ok(tally)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::config::CleanerConfig,
        mockito::{Matcher, Mock, Server},
        serde_json::json,
        std::time::{Duration, Instant},
    };

    fn client_with_delay(server: &Server, delay: Duration) -> SlackClient {
        SlackClient::new("xoxp-test", CleanerConfig::new(server.url(), delay)).unwrap()
    }

    fn client_for(server: &Server) -> SlackClient {
        client_with_delay(server, Duration::ZERO)
    }

    async fn mock_delete(server: &mut Server, ts: &str, body: &str) -> Mock {
        server
            .mock("GET", "/chat.delete")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("channel".into(), "C1".into()),
                Matcher::UrlEncoded("ts".into(), ts.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }

    async fn mock_history(server: &mut Server, messages: serde_json::Value) -> Mock {
        server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::UrlEncoded("channel".into(), "C1".into()))
            .with_status(200)
            .with_body(json!({ "ok": true, "messages": messages }).to_string())
            .create_async()
            .await
    }

    #[tokio::test]
    async fn one_refusal_does_not_stop_the_run() {
        let mut server = Server::new_async().await;
        let first = mock_delete(&mut server, "1", r#"{"ok":true}"#).await;
        let second = mock_delete(&mut server, "2", r#"{"ok":false,"error":"not_found"}"#).await;
        let third = mock_delete(&mut server, "3", r#"{"ok":true}"#).await;
        let timestamps = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let mut out = Vec::new();

        let tally = delete_timestamps(&client_for(&server), "C1", &timestamps, &mut out)
            .await
            .unwrap();

        assert_eq!(tally, DeletionTally {
            success: 2,
            failure: 1,
        });
        assert_eq!(String::from_utf8(out).unwrap(), "not_found\n");
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn missing_ok_counts_as_failure_with_generic_message() {
        let mut server = Server::new_async().await;
        let _mock = mock_delete(&mut server, "1", r#"{"warning":"odd"}"#).await;
        let mut out = Vec::new();

        let tally = delete_timestamps(&client_for(&server), "C1", &["1".to_string()], &mut out)
            .await
            .unwrap();

        assert_eq!(tally, DeletionTally {
            success: 0,
            failure: 1,
        });
        assert_eq!(String::from_utf8(out).unwrap(), "Bad response.\n");
    }

    #[tokio::test]
    async fn pauses_after_every_attempt() {
        let mut server = Server::new_async().await;
        let _ok = mock_delete(&mut server, "1", r#"{"ok":true}"#).await;
        let _refused = mock_delete(&mut server, "2", r#"{"ok":false,"error":"ratelimited"}"#).await;
        let client = client_with_delay(&server, Duration::from_millis(50));
        let timestamps = vec!["1".to_string(), "2".to_string()];
        let mut out = Vec::new();

        let started = Instant::now();
        let tally = delete_timestamps(&client, "C1", &timestamps, &mut out)
            .await
            .unwrap();

        assert_eq!(tally.success + tally.failure, 2);
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn deletes_only_the_target_users_messages() {
        let mut server = Server::new_async().await;
        let _history = mock_history(
            &mut server,
            json!([
                { "user": "U1", "ts": "1" },
                { "user": "U2", "ts": "2" },
                { "user": "U1", "ts": "3" }
            ]),
        )
        .await;
        let first = mock_delete(&mut server, "1", r#"{"ok":true}"#).await;
        let third = mock_delete(&mut server, "3", r#"{"ok":true}"#).await;
        let untouched = server
            .mock("GET", "/chat.delete")
            .match_query(Matcher::UrlEncoded("ts".into(), "2".into()))
            .expect(0)
            .create_async()
            .await;
        let mut out = Vec::new();

        let tally = delete_user_messages(&client_for(&server), "C1", "U1", &mut out)
            .await
            .unwrap();

        assert_eq!(tally, DeletionTally {
            success: 2,
            failure: 0,
        });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Found 3 messages, 2 for specified user.\n"
        );
        first.assert_async().await;
        third.assert_async().await;
        untouched.assert_async().await;
    }

    #[tokio::test]
    async fn rerun_after_cleanup_is_a_no_op() {
        let mut server = Server::new_async().await;
        let _history = mock_history(&mut server, json!([{ "user": "U2", "ts": "2" }])).await;
        let deletes = server
            .mock("GET", "/chat.delete")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let mut out = Vec::new();

        let tally = delete_user_messages(&client_for(&server), "C1", "U1", &mut out)
            .await
            .unwrap();

        assert_eq!(tally, DeletionTally::default());
        deletes.assert_async().await;
    }

    #[tokio::test]
    async fn transport_failure_reports_partial_tally() {
        let mut server = Server::new_async().await;
        let _ok = mock_delete(&mut server, "1", r#"{"ok":true}"#).await;
        let broken = server
            .mock("GET", "/chat.delete")
            .match_query(Matcher::UrlEncoded("ts".into(), "2".into()))
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .expect(1)
            .create_async()
            .await;
        let never = server
            .mock("GET", "/chat.delete")
            .match_query(Matcher::UrlEncoded("ts".into(), "3".into()))
            .expect(0)
            .create_async()
            .await;
        let timestamps = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let mut out = Vec::new();

        let err = delete_timestamps(&client_for(&server), "C1", &timestamps, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, crate::Error::Decode {
            method: "chat.delete",
            ..
        }));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Stopped early. Deleted 1 successfully and failed to delete 0.\n"
        );
        broken.assert_async().await;
        never.assert_async().await;
    }

    #[test]
    fn tally_renders_summary_line() {
        let tally = DeletionTally {
            success: 4,
            failure: 1,
        };
        assert_eq!(
            tally.to_string(),
            "Deleted 4 successfully and failed to delete 1."
        );
    }
}
