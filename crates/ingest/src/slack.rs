//! Slack channel exports.

use pipeline::{CommunicationType, ParseError, Segment, SpeakerName};
use serde::Deserialize;

use crate::signals::{signals_for, LeadershipTitles};

/// One exported message. Exports carry many more fields; they are ignored.
#[derive(Debug, Deserialize)]
struct SlackMessage {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    thread_ts: Option<String>,
}

impl SlackMessage {
    fn is_thread_reply(&self) -> bool {
        matches!((&self.thread_ts, &self.ts), (Some(thread), Some(ts)) if thread != ts)
    }
}

/// Parses a JSON export. Anything that is not a JSON array of message
/// objects is rejected rather than reinterpreted as a transcript.
pub(crate) fn parse(raw_text: &str, titles: &LeadershipTitles) -> Result<Vec<Segment>, ParseError> {
    let messages: Vec<SlackMessage> =
        serde_json::from_str(raw_text).map_err(|e| ParseError::UnsupportedFormat {
            communication_type: CommunicationType::SlackChannel.to_string(),
            reason: format!("not a JSON message array: {e}"),
        })?;

    Ok(messages
        .into_iter()
        .map(|message| {
            let user = message.user.clone().unwrap_or_default();
            let text = message.text.clone().unwrap_or_default();
            let segment = Segment::new(CommunicationType::SlackChannel, text.as_str())
                .with_speaker(SpeakerName::new(user.as_str()))
                .with_signals(signals_for(&user, &text, titles));
            if message.is_thread_reply() {
                segment.with_subject(format!("thread {}", message.thread_ts.unwrap_or_default()))
            } else {
                segment
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_messages_and_marks_thread_replies() {
        let raw = r#"[
            {"user": "U01", "text": "Deploy is blocked, can someone look?", "ts": "1.0"},
            {"user": "U02", "text": "On it", "ts": "2.0", "thread_ts": "1.0", "reactions": []},
            {"text": "bot message", "ts": "3.0"}
        ]"#;

        let segments = parse(raw, &LeadershipTitles::default()).unwrap();

        assert_eq!(segments.len(), 3);
        assert!(segments[0].signals.has_question);
        assert!(segments[0].subject.is_none());
        assert_eq!(segments[1].subject.as_deref(), Some("thread 1.0"));
        assert!(segments[2].speaker.is_none());
        assert!(segments.iter().all(|s| s.source == CommunicationType::SlackChannel));
    }

    #[test]
    fn non_json_input_is_unsupported() {
        let err = parse("alice: hello", &LeadershipTitles::default()).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat { .. }));
    }

    #[test]
    fn json_that_is_not_an_array_is_unsupported() {
        assert!(parse(r#"{"user": "U01"}"#, &LeadershipTitles::default()).is_err());
    }
}
