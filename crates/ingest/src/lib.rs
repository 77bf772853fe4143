//! Communication parser infrastructure adapter.
//!
//! Implements [`pipeline::CommunicationParser`] for the four supported
//! communication formats:
//!
//! | Type | Format |
//! |------|--------|
//! | `team_meeting` | `Speaker: text` lines; `Time:` lines ignored |
//! | `all_hands` | same as `team_meeting` |
//! | `leadership_email` | `From:` / `Subject:` header blocks followed by body lines |
//! | `slack_channel` | JSON array of `{ "user", "text", "ts", "thread_ts" }` messages |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Format details live here; the [`pipeline`] crate sees
//! only [`pipeline::Segment`]s. Normalization is the Preprocess stage's job,
//! so segments are returned with their text as found.

mod detect;
mod email;
mod signals;
mod slack;
mod transcript;

use pipeline::{CommunicationParser, CommunicationType, ParseError, Segment};
use tracing::debug;

pub use detect::detect_communication_type;
pub use signals::LeadershipTitles;

/// Default parser for transcripts, email threads, and Slack exports.
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser {
    titles: LeadershipTitles,
}

impl TranscriptParser {
    /// Creates a parser with the default leadership title list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `titles` to decide which speakers are leaders.
    pub fn with_titles(mut self, titles: LeadershipTitles) -> Self {
        self.titles = titles;
        self
    }
}

impl CommunicationParser for TranscriptParser {
    fn parse(
        &self,
        raw_text: &str,
        communication_type: CommunicationType,
    ) -> Result<Vec<Segment>, ParseError> {
        if raw_text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let segments = match communication_type {
            CommunicationType::TeamMeeting | CommunicationType::AllHands => {
                transcript::parse(raw_text, communication_type, &self.titles)
            }
            CommunicationType::LeadershipEmail => email::parse(raw_text, &self.titles)?,
            CommunicationType::SlackChannel => slack::parse(raw_text, &self.titles)?,
        };

        debug!(
            communication_type = %communication_type,
            segments = segments.len(),
            "Parsed communication record"
        );
        Ok(segments)
    }

    fn detect_type(&self, raw_text: &str) -> CommunicationType {
        detect_communication_type(raw_text)
    }
}
