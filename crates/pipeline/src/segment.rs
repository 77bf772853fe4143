//! Communication records and the canonical segments parsed from them.

use serde::{Deserialize, Serialize};

use crate::identifiers::SpeakerName;
use crate::types::CommunicationType;

/// One raw input record: a block of text and the type it was declared as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationRecord {
    /// Declared communication type of the whole block.
    pub communication_type: CommunicationType,
    /// The raw text, exactly as collected.
    pub text: String,
}

impl CommunicationRecord {
    /// Creates a new record.
    pub fn new(communication_type: CommunicationType, text: impl Into<String>) -> Self {
        Self {
            communication_type,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------

/// Lightweight signals a parser extracts per segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSignals {
    /// The author holds a leadership title.
    pub is_leadership: bool,
    /// The text asks at least one question.
    pub has_question: bool,
    /// The text records a decision or action item.
    pub has_decision: bool,
    /// Urgency of the surrounding message, `0` (none) to `3` (critical).
    pub urgency_level: u8,
    /// Emotional tone markers in the text.
    #[serde(default)]
    pub tone: ToneIndicators,
}

/// Tone markers a parser detects in a segment body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneIndicators {
    /// Disappointment, concern, or frustration words.
    pub negative_emotion: bool,
    /// Enthusiasm or praise words.
    pub positive_emotion: bool,
    /// More than a tenth of the characters are uppercase.
    pub high_intensity: bool,
    /// More than two exclamation marks.
    pub emphatic: bool,
}

impl ToneIndicators {
    /// Names of the markers that are set, in declaration order.
    pub fn labels(&self) -> Vec<&'static str> {
        [
            (self.negative_emotion, "negative_emotion"),
            (self.positive_emotion, "positive_emotion"),
            (self.high_intensity, "high_intensity"),
            (self.emphatic, "emphatic"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }
}

/// A canonical unit of communication text, tagged with its source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// The communication type this segment was parsed from.
    pub source: CommunicationType,
    /// Author, when the source format names one.
    pub speaker: Option<SpeakerName>,
    /// Email subject or thread label, when present.
    pub subject: Option<String>,
    /// The segment body.
    pub text: String,
    /// Parser-extracted signals.
    pub signals: SegmentSignals,
}

impl Segment {
    /// Creates a segment with no speaker, subject, or signals.
    pub fn new(source: CommunicationType, text: impl Into<String>) -> Self {
        Self {
            source,
            speaker: None,
            subject: None,
            text: text.into(),
            signals: SegmentSignals::default(),
        }
    }

    /// Sets the speaker.
    pub fn with_speaker(mut self, speaker: Option<SpeakerName>) -> Self {
        self.speaker = speaker;
        self
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the signals.
    pub fn with_signals(mut self, signals: SegmentSignals) -> Self {
        self.signals = signals;
        self
    }

    /// Returns the number of whitespace-separated words in the body.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Returns the normalized form of this segment, or `None` if nothing
    /// usable remains.
    ///
    /// Internal whitespace runs collapse to one space; control characters are
    /// dropped; the body is trimmed. The subject gets the same treatment and
    /// is dropped when blank.
    pub fn normalized(self) -> Option<Self> {
        let text = normalize_text(&self.text);
        if text.is_empty() {
            return None;
        }
        let subject = self
            .subject
            .as_deref()
            .map(normalize_text)
            .filter(|s| !s.is_empty());
        Some(Self {
            text,
            subject,
            ..self
        })
    }

    /// Renders the segment as one prompt line, e.g.
    /// `[LEADER] Sarah (Engineering Manager): Let's dive in.`
    ///
    /// Detected tone markers are appended as `[tone: ...]`.
    pub fn to_prompt_line(&self) -> String {
        let role = if self.signals.is_leadership {
            "LEADER"
        } else {
            "TEAM"
        };
        let speaker = self
            .speaker
            .as_ref()
            .map(SpeakerName::as_str)
            .unwrap_or("unknown");
        let line = match &self.subject {
            Some(subject) => format!("[{role}] {speaker} (re: {subject}): {}", self.text),
            None => format!("[{role}] {speaker}: {}", self.text),
        };
        let tone = self.signals.tone.labels();
        if tone.is_empty() {
            line
        } else {
            format!("{line} [tone: {}]", tone.join(", "))
        }
    }
}

/// Collapses whitespace runs, strips control characters, and trims.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_whitespace_and_trims() {
        let segment = Segment::new(CommunicationType::TeamMeeting, "  Let's   ship\t it \n today ");
        let normalized = segment.normalized().unwrap();
        assert_eq!(normalized.text, "Let's ship it today");
    }

    #[test]
    fn normalization_drops_blank_segments() {
        let segment = Segment::new(CommunicationType::SlackChannel, " \n\t ");
        assert!(segment.normalized().is_none());
    }

    #[test]
    fn normalization_drops_blank_subjects_but_keeps_source() {
        let segment = Segment::new(CommunicationType::LeadershipEmail, "Body")
            .with_subject("   ");
        let normalized = segment.normalized().unwrap();
        assert!(normalized.subject.is_none());
        assert_eq!(normalized.source, CommunicationType::LeadershipEmail);
    }

    #[test]
    fn prompt_line_marks_leaders() {
        let segment = Segment::new(CommunicationType::AllHands, "Welcome everyone")
            .with_speaker(SpeakerName::new("CEO"))
            .with_signals(SegmentSignals {
                is_leadership: true,
                ..SegmentSignals::default()
            });
        assert_eq!(segment.to_prompt_line(), "[LEADER] CEO: Welcome everyone");
    }

    #[test]
    fn prompt_line_lists_tone_markers() {
        let segment = Segment::new(CommunicationType::LeadershipEmail, "Frustrated!!!")
            .with_speaker(SpeakerName::new("ceo@company.com"))
            .with_signals(SegmentSignals {
                tone: ToneIndicators {
                    negative_emotion: true,
                    emphatic: true,
                    ..ToneIndicators::default()
                },
                ..SegmentSignals::default()
            });
        assert_eq!(
            segment.to_prompt_line(),
            "[TEAM] ceo@company.com: Frustrated!!! [tone: negative_emotion, emphatic]"
        );
    }
}
