//! Participation statistics derived from normalized segments.
//!
//! Computed once by the Preprocess stage and carried alongside the segments
//! so later stages (and the dashboard metadata) see the same numbers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// Key used for segments whose source format names no author.
const UNKNOWN_SPEAKER: &str = "unknown";

/// Per-speaker participation counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerStats {
    /// Number of segments authored.
    pub segments: usize,
    /// Total words across those segments.
    pub words: usize,
    /// Segments containing a question.
    pub questions: usize,
    /// Segments recording a decision or action item.
    pub decisions: usize,
    /// Whether the speaker holds a leadership title.
    pub is_leadership: bool,
}

/// Team participation statistics for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamDynamics {
    /// Distinct speakers (segments without an author count as one speaker).
    pub total_participants: usize,
    /// Share of segments authored by leaders, in `[0, 1]`.
    pub leadership_participation_rate: f64,
    /// `1 - (largest speaker's word share)`; `0` when nobody spoke.
    pub participation_balance: f64,
    /// Statistics keyed by speaker name, sorted for stable output.
    pub speakers: BTreeMap<String, SpeakerStats>,
    /// Segments containing a question.
    pub total_questions: usize,
    /// Segments recording a decision.
    pub total_decisions: usize,
    /// Mean words per segment.
    pub average_segment_words: f64,
}

impl TeamDynamics {
    /// Computes the statistics for `segments`.
    pub fn from_segments(segments: &[Segment]) -> Self {
        if segments.is_empty() {
            return Self::default();
        }

        let mut speakers: BTreeMap<String, SpeakerStats> = BTreeMap::new();
        for segment in segments {
            let key = segment
                .speaker
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| UNKNOWN_SPEAKER.to_string());
            let stats = speakers.entry(key).or_default();
            stats.segments += 1;
            stats.words += segment.word_count();
            stats.questions += usize::from(segment.signals.has_question);
            stats.decisions += usize::from(segment.signals.has_decision);
            stats.is_leadership |= segment.signals.is_leadership;
        }

        let total = segments.len();
        let leadership_segments = segments
            .iter()
            .filter(|s| s.signals.is_leadership)
            .count();
        let total_words: usize = speakers.values().map(|s| s.words).sum();
        let max_words = speakers.values().map(|s| s.words).max().unwrap_or(0);
        let participation_balance = if total_words > 0 {
            1.0 - (max_words as f64 / total_words as f64)
        } else {
            0.0
        };

        Self {
            total_participants: speakers.len(),
            leadership_participation_rate: leadership_segments as f64 / total as f64,
            participation_balance,
            total_questions: speakers.values().map(|s| s.questions).sum(),
            total_decisions: speakers.values().map(|s| s.decisions).sum(),
            average_segment_words: total_words as f64 / total as f64,
            speakers,
        }
    }

    /// One-line summary used as prompt context.
    pub fn to_prompt_context(&self) -> String {
        format!(
            "participants={}, leadership_participation_rate={:.2}, participation_balance={:.2}, questions={}, decisions={}, average_segment_words={:.1}",
            self.total_participants,
            self.leadership_participation_rate,
            self.participation_balance,
            self.total_questions,
            self.total_decisions,
            self.average_segment_words,
        )
    }
}
