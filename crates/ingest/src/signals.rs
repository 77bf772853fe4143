//! Keyword signals extracted per segment.

use pipeline::{SegmentSignals, ToneIndicators};

const DEFAULT_TITLES: &[&str] = &[
    "manager",
    "director",
    "lead",
    "head",
    "ceo",
    "cto",
    "cfo",
    "coo",
    "vp",
    "executive",
    "founder",
    "president",
];

const DECISION_MARKERS: &[&str] = &[
    "decide",
    "decision",
    "will do",
    "action item",
    "agreed",
    "deadline",
    "deliverable",
];

const NEGATIVE_WORDS: &[&str] = &["disappointed", "concerned", "frustrated"];

const POSITIVE_WORDS: &[&str] = &["excited", "great", "excellent", "fantastic"];

/// Uppercase share above which text reads as shouting.
const HIGH_INTENSITY_RATIO: f64 = 0.1;

/// Title words that mark a speaker as a leader.
///
/// Matching is per token: the speaker label is split on non-alphanumeric
/// characters, so `vp.sales@company.com` and `Sarah (Engineering Manager)`
/// both match, while `Leadbetter` does not match `lead`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadershipTitles(Vec<String>);

impl LeadershipTitles {
    /// Creates a title list; entries are lowercased.
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            titles
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// Returns `true` if `speaker` carries one of the titles.
    pub fn is_leader(&self, speaker: &str) -> bool {
        speaker
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .any(|token| {
                let token = token.to_lowercase();
                self.0.iter().any(|title| *title == token)
            })
    }
}

impl Default for LeadershipTitles {
    fn default() -> Self {
        Self::new(DEFAULT_TITLES)
    }
}

/// Urgency of an email subject, `0` (none) to `3` (critical).
pub(crate) fn subject_urgency(subject: &str) -> u8 {
    let lower = subject.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));
    if contains_any(&["urgent", "asap", "immediate", "critical", "emergency"]) {
        3
    } else if contains_any(&["important", "priority"]) {
        2
    } else if contains_any(&["fyi", "update", "info"]) {
        1
    } else {
        0
    }
}

/// Tone markers in `text`. Empty text has none.
pub(crate) fn tone_of(text: &str) -> ToneIndicators {
    let lower = text.to_lowercase();
    let total = text.chars().count();
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    ToneIndicators {
        negative_emotion: NEGATIVE_WORDS.iter().any(|w| lower.contains(w)),
        positive_emotion: POSITIVE_WORDS.iter().any(|w| lower.contains(w)),
        high_intensity: total > 0 && upper as f64 / total as f64 > HIGH_INTENSITY_RATIO,
        emphatic: text.matches('!').count() > 2,
    }
}

/// Signals for a segment body written by `speaker`.
pub(crate) fn signals_for(speaker: &str, text: &str, titles: &LeadershipTitles) -> SegmentSignals {
    let lower = text.to_lowercase();
    SegmentSignals {
        is_leadership: titles.is_leader(speaker),
        has_question: text.contains('?'),
        has_decision: DECISION_MARKERS.iter().any(|m| lower.contains(m)),
        urgency_level: 0,
        tone: tone_of(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_match_whole_tokens_only() {
        let titles = LeadershipTitles::default();
        assert!(titles.is_leader("Sarah (Engineering Manager)"));
        assert!(titles.is_leader("vp.sales@company.com"));
        assert!(titles.is_leader("Team Lead Priya"));
        assert!(!titles.is_leader("Leadbetter"));
        assert!(!titles.is_leader("Mike (Junior Dev)"));
    }

    #[test]
    fn subject_urgency_levels() {
        assert_eq!(subject_urgency("URGENT: outage"), 3);
        assert_eq!(subject_urgency("Important: board prep"), 2);
        assert_eq!(subject_urgency("FYI roadmap"), 1);
        assert_eq!(subject_urgency("Lunch"), 0);
    }

    #[test]
    fn detects_questions_and_decisions() {
        let signals = signals_for(
            "Alex",
            "Can we decide on the timeline?",
            &LeadershipTitles::default(),
        );
        assert!(signals.has_question);
        assert!(signals.has_decision);
        assert!(!signals.is_leadership);
    }

    #[test]
    fn negative_and_positive_words_are_flagged() {
        let negative = tone_of("I am disappointed in the launch");
        assert!(negative.negative_emotion);
        assert!(!negative.positive_emotion);

        let positive = tone_of("Fantastic work on the demo");
        assert!(positive.positive_emotion);
        assert!(!positive.negative_emotion);
    }

    #[test]
    fn uppercase_heavy_text_is_high_intensity() {
        assert!(tone_of("WE SHIP FRIDAY").high_intensity);
        assert!(!tone_of("We ship on the last friday of the month").high_intensity);
    }

    #[test]
    fn more_than_two_exclamations_are_emphatic() {
        assert!(tone_of("Go! Go! Go!").emphatic);
        assert!(!tone_of("Go! Go").emphatic);
    }

    #[test]
    fn empty_text_has_no_tone() {
        assert_eq!(tone_of(""), ToneIndicators::default());
    }
}
