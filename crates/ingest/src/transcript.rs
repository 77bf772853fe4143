//! `Speaker: text` transcripts (team meetings and all-hands).

use pipeline::{CommunicationType, Segment, SpeakerName};

use crate::signals::{signals_for, LeadershipTitles};

/// Speaker labels longer than this are treated as prose containing a colon.
const MAX_SPEAKER_LEN: usize = 80;

pub(crate) fn parse(
    raw_text: &str,
    source: CommunicationType,
    titles: &LeadershipTitles,
) -> Vec<Segment> {
    raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("Time:"))
        .filter_map(|line| line.split_once(':'))
        .filter(|(speaker, _)| {
            let speaker = speaker.trim();
            !speaker.is_empty() && speaker.len() <= MAX_SPEAKER_LEN
        })
        .map(|(speaker, content)| {
            let content = content.trim();
            Segment::new(source, content)
                .with_speaker(SpeakerName::new(speaker))
                .with_signals(signals_for(speaker, content, titles))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEETING: &str = "\
Time: 09:00
Sarah (Engineering Manager): Good morning team! Let's dive into sprint planning.
Alex (Senior Dev): I think we can tackle the payment integration this sprint.
This line has no speaker
Mike (Junior Dev): Maybe we can do daily check-ins?
Sarah: Agreed, that's the decision.";

    #[test]
    fn parses_speaker_lines_and_skips_time_and_prose() {
        let segments = parse(MEETING, CommunicationType::TeamMeeting, &LeadershipTitles::default());

        assert_eq!(segments.len(), 4);
        assert_eq!(
            segments[0].speaker.as_ref().unwrap().as_str(),
            "Sarah (Engineering Manager)"
        );
        assert!(segments[0].signals.is_leadership);
        assert!(!segments[1].signals.is_leadership);
        assert!(segments[2].signals.has_question);
        assert!(segments[3].signals.has_decision);
    }

    #[test]
    fn keeps_colons_inside_the_content() {
        let segments = parse(
            "Jordan: Timeline: two weeks",
            CommunicationType::AllHands,
            &LeadershipTitles::default(),
        );
        assert_eq!(segments[0].text, "Timeline: two weeks");
        assert_eq!(segments[0].source, CommunicationType::AllHands);
    }

    #[test]
    fn ignores_lines_with_blank_or_overlong_speakers() {
        let long_prefix = "x".repeat(MAX_SPEAKER_LEN + 1);
        let raw = format!(": orphan content\n{long_prefix}: tail");
        let segments = parse(&raw, CommunicationType::TeamMeeting, &LeadershipTitles::default());
        assert!(segments.is_empty());
    }
}
