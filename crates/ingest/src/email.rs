//! Leadership email threads: `From:` / `Subject:` headers followed by a body.

use pipeline::{CommunicationType, ParseError, Segment, SpeakerName};

use crate::signals::{signals_for, subject_urgency, LeadershipTitles};

#[derive(Default)]
struct Draft {
    sender: String,
    subject: Option<String>,
    body: Vec<String>,
}

impl Draft {
    fn finish(self, titles: &LeadershipTitles) -> Segment {
        let text = self.body.join("\n");
        let mut signals = signals_for(&self.sender, &text, titles);
        signals.urgency_level = self.subject.as_deref().map(subject_urgency).unwrap_or(0);

        let segment = Segment::new(CommunicationType::LeadershipEmail, text)
            .with_speaker(SpeakerName::new(self.sender))
            .with_signals(signals);
        match self.subject {
            Some(subject) => segment.with_subject(subject),
            None => segment,
        }
    }
}

/// Parses an email thread. Text without any `From:` header is not an email
/// thread and is rejected.
pub(crate) fn parse(raw_text: &str, titles: &LeadershipTitles) -> Result<Vec<Segment>, ParseError> {
    let mut segments = Vec::new();
    let mut current: Option<Draft> = None;

    for line in raw_text.lines() {
        let trimmed = line.trim();
        if let Some(sender) = trimmed.strip_prefix("From:") {
            if let Some(done) = current.take() {
                segments.push(done.finish(titles));
            }
            current = Some(Draft {
                sender: sender.trim().to_string(),
                ..Draft::default()
            });
        } else if let Some(subject) = trimmed.strip_prefix("Subject:") {
            if let Some(draft) = current.as_mut() {
                draft.subject = Some(subject.trim().to_string());
            }
        } else if !trimmed.is_empty() {
            if let Some(draft) = current.as_mut() {
                draft.body.push(trimmed.to_string());
            }
        }
    }

    match current {
        Some(done) => segments.push(done.finish(titles)),
        None if segments.is_empty() => {
            return Err(ParseError::UnsupportedFormat {
                communication_type: CommunicationType::LeadershipEmail.to_string(),
                reason: "no 'From:' header found".to_string(),
            })
        }
        None => {}
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREAD: &str = "\
From: ceo@company.com
Subject: URGENT Q3 Revenue Miss - Leadership Response Needed

Leadership Team,
Our Q3 numbers came in 15% below target.

From: vp.sales@company.com
Subject: Re: Q3 Revenue Miss
The sales team delivered 102% of pipeline.

From: analyst@company.com
Subject: Re: Q3 Revenue Miss
Should we revisit the deadline?";

    #[test]
    fn splits_thread_into_messages_with_subjects() {
        let segments = parse(THREAD, &LeadershipTitles::default()).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].speaker.as_ref().unwrap().as_str(), "ceo@company.com");
        assert_eq!(
            segments[0].text,
            "Leadership Team,\nOur Q3 numbers came in 15% below target."
        );
        assert_eq!(segments[0].signals.urgency_level, 3);
        assert!(segments[0].signals.is_leadership);
        assert!(segments[1].signals.is_leadership);
        assert_eq!(segments[1].subject.as_deref(), Some("Re: Q3 Revenue Miss"));
        assert!(!segments[2].signals.is_leadership);
        assert!(segments[2].signals.has_question);
        assert!(segments[2].signals.has_decision);
    }

    #[test]
    fn text_without_headers_is_unsupported() {
        let err = parse("Hi all, quick note about Friday.", &LeadershipTitles::default())
            .unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat { .. }));
    }

    #[test]
    fn lines_before_the_first_header_are_ignored() {
        let segments = parse(
            "Forwarded message\nFrom: cto@company.com\nShip it.",
            &LeadershipTitles::default(),
        )
        .unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Ship it.");
        assert!(segments[0].subject.is_none());
    }

    #[test]
    fn message_bodies_carry_tone() {
        let segments = parse(
            "From: ceo@company.com\nSubject: Q3\nI am frustrated. THIS MUST CHANGE NOW!!!",
            &LeadershipTitles::default(),
        )
        .unwrap();
        let tone = segments[0].signals.tone;
        assert!(tone.negative_emotion);
        assert!(tone.high_intensity);
        assert!(tone.emphatic);
        assert!(!tone.positive_emotion);
    }
}
