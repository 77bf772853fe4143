//! The shared language-model call used by the three judging stages.

use std::time::Instant;

use pipeline::{ClientError, Judgment, Segment, StageFailure, StageKind};
use tracing::{debug, instrument, warn};

use crate::stage::StageContext;

/// Sends `input_text` to the language model under the stage's prompt and
/// validates the reply.
///
/// The call is bounded by `ctx.options.call_timeout` here as well as inside
/// the client; an elapsed bound becomes [`ClientError::Timeout`].
#[instrument(skip_all, fields(stage = %stage, input_chars = input_text.len()))]
pub(crate) async fn judge(
    stage: StageKind,
    input_text: &str,
    ctx: &StageContext<'_>,
) -> Result<Judgment, StageFailure> {
    let selector = ctx.adapter.prompt_for(stage, ctx.profile);
    let prompt = ctx.prompts.template_for(&selector);
    let timeout = ctx.options.call_timeout;

    let started = Instant::now();
    let response = match tokio::time::timeout(
        timeout,
        ctx.client.complete(&prompt, input_text, timeout),
    )
    .await
    {
        Ok(result) => result?,
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "Language model call timed out");
            return Err(ClientError::Timeout { after: timeout }.into());
        }
    };

    let judgment = Judgment::from_response(&response)?;
    debug!(
        score = judgment.score.as_f64(),
        findings = judgment.key_findings.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Judgment received"
    );
    Ok(judgment)
}

/// Renders up to `limit` segments as prompt lines, in order.
pub(crate) fn render_segments<'a>(
    segments: impl IntoIterator<Item = &'a Segment>,
    limit: usize,
) -> String {
    let segments: Vec<&Segment> = segments.into_iter().collect();
    let mut lines: Vec<String> = segments
        .iter()
        .take(limit)
        .map(|s| s.to_prompt_line())
        .collect();
    if segments.len() > limit {
        lines.push(format!("[{} more segments not shown]", segments.len() - limit));
    }
    lines.join("\n")
}

/// Picks the segments whose source matches `preferred`, falling back to all
/// segments when none match.
pub(crate) fn select_segments(
    stage: StageKind,
    segments: &[Segment],
    preferred: impl Fn(&Segment) -> bool,
) -> Vec<&Segment> {
    let selected: Vec<&Segment> = segments.iter().filter(|s| preferred(s)).collect();
    if selected.is_empty() {
        debug!(stage = %stage, "No segments from preferred sources; using all segments");
        segments.iter().collect()
    } else {
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::CommunicationType;

    fn segment(source: CommunicationType, text: &str) -> Segment {
        Segment::new(source, text)
    }

    #[test]
    fn rendering_caps_segments_and_reports_the_rest() {
        let segments = vec![
            segment(CommunicationType::TeamMeeting, "one"),
            segment(CommunicationType::TeamMeeting, "two"),
            segment(CommunicationType::TeamMeeting, "three"),
        ];

        let rendered = render_segments(&segments, 2);

        assert_eq!(
            rendered,
            "[TEAM] unknown: one\n[TEAM] unknown: two\n[1 more segments not shown]"
        );
    }

    #[test]
    fn selection_prefers_matching_sources() {
        let segments = vec![
            segment(CommunicationType::TeamMeeting, "standup"),
            segment(CommunicationType::LeadershipEmail, "memo"),
        ];

        let selected = select_segments(StageKind::LeadershipAnalysis, &segments, |s| {
            s.source.is_leadership_channel()
        });

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].text, "memo");
    }

    #[test]
    fn selection_falls_back_to_everything() {
        let segments = vec![segment(CommunicationType::TeamMeeting, "standup")];

        let selected = select_segments(StageKind::LeadershipAnalysis, &segments, |s| {
            s.source.is_leadership_channel()
        });

        assert_eq!(selected.len(), 1);
    }
}
