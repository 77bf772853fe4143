use async_trait::async_trait;
use pipeline::{
    OrganizationalState, Segment, StageFailure, StageKind, StateField, TeamDynamics,
};
use tracing::{debug, instrument};

use crate::stage::{AnalysisStage, StageContext, StageOutcome, StageOutput};

/// Parses every raw record, normalizes the segments, and derives team
/// dynamics. Makes no language model call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocess;

impl Preprocess {
    fn preprocess(
        &self,
        state: &OrganizationalState,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageFailure> {
        let mut segments = Vec::new();
        for record in state.raw_messages() {
            let parsed = ctx.parser.parse(&record.text, record.communication_type)?;
            let before = parsed.len();
            segments.extend(
                parsed
                    .into_iter()
                    .map(|segment| Segment {
                        source: record.communication_type,
                        ..segment
                    })
                    .filter_map(Segment::normalized),
            );
            debug!(
                communication_type = %record.communication_type,
                parsed = before,
                "Record preprocessed"
            );
        }

        if segments.is_empty() {
            return Err(StageFailure::EmptyInput);
        }

        let dynamics = TeamDynamics::from_segments(&segments);
        Ok(StageOutput::Preprocessed { segments, dynamics })
    }
}

#[async_trait]
impl AnalysisStage for Preprocess {
    fn kind(&self) -> StageKind {
        StageKind::Preprocess
    }

    fn required_fields(&self) -> &'static [StateField] {
        &[StateField::RawMessages]
    }

    fn writes(&self) -> &'static [StateField] {
        &[StateField::NormalizedSegments, StateField::TeamDynamics]
    }

    #[instrument(skip_all, fields(records = state.raw_messages().len()))]
    async fn run(&self, state: &OrganizationalState, ctx: &StageContext<'_>) -> StageOutcome {
        self.preprocess(state, ctx).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_profile, ScriptedClient};
    use crate::TemplatePromptProvider;
    use pipeline::{
        CommunicationParser, CommunicationRecord, CommunicationType, ParseError, ProfileAdapter,
        SpeakerName,
    };

    /// Splits on newlines and tags everything as a team meeting regardless of
    /// the declared type.
    struct LineParser;

    impl CommunicationParser for LineParser {
        fn parse(&self, raw: &str, _: CommunicationType) -> Result<Vec<Segment>, ParseError> {
            if raw.contains("<binary>") {
                return Err(ParseError::UnsupportedFormat {
                    communication_type: "team_meeting".to_string(),
                    reason: "binary payload".to_string(),
                });
            }
            Ok(raw
                .split('\n')
                .map(|line| {
                    Segment::new(CommunicationType::TeamMeeting, line)
                        .with_speaker(SpeakerName::new("Alex"))
                })
                .collect())
        }

        fn detect_type(&self, _: &str) -> CommunicationType {
            CommunicationType::TeamMeeting
        }
    }

    async fn run(records: Vec<CommunicationRecord>) -> StageOutcome {
        let profile = fixture_profile();
        let adapter = ProfileAdapter::new();
        let client = ScriptedClient::new();
        let ctx = StageContext {
            profile: &profile,
            adapter: &adapter,
            prompts: &TemplatePromptProvider,
            client: &client,
            parser: &LineParser,
            options: Default::default(),
        };
        Preprocess.run(&OrganizationalState::new(records), &ctx).await
    }

    #[tokio::test]
    async fn normalizes_and_retags_segments_with_the_record_type() {
        let outcome = run(vec![CommunicationRecord::new(
            CommunicationType::AllHands,
            "  hello   all \n   \n second  line ",
        )])
        .await;

        let StageOutcome::Success(StageOutput::Preprocessed { segments, dynamics }) = outcome
        else {
            panic!("expected preprocessed output, got {outcome:?}");
        };
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["hello all", "second line"]);
        assert!(segments.iter().all(|s| s.source == CommunicationType::AllHands));
        assert_eq!(dynamics.total_participants, 1);
    }

    #[tokio::test]
    async fn whitespace_only_input_is_empty() {
        let outcome = run(vec![CommunicationRecord::new(
            CommunicationType::TeamMeeting,
            " \n\t\n ",
        )])
        .await;
        assert_eq!(outcome, StageOutcome::Failure(StageFailure::EmptyInput));
    }

    #[tokio::test]
    async fn parser_rejection_surfaces_as_unsupported_format() {
        let outcome = run(vec![CommunicationRecord::new(
            CommunicationType::SlackChannel,
            "<binary>",
        )])
        .await;
        assert!(matches!(
            outcome,
            StageOutcome::Failure(StageFailure::UnsupportedFormat(_))
        ));
    }
}
