use async_trait::async_trait;
use pipeline::{
    DashboardAssembler, OrganizationalState, StageFailure, StageKind, StageStatus, StateField,
};
use tracing::instrument;

use crate::stage::{AnalysisStage, StageContext, StageOutcome, StageOutput};

/// Checks that every earlier stage completed, then assembles the dashboard.
/// Makes no language model call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summary;

impl Summary {
    fn summarize(
        &self,
        state: &OrganizationalState,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageFailure> {
        for stage in self.kind().predecessors() {
            let status = state.status_of(*stage).unwrap_or(StageStatus::Skipped);
            if status != StageStatus::Ok {
                return Err(StageFailure::IncompleteHistory {
                    stage: *stage,
                    status,
                });
            }
        }

        let dashboard = DashboardAssembler::new(ctx.adapter.clone()).assemble(state, ctx.profile)?;
        Ok(StageOutput::Dashboard(dashboard))
    }
}

#[async_trait]
impl AnalysisStage for Summary {
    fn kind(&self) -> StageKind {
        StageKind::Summary
    }

    fn required_fields(&self) -> &'static [StateField] {
        &[
            StateField::NormalizedSegments,
            StateField::LeadershipFindings,
            StateField::TeamHealthFindings,
            StateField::RiskFindings,
            StateField::StageHistory,
        ]
    }

    fn writes(&self) -> &'static [StateField] {
        &[StateField::Dashboard]
    }

    #[instrument(skip_all)]
    async fn run(&self, state: &OrganizationalState, ctx: &StageContext<'_>) -> StageOutcome {
        self.summarize(state, ctx).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_profile, ScriptedClient};
    use crate::TemplatePromptProvider;
    use ingest::TranscriptParser;
    use pipeline::{Finding, Judgment, JudgmentScore, ProfileAdapter, Segment, CommunicationType};

    fn judged_state() -> OrganizationalState {
        let judgment = |score| {
            Judgment::new(
                JudgmentScore::new(score).unwrap(),
                vec![Finding::observation("noted")],
                "ok",
            )
        };
        let mut state = OrganizationalState::default();
        state
            .set_normalized_segments(vec![Segment::new(CommunicationType::TeamMeeting, "hi")])
            .unwrap();
        state.set_leadership_findings(judgment(8.0)).unwrap();
        state.set_team_health_findings(judgment(7.0)).unwrap();
        state.set_risk_findings(judgment(9.0)).unwrap();
        state
    }

    async fn run(state: &OrganizationalState) -> StageOutcome {
        let profile = fixture_profile();
        let adapter = ProfileAdapter::new();
        let client = ScriptedClient::new();
        let parser = TranscriptParser::new();
        let ctx = StageContext {
            profile: &profile,
            adapter: &adapter,
            prompts: &TemplatePromptProvider,
            client: &client,
            parser: &parser,
            options: Default::default(),
        };
        Summary.run(state, &ctx).await
    }

    #[tokio::test]
    async fn assembles_when_history_is_complete() {
        let mut state = judged_state();
        for stage in StageKind::Summary.predecessors() {
            state.record(*stage, StageStatus::Ok);
        }

        let outcome = run(&state).await;

        let StageOutcome::Success(StageOutput::Dashboard(dashboard)) = outcome else {
            panic!("expected a dashboard, got {outcome:?}");
        };
        assert_eq!(dashboard.metadata.segments_analyzed, 1);
    }

    #[tokio::test]
    async fn missing_history_entry_is_incomplete() {
        let mut state = judged_state();
        state.record(StageKind::Preprocess, StageStatus::Ok);
        state.record(StageKind::LeadershipAnalysis, StageStatus::Ok);

        let outcome = run(&state).await;

        assert_eq!(
            outcome,
            StageOutcome::Failure(StageFailure::IncompleteHistory {
                stage: StageKind::TeamHealthAnalysis,
                status: StageStatus::Skipped,
            })
        );
    }

    #[tokio::test]
    async fn failed_history_entry_is_incomplete() {
        let mut state = judged_state();
        for stage in StageKind::Summary.predecessors() {
            let status = if *stage == StageKind::RiskDetection {
                StageStatus::Failed
            } else {
                StageStatus::Ok
            };
            state.record(*stage, status);
        }

        let outcome = run(&state).await;

        assert!(matches!(
            outcome,
            StageOutcome::Failure(StageFailure::IncompleteHistory {
                stage: StageKind::RiskDetection,
                status: StageStatus::Failed,
            })
        ));
    }
}
