use async_trait::async_trait;
use pipeline::{OrganizationalState, StageFailure, StageKind, StateField};
use tracing::instrument;

use super::judge::{judge, render_segments, select_segments};
use crate::stage::{require, AnalysisStage, StageContext, StageOutcome, StageOutput};

/// Judges team alignment and engagement from meeting and Slack segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamHealthAnalysis;

impl TeamHealthAnalysis {
    async fn analyze(
        &self,
        state: &OrganizationalState,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageFailure> {
        let segments = require(state.normalized_segments(), StateField::NormalizedSegments)?;
        let dynamics = require(state.team_dynamics(), StateField::TeamDynamics)?;

        let selected = select_segments(self.kind(), segments, |s| s.source.is_team_channel());
        let input = format!(
            "## Team communication\n{}\n\n## Team dynamics\n{}",
            render_segments(selected, ctx.options.max_segments_per_prompt),
            dynamics.to_prompt_context(),
        );

        let judgment = judge(self.kind(), &input, ctx).await?;
        Ok(StageOutput::TeamHealth(judgment))
    }
}

#[async_trait]
impl AnalysisStage for TeamHealthAnalysis {
    fn kind(&self) -> StageKind {
        StageKind::TeamHealthAnalysis
    }

    fn required_fields(&self) -> &'static [StateField] {
        &[StateField::NormalizedSegments, StateField::TeamDynamics]
    }

    fn writes(&self) -> &'static [StateField] {
        &[StateField::TeamHealthFindings]
    }

    #[instrument(skip_all)]
    async fn run(&self, state: &OrganizationalState, ctx: &StageContext<'_>) -> StageOutcome {
        self.analyze(state, ctx).await.into()
    }
}
