use async_trait::async_trait;
use pipeline::{OrganizationalState, StageFailure, StageKind, StateField};
use tracing::instrument;

use super::judge::{judge, render_segments, select_segments};
use crate::stage::{require, AnalysisStage, StageContext, StageOutcome, StageOutput};

/// Judges leadership communication effectiveness from email and all-hands
/// segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadershipAnalysis;

impl LeadershipAnalysis {
    async fn analyze(
        &self,
        state: &OrganizationalState,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageFailure> {
        let segments = require(state.normalized_segments(), StateField::NormalizedSegments)?;
        let dynamics = require(state.team_dynamics(), StateField::TeamDynamics)?;

        let selected = select_segments(self.kind(), segments, |s| {
            s.source.is_leadership_channel()
        });
        let input = format!(
            "## Leadership communication\n{}\n\n## Team dynamics\n{}",
            render_segments(selected, ctx.options.max_segments_per_prompt),
            dynamics.to_prompt_context(),
        );

        let judgment = judge(self.kind(), &input, ctx).await?;
        Ok(StageOutput::Leadership(judgment))
    }
}

#[async_trait]
impl AnalysisStage for LeadershipAnalysis {
    fn kind(&self) -> StageKind {
        StageKind::LeadershipAnalysis
    }

    fn required_fields(&self) -> &'static [StateField] {
        &[StateField::NormalizedSegments, StateField::TeamDynamics]
    }

    fn writes(&self) -> &'static [StateField] {
        &[StateField::LeadershipFindings]
    }

    #[instrument(skip_all)]
    async fn run(&self, state: &OrganizationalState, ctx: &StageContext<'_>) -> StageOutcome {
        self.analyze(state, ctx).await.into()
    }
}
