use async_trait::async_trait;
use pipeline::{OrganizationalState, StageFailure, StageKind, StateField};
use tracing::instrument;

use super::judge::{judge, render_segments};
use crate::stage::{require, AnalysisStage, StageContext, StageOutcome, StageOutput};

/// Looks for early-warning signals across all segments, with the leadership
/// and team-health findings included in the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskDetection;

impl RiskDetection {
    async fn analyze(
        &self,
        state: &OrganizationalState,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageFailure> {
        let segments = require(state.normalized_segments(), StateField::NormalizedSegments)?;
        let leadership = require(state.leadership_findings(), StateField::LeadershipFindings)?;
        let team_health = require(state.team_health_findings(), StateField::TeamHealthFindings)?;

        let input = format!(
            "## Communication\n{}\n\n## Prior leadership findings\n{}\n\n## Prior team health findings\n{}",
            render_segments(segments, ctx.options.max_segments_per_prompt),
            leadership.to_prompt_context(),
            team_health.to_prompt_context(),
        );

        let judgment = judge(self.kind(), &input, ctx).await?;
        Ok(StageOutput::Risk(judgment))
    }
}

#[async_trait]
impl AnalysisStage for RiskDetection {
    fn kind(&self) -> StageKind {
        StageKind::RiskDetection
    }

    fn required_fields(&self) -> &'static [StateField] {
        &[
            StateField::NormalizedSegments,
            StateField::LeadershipFindings,
            StateField::TeamHealthFindings,
        ]
    }

    fn writes(&self) -> &'static [StateField] {
        &[StateField::RiskFindings]
    }

    #[instrument(skip_all)]
    async fn run(&self, state: &OrganizationalState, ctx: &StageContext<'_>) -> StageOutcome {
        self.analyze(state, ctx).await.into()
    }
}
