//! The stage contract shared by every analysis stage and the executor.
//!
//! A stage borrows the state immutably and returns a [`StageOutcome`]. Only the
//! executor mutates the state, and it refuses any output that targets a field
//! outside the stage's declared write-set.

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{
    AnalysisResult, CommunicationParser, Judgment, LanguageModelClient, LeadershipProfile,
    OrganizationalState, ProfileAdapter, PromptProvider, Segment, StageFailure, StageKind,
    StateField, StateViolation, TeamDynamics,
};
use serde::{Deserialize, Serialize};

/// Default bound on a single language model call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of segments rendered into one stage prompt.
pub const DEFAULT_MAX_SEGMENTS_PER_PROMPT: usize = 25;

/// Per-run tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Upper bound on each language model call.
    pub call_timeout: Duration,
    /// Segments beyond this count are left out of stage input, order preserved.
    pub max_segments_per_prompt: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            max_segments_per_prompt: DEFAULT_MAX_SEGMENTS_PER_PROMPT,
        }
    }
}

// ---------------------------------------------------------------------------
// Stage context
// ---------------------------------------------------------------------------

/// Read-only collaborators and configuration handed to every stage.
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    /// The validated profile for this run.
    pub profile: &'a LeadershipProfile,
    /// Prompt selection and dashboard weighting.
    pub adapter: &'a ProfileAdapter,
    /// Turns a prompt selector into prompt text.
    pub prompts: &'a dyn PromptProvider,
    /// The language model.
    pub client: &'a dyn LanguageModelClient,
    /// Turns raw records into segments.
    pub parser: &'a dyn CommunicationParser,
    /// Per-run tuning.
    pub options: PipelineOptions,
}

impl std::fmt::Debug for StageContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageContext")
            .field("profile", self.profile.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Stage output
// ---------------------------------------------------------------------------

/// What a successful stage hands back to the executor for writing.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    /// Normalized segments plus the participation statistics derived from them.
    Preprocessed {
        /// Normalized, source-tagged segments.
        segments: Vec<Segment>,
        /// Participation statistics.
        dynamics: TeamDynamics,
    },
    /// The leadership judgment.
    Leadership(Judgment),
    /// The team-health judgment.
    TeamHealth(Judgment),
    /// The risk judgment.
    Risk(Judgment),
    /// The assembled dashboard.
    Dashboard(AnalysisResult),
}

impl StageOutput {
    /// The state fields this output populates.
    pub fn writes(&self) -> &'static [StateField] {
        match self {
            StageOutput::Preprocessed { .. } => {
                &[StateField::NormalizedSegments, StateField::TeamDynamics]
            }
            StageOutput::Leadership(_) => &[StateField::LeadershipFindings],
            StageOutput::TeamHealth(_) => &[StateField::TeamHealthFindings],
            StageOutput::Risk(_) => &[StateField::RiskFindings],
            StageOutput::Dashboard(_) => &[StateField::Dashboard],
        }
    }

    /// Writes the output into `state`, provided every targeted field is in
    /// `allowed`. Nothing is written when the check fails.
    pub fn write_into(
        self,
        state: &mut OrganizationalState,
        allowed: &[StateField],
    ) -> Result<(), StateViolation> {
        if let Some(field) = self.writes().iter().find(|f| !allowed.contains(*f)) {
            return Err(StateViolation { field: *field });
        }
        match self {
            StageOutput::Preprocessed { segments, dynamics } => {
                state.set_normalized_segments(segments)?;
                state.set_team_dynamics(dynamics)
            }
            StageOutput::Leadership(judgment) => state.set_leadership_findings(judgment),
            StageOutput::TeamHealth(judgment) => state.set_team_health_findings(judgment),
            StageOutput::Risk(judgment) => state.set_risk_findings(judgment),
            StageOutput::Dashboard(dashboard) => state.set_dashboard(dashboard),
        }
    }
}

/// Result of one stage run.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// The stage produced output for the executor to write.
    Success(StageOutput),
    /// The stage failed; the pipeline halts.
    Failure(StageFailure),
}

impl From<Result<StageOutput, StageFailure>> for StageOutcome {
    fn from(result: Result<StageOutput, StageFailure>) -> Self {
        match result {
            Ok(output) => StageOutcome::Success(output),
            Err(failure) => StageOutcome::Failure(failure),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage trait
// ---------------------------------------------------------------------------

/// One unit of the fixed analysis sequence.
#[async_trait]
pub trait AnalysisStage: Send + Sync {
    /// Which stage this is.
    fn kind(&self) -> StageKind;

    /// Fields that must be written before [`AnalysisStage::run`] is called.
    fn required_fields(&self) -> &'static [StateField];

    /// Fields this stage is allowed to write.
    fn writes(&self) -> &'static [StateField];

    /// Runs the stage against a read-only view of the state.
    async fn run(&self, state: &OrganizationalState, ctx: &StageContext<'_>) -> StageOutcome;
}

/// Reads a field a stage depends on, failing with `PreconditionNotMet` when it
/// is absent.
pub(crate) fn require<T>(value: Option<T>, field: StateField) -> Result<T, StageFailure> {
    value.ok_or(StageFailure::PreconditionNotMet { missing: field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{Finding, JudgmentScore};

    fn judgment() -> Judgment {
        Judgment::new(
            JudgmentScore::new(7.0).unwrap(),
            vec![Finding::observation("steady")],
            "fine",
        )
    }

    #[test]
    fn output_outside_the_write_set_is_rejected_without_writing() {
        let mut state = OrganizationalState::default();

        let err = StageOutput::Risk(judgment())
            .write_into(&mut state, &[StateField::LeadershipFindings])
            .unwrap_err();

        assert_eq!(err.field, StateField::RiskFindings);
        assert!(state.risk_findings().is_none());
    }

    #[test]
    fn preprocessed_output_writes_both_fields() {
        let mut state = OrganizationalState::default();

        StageOutput::Preprocessed {
            segments: vec![],
            dynamics: TeamDynamics::default(),
        }
        .write_into(
            &mut state,
            &[StateField::NormalizedSegments, StateField::TeamDynamics],
        )
        .unwrap();

        assert!(state.is_written(StateField::NormalizedSegments));
        assert!(state.is_written(StateField::TeamDynamics));
    }

    #[test]
    fn rewriting_a_field_is_a_violation() {
        let mut state = OrganizationalState::default();
        let allowed = [StateField::LeadershipFindings];
        StageOutput::Leadership(judgment())
            .write_into(&mut state, &allowed)
            .unwrap();

        let err = StageOutput::Leadership(judgment())
            .write_into(&mut state, &allowed)
            .unwrap_err();

        assert_eq!(err.field, StateField::LeadershipFindings);
    }
}
