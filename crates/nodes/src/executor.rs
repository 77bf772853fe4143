//! The pipeline executor: runs the fixed stage sequence over one state.
//!
//! For each stage, in order:
//!
//! 1. stop with [`PipelineError::Cancelled`] if cancellation was requested;
//! 2. check the stage's read preconditions;
//! 3. run the stage;
//! 4. on success, write its output (write-set enforced) and record `ok`;
//! 5. on failure, record `failed` and stop with [`PipelineError::StageFailed`].
//!
//! The executor itself performs no I/O; every external effect goes through
//! the collaborator ports it was constructed with. Each call to
//! [`PipelineExecutor::execute`] owns a fresh [`OrganizationalState`], so one
//! executor can serve concurrent runs.

use std::sync::Arc;
use std::time::Instant;

use pipeline::{
    AnalysisResult, AnalysisRunId, CancellationFlag, CommunicationParser, CommunicationRecord,
    CommunicationType, LanguageModelClient, LeadershipProfile, OrganizationalState,
    PipelineError, ProfileAdapter, PromptProvider, StageFailure, StageKind, StageStatus,
    StateField,
};
use tracing::{error, info, info_span, warn, Instrument};

use crate::stage::{AnalysisStage, PipelineOptions, StageContext, StageOutcome};
use crate::stages::default_stages;

/// Drives an analysis run through the stage sequence.
pub struct PipelineExecutor {
    stages: Vec<Box<dyn AnalysisStage>>,
    parser: Arc<dyn CommunicationParser>,
    prompts: Arc<dyn PromptProvider>,
    client: Arc<dyn LanguageModelClient>,
    adapter: ProfileAdapter,
    options: PipelineOptions,
    cancellation: CancellationFlag,
}

impl std::fmt::Debug for PipelineExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineExecutor")
            .field(
                "stages",
                &self.stages.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .field("adapter", &self.adapter)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PipelineExecutor {
    /// Creates an executor running the default stage sequence.
    pub fn new(
        parser: Arc<dyn CommunicationParser>,
        prompts: Arc<dyn PromptProvider>,
        client: Arc<dyn LanguageModelClient>,
    ) -> Self {
        Self {
            stages: default_stages(),
            parser,
            prompts,
            client,
            adapter: ProfileAdapter::new(),
            options: PipelineOptions::default(),
            cancellation: CancellationFlag::new(),
        }
    }

    /// Uses `adapter` for prompt selection and dashboard weighting.
    pub fn with_adapter(mut self, adapter: ProfileAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    /// Sets the per-run options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Observes `flag` for cancellation instead of a private flag.
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = flag;
        self
    }

    /// Replaces the stage sequence.
    pub fn with_stages(mut self, stages: Vec<Box<dyn AnalysisStage>>) -> Self {
        self.stages = stages;
        self
    }

    /// A handle to the flag this executor checks before every stage.
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancellation.clone()
    }

    /// Analyzes one block of communication text.
    ///
    /// When `communication_type` is `None` the type is detected by the parser.
    pub async fn analyze_organization(
        &self,
        raw_communication: &str,
        communication_type: Option<CommunicationType>,
        profile: &LeadershipProfile,
    ) -> Result<AnalysisResult, PipelineError> {
        let communication_type =
            communication_type.unwrap_or_else(|| self.parser.detect_type(raw_communication));
        let record = CommunicationRecord::new(communication_type, raw_communication);
        self.execute(vec![record], profile).await
    }

    /// Runs every stage over `raw_input` and returns the dashboard.
    ///
    /// On failure no partial dashboard is returned; the error carries the
    /// history accumulated up to the abort.
    pub async fn execute(
        &self,
        raw_input: Vec<CommunicationRecord>,
        profile: &LeadershipProfile,
    ) -> Result<AnalysisResult, PipelineError> {
        let run_id = AnalysisRunId::new_random();
        let span = info_span!("analysis_run", run_id = %run_id, records = raw_input.len());
        self.run_stages(OrganizationalState::new(raw_input), profile)
            .instrument(span)
            .await
    }

    async fn run_stages(
        &self,
        mut state: OrganizationalState,
        profile: &LeadershipProfile,
    ) -> Result<AnalysisResult, PipelineError> {
        let ctx = StageContext {
            profile,
            adapter: &self.adapter,
            prompts: self.prompts.as_ref(),
            client: self.client.as_ref(),
            parser: self.parser.as_ref(),
            options: self.options,
        };
        let started = Instant::now();

        for stage in &self.stages {
            let kind = stage.kind();

            if self.cancellation.is_cancelled() {
                warn!(next_stage = %kind, "Analysis cancelled");
                let (_, history) = state.into_parts();
                return Err(PipelineError::Cancelled {
                    next_stage: kind,
                    history,
                });
            }

            if let Some(missing) = stage
                .required_fields()
                .iter()
                .find(|field| !state.is_written(**field))
            {
                let failure = StageFailure::PreconditionNotMet { missing: *missing };
                return Err(abort(state, kind, failure));
            }

            let stage_started = Instant::now();
            let written = match stage.run(&state, &ctx).await {
                StageOutcome::Success(output) => output
                    .write_into(&mut state, stage.writes())
                    .map_err(StageFailure::from),
                StageOutcome::Failure(failure) => Err(failure),
            };
            if let Err(failure) = written {
                return Err(abort(state, kind, failure));
            }

            state.record(kind, StageStatus::Ok);
            info!(
                stage = %kind,
                elapsed_ms = stage_started.elapsed().as_millis() as u64,
                "Stage completed"
            );
        }

        let (dashboard, history) = state.into_parts();
        let dashboard = dashboard.ok_or_else(|| PipelineError::StageFailed {
            failed_stage: StageKind::Summary,
            cause: StageFailure::PreconditionNotMet {
                missing: StateField::Dashboard,
            },
            history: history.clone(),
        })?;

        info!(
            overall_health_score = dashboard.overall_health_score,
            risk_level = %dashboard.risk_level,
            stages = history.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis completed"
        );
        Ok(dashboard)
    }
}

/// Records `kind` as failed and turns the state into the pipeline error.
fn abort(mut state: OrganizationalState, kind: StageKind, failure: StageFailure) -> PipelineError {
    state.record(kind, StageStatus::Failed);
    if failure.is_defect() {
        error!(stage = %kind, error = %failure, "Pipeline wiring defect");
    } else {
        error!(stage = %kind, error = %failure, "Stage failed");
    }
    let (_, history) = state.into_parts();
    PipelineError::StageFailed {
        failed_stage: kind,
        cause: failure,
        history,
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
