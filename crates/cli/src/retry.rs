//! Caller-level retry around whole analysis runs.
//!
//! The pipeline never retries on its own. A run that failed with a retryable
//! language model error is re-run from scratch, up to the configured number of
//! attempts, waiting for the provider's requested delay when it gave one and
//! an exponential back-off otherwise.

use nodes::PipelineExecutor;
use pipeline::{AnalysisResult, CommunicationType, LeadershipProfile, PipelineError, RetryPolicy};
use tracing::warn;

use crate::config::RetrySettings;

pub async fn analyze_with_retry(
    executor: &PipelineExecutor,
    raw_communication: &str,
    communication_type: Option<CommunicationType>,
    profile: &LeadershipProfile,
    retry: &RetrySettings,
) -> Result<AnalysisResult, PipelineError> {
    let mut attempt = 1;
    loop {
        let err = match executor
            .analyze_organization(raw_communication, communication_type, profile)
            .await
        {
            Ok(dashboard) => return Ok(dashboard),
            Err(err) => err,
        };

        let RetryPolicy::Retryable { after } = err.retry_policy() else {
            return Err(err);
        };
        if attempt >= retry.max_attempts || executor.cancellation().is_cancelled() {
            return Err(err);
        }

        let delay = after.unwrap_or_else(|| retry.backoff(attempt));
        warn!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Analysis failed with a retryable error; retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
