//! Error and retry-policy types for the analysis domain.
//!
//! Errors are layered:
//!
//! - Collaborator errors ([`ClientError`], [`ParseError`]) describe what went
//!   wrong inside an external dependency.
//! - [`StageFailure`] is what a stage reports; it wraps the collaborator error
//!   so the underlying cause is never lost.
//! - [`PipelineError`] is what the caller of `execute` receives: the failed
//!   stage, its cause, and the history accumulated up to the abort.
//!
//! [`RetryPolicy`] is a cross-cutting concern: the pipeline never retries on
//! its own, but it tells the caller whether retrying could help.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stage::{StageKind, StageRecord, StageStatus, StateField};

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// - `Retryable` errors: timeouts, rate limiting, transient unavailability.
/// - `NonRetryable` errors: authentication failures, malformed judgments, empty
///   input, wiring defects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means apply the
        /// caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried.
    NonRetryable,
}

impl RetryPolicy {
    /// Returns `true` if this policy permits a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RetryPolicy::Retryable { .. })
    }
}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failure reported by a [`crate::LanguageModelClient`] call.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ClientError {
    /// The call did not complete within the caller-supplied timeout.
    #[error("language model call timed out after {after:?}")]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
    },

    /// The provider refused the call because of rate limiting or quota.
    #[error("language model rate limited")]
    RateLimited {
        /// Provider-suggested delay (e.g. from a `Retry-After` header).
        retry_after: Option<Duration>,
    },

    /// Credentials were missing or rejected.
    #[error("language model authentication failed")]
    Authentication,

    /// The provider reported a server-side failure.
    #[error("language model unavailable: {message}")]
    Unavailable {
        /// Provider error details.
        message: String,
    },

    /// The request could not be delivered or the connection failed.
    #[error("language model network error: {message}")]
    Network {
        /// Transport error details.
        message: String,
    },

    /// The provider answered, but the body was not a readable completion.
    ///
    /// Reply text that merely lacks a judgment is not this error; it reaches
    /// the stage and fails contract validation instead.
    #[error("language model returned an unreadable response: {message}")]
    InvalidResponse {
        /// Why the body could not be read.
        message: String,
    },
}

impl ClientError {
    /// Returns the retry policy for this error.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            ClientError::Timeout { .. }
            | ClientError::Network { .. }
            | ClientError::Unavailable { .. } => RetryPolicy::Retryable { after: None },
            ClientError::RateLimited { retry_after } => RetryPolicy::Retryable {
                after: *retry_after,
            },
            ClientError::Authentication | ClientError::InvalidResponse { .. } => {
                RetryPolicy::NonRetryable
            }
        }
    }
}

// ---------------------------------------------------------------------------

/// Failure reported by a [`crate::CommunicationParser`].
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ParseError {
    /// The input cannot be read as the declared communication type.
    #[error("unsupported format for '{communication_type}': {reason}")]
    UnsupportedFormat {
        /// The communication type the caller declared (as given).
        communication_type: String,
        /// What made the input unreadable.
        reason: String,
    },
}

// ---------------------------------------------------------------------------

/// A leadership profile failed validation at construction time.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ProfileError {
    /// A field held an invalid value.
    #[error("invalid profile field '{field}': {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The profile document could not be read (unknown key, unknown enum
    /// value, wrong type).
    #[error("malformed profile: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// State and stage errors
// ---------------------------------------------------------------------------

/// A state field was written a second time, or by a stage whose write-set
/// does not include it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("illegal write to state field '{field}'")]
pub struct StateViolation {
    /// The field the write targeted.
    pub field: StateField,
}

// ---------------------------------------------------------------------------

/// Why a stage failed. The underlying collaborator error is always preserved.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum StageFailure {
    /// No usable records remained after parsing and normalization.
    #[error("no usable communication records after preprocessing")]
    EmptyInput,

    /// The parser rejected an input record.
    #[error(transparent)]
    UnsupportedFormat(#[from] ParseError),

    /// A field the stage reads had not been written. Indicates a wiring defect.
    #[error("precondition not met: '{missing}' has not been written")]
    PreconditionNotMet {
        /// The absent field.
        missing: StateField,
    },

    /// A stage attempted to write outside its write-set or to rewrite a field.
    #[error(transparent)]
    StateViolation(#[from] StateViolation),

    /// The language model call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The language model answered, but not in the judgment shape.
    #[error("malformed judgment: {reason}")]
    MalformedJudgment {
        /// Which part of the response contract was violated.
        reason: String,
    },

    /// Summary found an earlier stage that did not complete successfully.
    #[error("stage history incomplete: {stage} is {status}")]
    IncompleteHistory {
        /// The earlier stage.
        stage: StageKind,
        /// Its recorded status (or `skipped` when missing).
        status: StageStatus,
    },
}

impl StageFailure {
    /// Returns the retry policy a caller should apply if it wraps `execute`.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            StageFailure::Client(err) => err.retry_policy(),
            _ => RetryPolicy::NonRetryable,
        }
    }

    /// Returns `true` for failures that indicate a defect in pipeline wiring
    /// rather than a property of the input or a collaborator.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            StageFailure::PreconditionNotMet { .. } | StageFailure::StateViolation(_)
        )
    }
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors returned by `PipelineExecutor::execute`.
///
/// Every variant carries the stage history accumulated up to the abort so the
/// caller can diagnose where the run stopped. No partial dashboard is ever
/// returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum PipelineError {
    /// A stage failed and the pipeline halted at that stage.
    #[error("stage {failed_stage} failed: {cause}")]
    StageFailed {
        /// The stage that failed.
        failed_stage: StageKind,
        /// The failure the stage reported.
        cause: StageFailure,
        /// History up to and including the failed entry.
        history: Vec<StageRecord>,
    },

    /// The run was cancelled before `next_stage` started.
    #[error("analysis cancelled before {next_stage}")]
    Cancelled {
        /// The stage that was not started.
        next_stage: StageKind,
        /// History of the stages that did run.
        history: Vec<StageRecord>,
    },
}

impl PipelineError {
    /// The stage that failed, if the run did not end by cancellation.
    pub fn failed_stage(&self) -> Option<StageKind> {
        match self {
            PipelineError::StageFailed { failed_stage, .. } => Some(*failed_stage),
            PipelineError::Cancelled { .. } => None,
        }
    }

    /// The stage failure, if any.
    pub fn cause(&self) -> Option<&StageFailure> {
        match self {
            PipelineError::StageFailed { cause, .. } => Some(cause),
            PipelineError::Cancelled { .. } => None,
        }
    }

    /// The stage history accumulated before the abort.
    pub fn history(&self) -> &[StageRecord] {
        match self {
            PipelineError::StageFailed { history, .. } | PipelineError::Cancelled { history, .. } => {
                history
            }
        }
    }

    /// Returns the retry policy for the whole run.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            PipelineError::StageFailed { cause, .. } => cause.retry_policy(),
            PipelineError::Cancelled { .. } => RetryPolicy::NonRetryable,
        }
    }
}
