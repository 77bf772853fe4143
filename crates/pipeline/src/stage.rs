//! Stage vocabulary shared by the state, the stages, and the executor.
//!
//! The analysis sequence is fixed: [`StageKind::ORDER`] is the single source
//! of truth for which stages exist and in what order they run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// One stage of the fixed analysis sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StageKind {
    /// Parse and normalize raw records into segments.
    Preprocess,
    /// Judge leadership communication effectiveness.
    LeadershipAnalysis,
    /// Judge team alignment and engagement.
    TeamHealthAnalysis,
    /// Judge early-warning risk signals.
    RiskDetection,
    /// Aggregate the judgments into the dashboard.
    Summary,
}

impl StageKind {
    /// The execution order. Stages run exactly in this sequence.
    pub const ORDER: [StageKind; 5] = [
        StageKind::Preprocess,
        StageKind::LeadershipAnalysis,
        StageKind::TeamHealthAnalysis,
        StageKind::RiskDetection,
        StageKind::Summary,
    ];

    /// Returns the stage name used in logs, history, and prompt overrides.
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Preprocess => "Preprocess",
            StageKind::LeadershipAnalysis => "LeadershipAnalysis",
            StageKind::TeamHealthAnalysis => "TeamHealthAnalysis",
            StageKind::RiskDetection => "RiskDetection",
            StageKind::Summary => "Summary",
        }
    }

    /// Returns the stages that run strictly before this one.
    pub fn predecessors(self) -> &'static [StageKind] {
        let position = Self::ORDER
            .iter()
            .position(|s| *s == self)
            .unwrap_or(Self::ORDER.len());
        &Self::ORDER[..position]
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StageKind {
    type Err = String;

    /// Accepts the stage name in either `PascalCase` or `snake_case`
    /// (`"TeamHealthAnalysis"`, `"team_health_analysis"`, `"team_health"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "preprocess" => Ok(StageKind::Preprocess),
            "leadershipanalysis" | "leadership" => Ok(StageKind::LeadershipAnalysis),
            "teamhealthanalysis" | "teamhealth" => Ok(StageKind::TeamHealthAnalysis),
            "riskdetection" | "risk" => Ok(StageKind::RiskDetection),
            "summary" => Ok(StageKind::Summary),
            _ => Err(format!("unknown stage '{s}'")),
        }
    }
}

// ---------------------------------------------------------------------------

/// Outcome of a stage as recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage completed and its output was written.
    Ok,
    /// The stage failed; the pipeline halted here.
    Failed,
    /// The stage did not run.
    Skipped,
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StageStatus::Ok => "ok",
            StageStatus::Failed => "failed",
            StageStatus::Skipped => "skipped",
        })
    }
}

/// One entry of the append-only stage history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    /// The stage the entry describes.
    pub stage: StageKind,
    /// What happened to it.
    pub status: StageStatus,
    /// When the entry was appended.
    pub at: Timestamp,
}

// ---------------------------------------------------------------------------

/// A named field of the organizational state.
///
/// Stages declare their read preconditions and write-sets in terms of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    /// The raw input records.
    RawMessages,
    /// Normalized segments written by Preprocess.
    NormalizedSegments,
    /// Participation statistics written by Preprocess.
    TeamDynamics,
    /// Judgment written by LeadershipAnalysis.
    LeadershipFindings,
    /// Judgment written by TeamHealthAnalysis.
    TeamHealthFindings,
    /// Judgment written by RiskDetection.
    RiskFindings,
    /// The append-only stage log.
    StageHistory,
    /// The aggregated dashboard written by Summary.
    Dashboard,
}

impl std::fmt::Display for StateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StateField::RawMessages => "raw_messages",
            StateField::NormalizedSegments => "normalized_segments",
            StateField::TeamDynamics => "team_dynamics",
            StateField::LeadershipFindings => "leadership_findings",
            StateField::TeamHealthFindings => "team_health_findings",
            StateField::RiskFindings => "risk_findings",
            StateField::StageHistory => "stage_history",
            StateField::Dashboard => "dashboard",
        })
    }
}

// ---------------------------------------------------------------------------

/// Cooperative cancellation signal for one analysis run.
///
/// Clones share the same flag. The executor checks it before starting each
/// stage; an in-flight collaborator call is bounded by its timeout instead.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
