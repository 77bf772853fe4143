//! The CEO dashboard and the policy that assembles it from stage judgments.
//!
//! Assembly is a pure function of the state and the profile: no clock, no
//! randomness, no collaborator calls. Two assemblies of the same inputs
//! serialize to identical bytes.
//!
//! ## Policy
//!
//! - `overall_health_score` is the weighted sum of the three judgment scores,
//!   weights from [`ProfileAdapter::weights_for`].
//! - `risk_level` thresholds the risk score (which measures *absence* of
//!   risk): `>= 8` low, `>= 6` moderate, `>= 4` elevated, otherwise critical.
//! - Actionable findings are routed by urgency: immediate, thirty-day, or
//!   strategic; findings without urgency go to thirty-day. Findings are taken
//!   leadership first, then team health, then risk, each in original order;
//!   repeated text within a bucket is kept once.
//! - Observations become strengths when their dimension scores at least
//!   [`STRENGTH_THRESHOLD`], concerns otherwise.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::{Dimension, DimensionWeights, ProfileAdapter};
use crate::errors::StageFailure;
use crate::judgment::Judgment;
use crate::profile::LeadershipProfile;
use crate::stage::StateField;
use crate::state::OrganizationalState;
use crate::types::{CommunicationType, JudgmentScore, Urgency};

/// Dimension score at or above which observations read as strengths.
pub const STRENGTH_THRESHOLD: f64 = 7.0;

// ---------------------------------------------------------------------------
// Risk level
// ---------------------------------------------------------------------------

/// Organizational risk derived from the risk judgment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Score `>= 8`.
    Low,
    /// Score in `[6, 8)`.
    Moderate,
    /// Score in `[4, 6)`.
    Elevated,
    /// Score `< 4`.
    Critical,
}

impl RiskLevel {
    /// Thresholds a risk score. Boundaries belong to the healthier level.
    pub fn from_score(score: JudgmentScore) -> Self {
        let value = score.as_f64();
        if value >= 8.0 {
            RiskLevel::Low
        } else if value >= 6.0 {
            RiskLevel::Moderate
        } else if value >= 4.0 {
            RiskLevel::Elevated
        } else {
            RiskLevel::Critical
        }
    }

    /// Returns the snake_case label.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Elevated => "elevated",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Dashboard types
// ---------------------------------------------------------------------------

/// Recommendations bucketed by time horizon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Act this week.
    pub immediate: Vec<String>,
    /// Act within thirty days.
    pub thirty_day: Vec<String>,
    /// Longer-horizon initiatives.
    pub strategic: Vec<String>,
}

impl Recommendations {
    fn push(&mut self, urgency: Option<Urgency>, text: &str) {
        let bucket = match urgency.unwrap_or(Urgency::ThirtyDay) {
            Urgency::Immediate => &mut self.immediate,
            Urgency::ThirtyDay => &mut self.thirty_day,
            Urgency::Strategic => &mut self.strategic,
        };
        if !bucket.iter().any(|existing| existing == text) {
            bucket.push(text.to_string());
        }
    }

    /// Total recommendations across buckets.
    pub fn len(&self) -> usize {
        self.immediate.len() + self.thirty_day.len() + self.strategic.len()
    }

    /// Returns `true` when every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-dimension scores as judged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    /// Leadership effectiveness.
    pub leadership: f64,
    /// Team health.
    pub team_health: f64,
    /// Absence of risk.
    pub risk: f64,
}

/// Deterministic facts about what was analyzed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Normalized segments analyzed.
    pub segments_analyzed: usize,
    /// Segments authored by leaders.
    pub leadership_segments: usize,
    /// Distinct participants.
    pub participants: usize,
    /// Communication types present in the input, sorted.
    pub communication_types: Vec<CommunicationType>,
}

/// The CEO-facing report for one analysis run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Weighted combination of the three dimension scores, in `[0, 10]`.
    pub overall_health_score: f64,
    /// Risk level derived from the risk score.
    pub risk_level: RiskLevel,
    /// Per-dimension scores.
    pub dimension_scores: DimensionScores,
    /// Weights used for the overall score.
    pub weights: DimensionWeights,
    /// Bucketed recommendations.
    pub recommendations: Recommendations,
    /// Observations from healthy dimensions.
    pub strengths: Vec<String>,
    /// Observations from dimensions below the strength threshold.
    pub concerns: Vec<String>,
    /// What was analyzed.
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Renders the plain-text executive report.
    pub fn render_report(&self, profile: &LeadershipProfile) -> String {
        fn bullets(items: &[String]) -> String {
            if items.is_empty() {
                "  (none)".to_string()
            } else {
                items
                    .iter()
                    .map(|item| format!("  • {item}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }

        let types = self
            .metadata
            .communication_types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        [
            format!(
                "ORGANIZATIONAL COMMUNICATION REPORT: {} ({})",
                profile.company(),
                profile.name()
            ),
            String::new(),
            "EXECUTIVE OVERVIEW".to_string(),
            format!("  Overall health:  {:.1}/10", self.overall_health_score),
            format!("  Leadership:      {:.1}/10", self.dimension_scores.leadership),
            format!("  Team health:     {:.1}/10", self.dimension_scores.team_health),
            format!("  Risk level:      {}", self.risk_level),
            format!("  Sources:         {types}"),
            String::new(),
            "KEY STRENGTHS".to_string(),
            bullets(&self.strengths),
            String::new(),
            "AREAS OF FOCUS".to_string(),
            bullets(&self.concerns),
            String::new(),
            "IMMEDIATE ACTIONS".to_string(),
            bullets(&self.recommendations.immediate),
            String::new(),
            "30-DAY FOCUS".to_string(),
            bullets(&self.recommendations.thirty_day),
            String::new(),
            "STRATEGIC INITIATIVES".to_string(),
            bullets(&self.recommendations.strategic),
            String::new(),
            format!(
                "Analyzed {} segments from {} participants.",
                self.metadata.segments_analyzed, self.metadata.participants
            ),
        ]
        .join("\n")
    }
}

// ---------------------------------------------------------------------------
// Assembler
// ---------------------------------------------------------------------------

/// Reduces the stage judgments into an [`AnalysisResult`].
#[derive(Debug, Clone, Default)]
pub struct DashboardAssembler {
    adapter: ProfileAdapter,
}

impl DashboardAssembler {
    /// Creates an assembler that weights dimensions with `adapter`.
    pub fn new(adapter: ProfileAdapter) -> Self {
        Self { adapter }
    }

    /// Builds the dashboard from a state whose judgments are all written.
    ///
    /// Fails with [`StageFailure::PreconditionNotMet`] naming the first absent
    /// input field.
    pub fn assemble(
        &self,
        state: &OrganizationalState,
        profile: &LeadershipProfile,
    ) -> Result<AnalysisResult, StageFailure> {
        let missing = |field| StageFailure::PreconditionNotMet { missing: field };
        let segments = state
            .normalized_segments()
            .ok_or_else(|| missing(StateField::NormalizedSegments))?;
        let leadership = state
            .leadership_findings()
            .ok_or_else(|| missing(StateField::LeadershipFindings))?;
        let team_health = state
            .team_health_findings()
            .ok_or_else(|| missing(StateField::TeamHealthFindings))?;
        let risk = state
            .risk_findings()
            .ok_or_else(|| missing(StateField::RiskFindings))?;

        let judged: [(Dimension, &Judgment); 3] = [
            (Dimension::Leadership, leadership),
            (Dimension::TeamHealth, team_health),
            (Dimension::Risk, risk),
        ];

        let weights = self.adapter.weights_for(profile);
        let overall_health_score: f64 = judged
            .iter()
            .map(|(dimension, judgment)| weights.weight(*dimension) * judgment.score.as_f64())
            .sum();

        let mut recommendations = Recommendations::default();
        let mut strengths = Vec::new();
        let mut concerns = Vec::new();
        for (_, judgment) in &judged {
            for action in judgment.actions() {
                recommendations.push(action.urgency, &action.text);
            }
            let target = if judgment.score.as_f64() >= STRENGTH_THRESHOLD {
                &mut strengths
            } else {
                &mut concerns
            };
            target.extend(judgment.observations().map(|f| f.text.clone()));
        }

        let mut communication_types: Vec<CommunicationType> =
            segments.iter().map(|s| s.source).collect();
        communication_types.sort();
        communication_types.dedup();

        let metadata = AnalysisMetadata {
            segments_analyzed: segments.len(),
            leadership_segments: segments.iter().filter(|s| s.signals.is_leadership).count(),
            participants: state
                .team_dynamics()
                .map(|d| d.total_participants)
                .unwrap_or_default(),
            communication_types,
        };

        let risk_level = RiskLevel::from_score(risk.score);
        debug!(
            overall_health_score,
            risk_level = %risk_level,
            recommendations = recommendations.len(),
            "Dashboard assembled"
        );

        Ok(AnalysisResult {
            overall_health_score,
            risk_level,
            dimension_scores: DimensionScores {
                leadership: leadership.score.as_f64(),
                team_health: team_health.score.as_f64(),
                risk: risk.score.as_f64(),
            },
            weights,
            recommendations,
            strengths,
            concerns,
            metadata,
        })
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
