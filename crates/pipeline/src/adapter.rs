//! Profile adapter: maps a [`LeadershipProfile`] onto stage configuration.
//!
//! Two outputs, both pure functions of the profile and the registered
//! overrides:
//!
//! - [`PromptSelector`]: everything a [`crate::PromptProvider`] needs to pick
//!   and parameterize a stage prompt.
//! - [`DimensionWeights`]: the dashboard weighting of the three judgment
//!   dimensions, always normalized to sum to 1.
//!
//! Weighting rule: each dimension starts at [`BASE_WEIGHT`]; a dimension whose
//! focus-area table intersects the profile's focus areas gains
//! [`FOCUS_BOOST`] once; the three weights are then divided by their sum.
//! Directness never affects weighting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::profile::{FocusArea, InterventionPreference, LeadershipProfile, LeadershipStyle};
use crate::stage::StageKind;
use crate::types::DirectnessLevel;

/// Starting weight of every dimension before focus boosts.
pub const BASE_WEIGHT: f64 = 1.0;

/// Added to a dimension's weight when the profile focuses on it.
pub const FOCUS_BOOST: f64 = 0.5;

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// One of the three judged dimensions of communication health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Leadership communication effectiveness.
    Leadership,
    /// Team alignment and engagement.
    TeamHealth,
    /// Absence of early-warning risk signals.
    Risk,
}

impl Dimension {
    /// All dimensions in dashboard order.
    pub const ALL: [Dimension; 3] = [Dimension::Leadership, Dimension::TeamHealth, Dimension::Risk];

    /// Focus-area labels (normalized form) that boost this dimension.
    pub fn focus_table(self) -> &'static [&'static str] {
        match self {
            Dimension::Leadership => &[
                "leadership",
                "communication",
                "decision_making",
                "transparency",
                "accountability",
                "delegation",
            ],
            Dimension::TeamHealth => &[
                "team_dynamics",
                "engagement",
                "collaboration",
                "alignment",
                "culture",
                "morale",
                "psychological_safety",
            ],
            Dimension::Risk => &[
                "risk",
                "retention",
                "burnout",
                "conflict",
                "execution",
                "attrition",
            ],
        }
    }

    /// The stage that judges this dimension.
    pub fn stage(self) -> StageKind {
        match self {
            Dimension::Leadership => StageKind::LeadershipAnalysis,
            Dimension::TeamHealth => StageKind::TeamHealthAnalysis,
            Dimension::Risk => StageKind::RiskDetection,
        }
    }

    fn matches(self, areas: &[FocusArea]) -> bool {
        let table = self.focus_table();
        areas.iter().any(|area| table.contains(&area.as_str()))
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Dimension::Leadership => "leadership",
            Dimension::TeamHealth => "team_health",
            Dimension::Risk => "risk",
        })
    }
}

/// Normalized dashboard weights; the three fields sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeights {
    /// Weight of the leadership score.
    pub leadership: f64,
    /// Weight of the team-health score.
    pub team_health: f64,
    /// Weight of the risk score.
    pub risk: f64,
}

impl DimensionWeights {
    /// Equal weights (one third each).
    pub fn equal() -> Self {
        Self::normalized(BASE_WEIGHT, BASE_WEIGHT, BASE_WEIGHT)
    }

    fn normalized(leadership: f64, team_health: f64, risk: f64) -> Self {
        let total = leadership + team_health + risk;
        Self {
            leadership: leadership / total,
            team_health: team_health / total,
            risk: risk / total,
        }
    }

    /// The weight of `dimension`.
    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Leadership => self.leadership,
            Dimension::TeamHealth => self.team_health,
            Dimension::Risk => self.risk,
        }
    }

    /// Sum of the three weights (1 up to floating-point rounding).
    pub fn sum(&self) -> f64 {
        self.leadership + self.team_health + self.risk
    }
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self::equal()
    }
}

// ---------------------------------------------------------------------------
// Prompt selection
// ---------------------------------------------------------------------------

/// Tone template selected by leadership style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneTemplate {
    /// Consensus-oriented framing for collaborative leaders.
    Consensus,
    /// Crisp, outcome-first framing for directive leaders.
    Decisive,
    /// Growth-oriented framing for coaching leaders.
    Developmental,
    /// Long-horizon framing for strategic leaders.
    Horizon,
}

impl From<LeadershipStyle> for ToneTemplate {
    fn from(style: LeadershipStyle) -> Self {
        match style {
            LeadershipStyle::Collaborative => ToneTemplate::Consensus,
            LeadershipStyle::Directive => ToneTemplate::Decisive,
            LeadershipStyle::Coaching => ToneTemplate::Developmental,
            LeadershipStyle::Strategic => ToneTemplate::Horizon,
        }
    }
}

/// Everything a prompt provider needs to produce one stage prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSelector {
    /// The stage the prompt is for.
    pub stage: StageKind,
    /// Tone derived from the leadership style.
    pub tone: ToneTemplate,
    /// Profile focus areas, sorted.
    pub focus_areas: Vec<FocusArea>,
    /// Controls imperative phrasing; not used for weighting.
    pub directness: DirectnessLevel,
    /// How recommendations should propose intervening.
    pub intervention_preference: InterventionPreference,
    /// Literal template that replaces the tone-derived one when present.
    pub custom_override: Option<String>,
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Deterministic profile → stage configuration mapping.
#[derive(Debug, Clone, Default)]
pub struct ProfileAdapter {
    overrides: BTreeMap<StageKind, String>,
}

impl ProfileAdapter {
    /// Creates an adapter with no prompt overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a literal template for `stage`, replacing any earlier one.
    pub fn with_override(mut self, stage: StageKind, template: impl Into<String>) -> Self {
        self.overrides.insert(stage, template.into());
        self
    }

    /// Selects the prompt configuration for `stage`.
    pub fn prompt_for(&self, stage: StageKind, profile: &LeadershipProfile) -> PromptSelector {
        PromptSelector {
            stage,
            tone: ToneTemplate::from(profile.leadership_style()),
            focus_areas: profile.focus_areas().iter().cloned().collect(),
            directness: profile.directness_level(),
            intervention_preference: profile.intervention_preference(),
            custom_override: self.overrides.get(&stage).cloned(),
        }
    }

    /// Computes normalized dashboard weights for `profile`.
    pub fn weights_for(&self, profile: &LeadershipProfile) -> DimensionWeights {
        let areas: Vec<FocusArea> = profile.focus_areas().iter().cloned().collect();
        let weight = |dimension: Dimension| {
            if dimension.matches(&areas) {
                BASE_WEIGHT + FOCUS_BOOST
            } else {
                BASE_WEIGHT
            }
        };
        DimensionWeights::normalized(
            weight(Dimension::Leadership),
            weight(Dimension::TeamHealth),
            weight(Dimension::Risk),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{CompanyName, LeaderName};
    use proptest::prelude::*;

    fn profile() -> LeadershipProfile {
        LeadershipProfile::new(
            LeaderName::new("Dana").unwrap(),
            CompanyName::new("Northwind").unwrap(),
        )
    }

    #[test]
    fn no_focus_areas_yield_equal_weights() {
        let weights = ProfileAdapter::new().weights_for(&profile());
        assert!((weights.leadership - 1.0 / 3.0).abs() < 1e-12);
        assert!((weights.team_health - 1.0 / 3.0).abs() < 1e-12);
        assert!((weights.risk - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn matching_focus_area_boosts_its_dimension_once() {
        let focused = profile().with_focus_areas(["Retention", "burnout", "unrelated"]);
        let weights = ProfileAdapter::new().weights_for(&focused);

        // 1.0 / 1.0 / 1.5, normalized by 3.5. Two risk areas still boost once.
        assert!((weights.risk - 1.5 / 3.5).abs() < 1e-12);
        assert!((weights.leadership - 1.0 / 3.5).abs() < 1e-12);
        assert!((weights.team_health - 1.0 / 3.5).abs() < 1e-12);
    }

    #[test]
    fn directness_does_not_change_weights() {
        let adapter = ProfileAdapter::new();
        let soft = profile().with_focus_areas(["culture"]).with_directness(0.0);
        let blunt = profile().with_focus_areas(["culture"]).with_directness(1.0);
        assert_eq!(adapter.weights_for(&soft), adapter.weights_for(&blunt));
    }

    #[test]
    fn selector_carries_style_tone_and_directness() {
        let p = profile()
            .with_style(LeadershipStyle::Directive)
            .with_directness(0.9)
            .with_focus_areas(["engagement"]);
        let selector = ProfileAdapter::new().prompt_for(StageKind::TeamHealthAnalysis, &p);

        assert_eq!(selector.stage, StageKind::TeamHealthAnalysis);
        assert_eq!(selector.tone, ToneTemplate::Decisive);
        assert_eq!(selector.directness.as_f64(), 0.9);
        assert_eq!(selector.focus_areas.len(), 1);
        assert!(selector.custom_override.is_none());
    }

    #[test]
    fn override_applies_only_to_its_stage() {
        let adapter = ProfileAdapter::new().with_override(StageKind::RiskDetection, "Custom risk prompt");
        assert_eq!(
            adapter
                .prompt_for(StageKind::RiskDetection, &profile())
                .custom_override
                .as_deref(),
            Some("Custom risk prompt")
        );
        assert!(adapter
            .prompt_for(StageKind::LeadershipAnalysis, &profile())
            .custom_override
            .is_none());
    }

    proptest! {
        #[test]
        fn weights_always_sum_to_one(areas in proptest::collection::vec("[a-z_ -]{0,16}", 0..12)) {
            let p = profile().with_focus_areas(areas.iter());
            let weights = ProfileAdapter::new().weights_for(&p);
            prop_assert!((weights.sum() - 1.0).abs() < 1e-9);
            prop_assert!(weights.leadership > 0.0 && weights.team_health > 0.0 && weights.risk > 0.0);
        }

        #[test]
        fn weights_sum_to_one_with_table_labels(mask in 0u8..8) {
            let mut areas = Vec::new();
            for (bit, dimension) in Dimension::ALL.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    areas.extend(dimension.focus_table().iter().copied());
                }
            }
            let weights = ProfileAdapter::new().weights_for(&profile().with_focus_areas(areas));
            prop_assert!((weights.sum() - 1.0).abs() < 1e-9);
        }
    }
}
