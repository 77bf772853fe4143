//! Leadership profiles: the caller-supplied configuration that steers prompt
//! selection and dashboard weighting.
//!
//! Profiles arrive as a [`ProfileConfig`] document (TOML or JSON) and are
//! validated into a [`LeadershipProfile`] before any analysis starts. Unknown
//! keys and unknown enum values are rejected at that point, never at analysis
//! time. A validated profile is immutable; [`LeadershipProfile::update_profile`]
//! produces a new one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::ProfileError;
use crate::identifiers::{CompanyName, LeaderName};
use crate::types::DirectnessLevel;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// The leader's habitual communication style. Selects the prompt tone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadershipStyle {
    /// Builds consensus; invites input before deciding.
    #[default]
    Collaborative,
    /// Sets direction and expects execution.
    Directive,
    /// Develops people through questions and feedback.
    Coaching,
    /// Focuses on long-range positioning and priorities.
    Strategic,
}

/// How the leader prefers to intervene when problems surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionPreference {
    /// Work through managers with guidance and questions.
    #[default]
    Coaching,
    /// Step in and direct the fix.
    Directive,
    /// Observe; intervene only on critical issues.
    HandsOff,
}

// ---------------------------------------------------------------------------
// Focus areas
// ---------------------------------------------------------------------------

/// A normalized focus area label.
///
/// Labels are lowercased, trimmed, and have internal spaces and hyphens folded
/// to underscores, so `"Team Dynamics"` and `"team-dynamics"` are the same area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FocusArea(String);

impl FocusArea {
    /// Normalizes `label`, returning `None` if nothing remains.
    pub fn new(label: &str) -> Option<Self> {
        let normalized = label
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_");
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// Returns the normalized label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FocusArea {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| "focus area must not be blank".to_string())
    }
}

impl From<FocusArea> for String {
    fn from(value: FocusArea) -> Self {
        value.0
    }
}

impl std::fmt::Display for FocusArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn focus_set(labels: &[String]) -> Result<BTreeSet<FocusArea>, ProfileError> {
    labels
        .iter()
        .map(|label| {
            FocusArea::new(label).ok_or_else(|| ProfileError::InvalidField {
                field: "focus_areas".to_string(),
                reason: "focus areas must not be blank".to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Configuration documents
// ---------------------------------------------------------------------------

/// Unvalidated profile document as read from a file or request body.
///
/// Every recognized option is listed; anything else is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Leader's name.
    pub name: String,
    /// Organization name.
    pub company: String,
    /// Communication style. Defaults to `collaborative`.
    #[serde(default)]
    pub leadership_style: LeadershipStyle,
    /// Focus areas; duplicates (after normalization) are merged.
    #[serde(default)]
    pub focus_areas: Vec<String>,
    /// Intervention preference. Defaults to `coaching`.
    #[serde(default)]
    pub intervention_preference: InterventionPreference,
    /// Directness in `[0, 1]`; out-of-range values are clamped. Defaults to `0.5`.
    #[serde(default)]
    pub directness_level: Option<f64>,
}

/// Changes to apply with [`LeadershipProfile::update_profile`].
///
/// `None` fields leave the current value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    /// New communication style.
    #[serde(default)]
    pub leadership_style: Option<LeadershipStyle>,
    /// Replaces the focus areas entirely.
    #[serde(default)]
    pub focus_areas: Option<Vec<String>>,
    /// Added to the (possibly replaced) focus areas.
    #[serde(default)]
    pub add_focus_areas: Vec<String>,
    /// New intervention preference.
    #[serde(default)]
    pub intervention_preference: Option<InterventionPreference>,
    /// New directness; clamped.
    #[serde(default)]
    pub directness_level: Option<f64>,
}

// ---------------------------------------------------------------------------
// Validated profile
// ---------------------------------------------------------------------------

/// A validated leadership profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadershipProfile {
    name: LeaderName,
    company: CompanyName,
    leadership_style: LeadershipStyle,
    focus_areas: BTreeSet<FocusArea>,
    intervention_preference: InterventionPreference,
    directness_level: DirectnessLevel,
}

impl LeadershipProfile {
    /// Creates a profile with default style, preference, and directness.
    pub fn new(name: LeaderName, company: CompanyName) -> Self {
        Self {
            name,
            company,
            leadership_style: LeadershipStyle::default(),
            focus_areas: BTreeSet::new(),
            intervention_preference: InterventionPreference::default(),
            directness_level: DirectnessLevel::default(),
        }
    }

    /// Sets the leadership style.
    pub fn with_style(mut self, style: LeadershipStyle) -> Self {
        self.leadership_style = style;
        self
    }

    /// Adds focus areas; blank labels are ignored.
    pub fn with_focus_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.focus_areas
            .extend(areas.into_iter().filter_map(|a| FocusArea::new(a.as_ref())));
        self
    }

    /// Sets the intervention preference.
    pub fn with_intervention_preference(mut self, preference: InterventionPreference) -> Self {
        self.intervention_preference = preference;
        self
    }

    /// Sets the directness level, clamping into `[0, 1]`.
    pub fn with_directness(mut self, level: f64) -> Self {
        self.directness_level = DirectnessLevel::clamped(level);
        self
    }

    /// Parses and validates a JSON profile document.
    pub fn from_json(document: &str) -> Result<Self, ProfileError> {
        let config: ProfileConfig =
            serde_json::from_str(document).map_err(|e| ProfileError::Malformed(e.to_string()))?;
        Self::try_from(config)
    }

    /// Returns a new profile with `update` applied. `self` is unchanged.
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<Self, ProfileError> {
        let mut next = self.clone();
        if let Some(style) = update.leadership_style {
            next.leadership_style = style;
        }
        if let Some(replacement) = &update.focus_areas {
            next.focus_areas = focus_set(replacement)?;
        }
        next.focus_areas.extend(focus_set(&update.add_focus_areas)?);
        if let Some(preference) = update.intervention_preference {
            next.intervention_preference = preference;
        }
        if let Some(level) = update.directness_level {
            next.directness_level = DirectnessLevel::clamped(level);
        }
        Ok(next)
    }

    /// Leader's name.
    pub fn name(&self) -> &LeaderName {
        &self.name
    }

    /// Organization name.
    pub fn company(&self) -> &CompanyName {
        &self.company
    }

    /// Communication style.
    pub fn leadership_style(&self) -> LeadershipStyle {
        self.leadership_style
    }

    /// Normalized, deduplicated focus areas in sorted order.
    pub fn focus_areas(&self) -> &BTreeSet<FocusArea> {
        &self.focus_areas
    }

    /// Intervention preference.
    pub fn intervention_preference(&self) -> InterventionPreference {
        self.intervention_preference
    }

    /// Directness level in `[0, 1]`.
    pub fn directness_level(&self) -> DirectnessLevel {
        self.directness_level
    }
}

impl TryFrom<ProfileConfig> for LeadershipProfile {
    type Error = ProfileError;

    fn try_from(config: ProfileConfig) -> Result<Self, Self::Error> {
        let name = LeaderName::new(config.name).ok_or_else(|| ProfileError::InvalidField {
            field: "name".to_string(),
            reason: "must not be blank".to_string(),
        })?;
        let company = CompanyName::new(config.company).ok_or_else(|| ProfileError::InvalidField {
            field: "company".to_string(),
            reason: "must not be blank".to_string(),
        })?;

        Ok(Self {
            name,
            company,
            leadership_style: config.leadership_style,
            focus_areas: focus_set(&config.focus_areas)?,
            intervention_preference: config.intervention_preference,
            directness_level: config
                .directness_level
                .map(DirectnessLevel::clamped)
                .unwrap_or_default(),
        })
    }
}
