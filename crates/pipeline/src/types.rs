//! Shared value types for the analysis domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (scores are in `[0.0, 10.0]`, directness
//! is in `[0.0, 1.0]`) and participate in domain computations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

// ---------------------------------------------------------------------------
// Communication types
// ---------------------------------------------------------------------------

/// The kind of organizational communication a record or segment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationType {
    /// Team meeting transcript (`Speaker: text` lines).
    TeamMeeting,
    /// Leadership email thread (`From:` / `Subject:` blocks).
    LeadershipEmail,
    /// Company-wide all-hands notes or transcript.
    AllHands,
    /// Slack channel export (JSON array of messages).
    SlackChannel,
}

impl CommunicationType {
    /// Every recognized communication type, in declaration order.
    pub const ALL: [CommunicationType; 4] = [
        CommunicationType::TeamMeeting,
        CommunicationType::LeadershipEmail,
        CommunicationType::AllHands,
        CommunicationType::SlackChannel,
    ];

    /// Returns the canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            CommunicationType::TeamMeeting => "team_meeting",
            CommunicationType::LeadershipEmail => "leadership_email",
            CommunicationType::AllHands => "all_hands",
            CommunicationType::SlackChannel => "slack_channel",
        }
    }

    /// Returns `true` for sources the leadership analysis reads.
    pub fn is_leadership_channel(self) -> bool {
        matches!(
            self,
            CommunicationType::LeadershipEmail | CommunicationType::AllHands
        )
    }

    /// Returns `true` for sources the team-health analysis reads.
    pub fn is_team_channel(self) -> bool {
        matches!(
            self,
            CommunicationType::TeamMeeting | CommunicationType::SlackChannel
        )
    }
}

impl std::fmt::Display for CommunicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommunicationType {
    type Err = ParseError;

    /// Parses a canonical name. Unknown names are rejected, never guessed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CommunicationType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ParseError::UnsupportedFormat {
                communication_type: s.to_string(),
                reason: "unrecognized communication type".to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Score types
// ---------------------------------------------------------------------------

/// A judgment score in the range `[0.0, 10.0]`.
///
/// Produced by the language-model stages; higher is healthier. For the risk
/// dimension the score measures the *absence* of risk.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct JudgmentScore(f64);

impl JudgmentScore {
    /// Upper bound of the score range.
    pub const MAX: f64 = 10.0;

    /// Creates a [`JudgmentScore`], returning `None` if `value` is outside
    /// `[0.0, 10.0]` or not finite.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=Self::MAX).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the score as an `f64` in `[0.0, 10.0]`.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for JudgmentScore {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("score {value} is outside [0, 10]"))
    }
}

impl From<JudgmentScore> for f64 {
    fn from(value: JudgmentScore) -> Self {
        value.0
    }
}

impl std::fmt::Display for JudgmentScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// How bluntly recommendations should be phrased, in `[0.0, 1.0]`.
///
/// Construction always clamps; there is no way to hold an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct DirectnessLevel(f64);

impl DirectnessLevel {
    /// Creates a [`DirectnessLevel`], clamping into `[0.0, 1.0]`.
    ///
    /// NaN maps to the default level.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self::default()
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Returns the level as an `f64` in `[0.0, 1.0]`.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl Default for DirectnessLevel {
    fn default() -> Self {
        Self(0.5)
    }
}

impl From<f64> for DirectnessLevel {
    fn from(value: f64) -> Self {
        Self::clamped(value)
    }
}

impl From<DirectnessLevel> for f64 {
    fn from(value: DirectnessLevel) -> Self {
        value.0
    }
}

impl std::fmt::Display for DirectnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// How soon an actionable finding should be acted on.
///
/// Declared by the language model per finding; used to route recommendations
/// into dashboard buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Act this week.
    Immediate,
    /// Act within the next month.
    ThirtyDay,
    /// Longer-horizon initiative.
    Strategic,
}

impl std::str::FromStr for Urgency {
    type Err = String;

    /// Accepts the canonical names plus the common spellings models produce
    /// (`"30_day"`, `"30-day"`, `"short_term"`, `"long_term"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "immediate" | "urgent" | "now" => Ok(Urgency::Immediate),
            "thirty_day" | "30_day" | "30_days" | "short_term" => Ok(Urgency::ThirtyDay),
            "strategic" | "long_term" => Ok(Urgency::Strategic),
            _ => Err(format!("unknown urgency '{s}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
