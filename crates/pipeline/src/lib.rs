//! Core domain for organizational communication analysis.
//!
//! This crate contains every domain concept used by the analysis pipeline:
//! the organizational state threaded through the stages, leadership profiles,
//! judgments, the profile adapter, the dashboard policy, and the port traits
//! infrastructure crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`AnalysisRunId`, `SpeakerName`, etc.) |
//! | [`types`] | Value types (`JudgmentScore`, `DirectnessLevel`, `CommunicationType`, etc.) |
//! | [`errors`] | Error taxonomy and retry policy |
//! | [`stage`] | Stage kinds, history records, state fields, cancellation |
//! | [`segment`] | Raw records and normalized segments |
//! | [`dynamics`] | Team participation statistics |
//! | [`judgment`] | Judgments and response validation |
//! | [`profile`] | Leadership profiles and their validation |
//! | [`state`] | The write-once organizational state |
//! | [`adapter`] | Profile → prompt selector and dashboard weights |
//! | [`dashboard`] | The dashboard and its assembly policy |
//! | [`ports`] | Collaborator traits |

pub mod adapter;
pub mod dashboard;
pub mod dynamics;
pub mod errors;
pub mod identifiers;
pub mod judgment;
pub mod ports;
pub mod profile;
pub mod segment;
pub mod stage;
pub mod state;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use adapter::{
    Dimension, DimensionWeights, ProfileAdapter, PromptSelector, ToneTemplate, BASE_WEIGHT,
    FOCUS_BOOST,
};
pub use dashboard::{
    AnalysisMetadata, AnalysisResult, DashboardAssembler, DimensionScores, Recommendations,
    RiskLevel, STRENGTH_THRESHOLD,
};
pub use dynamics::{SpeakerStats, TeamDynamics};
pub use errors::{
    ClientError, ParseError, PipelineError, ProfileError, RetryPolicy, StageFailure,
    StateViolation,
};
pub use identifiers::{AnalysisRunId, CompanyName, LeaderName, SpeakerName};
pub use judgment::{Finding, Judgment, MalformedJudgment};
pub use ports::{CommunicationParser, LanguageModelClient, PromptProvider};
pub use profile::{
    FocusArea, InterventionPreference, LeadershipProfile, LeadershipStyle, ProfileConfig,
    ProfileUpdate,
};
pub use segment::{
    normalize_text, CommunicationRecord, Segment, SegmentSignals, ToneIndicators,
};
pub use stage::{CancellationFlag, StageKind, StageRecord, StageStatus, StateField};
pub use state::OrganizationalState;
pub use types::{CommunicationType, DirectnessLevel, JudgmentScore, Timestamp, Urgency};
