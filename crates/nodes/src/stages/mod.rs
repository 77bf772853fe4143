//! The five analysis stages, in execution order.
//!
//! | Stage | Reads | Writes | Language model call |
//! |-------|-------|--------|---------------------|
//! | [`Preprocess`] | raw messages | segments, team dynamics | no |
//! | [`LeadershipAnalysis`] | segments, dynamics | leadership findings | yes |
//! | [`TeamHealthAnalysis`] | segments, dynamics | team-health findings | yes |
//! | [`RiskDetection`] | segments, both findings | risk findings | yes |
//! | [`Summary`] | all findings, history | dashboard | no |

mod judge;
mod leadership;
mod preprocess;
mod risk;
mod summary;
mod team_health;

pub use leadership::LeadershipAnalysis;
pub use preprocess::Preprocess;
pub use risk::RiskDetection;
pub use summary::Summary;
pub use team_health::TeamHealthAnalysis;

use crate::stage::AnalysisStage;

/// The fixed analysis sequence.
pub fn default_stages() -> Vec<Box<dyn AnalysisStage>> {
    vec![
        Box::new(Preprocess),
        Box::new(LeadershipAnalysis),
        Box::new(TeamHealthAnalysis),
        Box::new(RiskDetection),
        Box::new(Summary),
    ]
}
