//! The organizational state threaded through one analysis run.
//!
//! Every stage output field is write-once: its setter fails with
//! [`StateViolation`] if the field already holds a value. The stage history is
//! append-only. A fresh state is created per run and dropped after the
//! dashboard has been handed to the caller.

use crate::dashboard::AnalysisResult;
use crate::dynamics::TeamDynamics;
use crate::errors::StateViolation;
use crate::judgment::Judgment;
use crate::segment::{CommunicationRecord, Segment};
use crate::stage::{StageKind, StageRecord, StageStatus, StateField};
use crate::types::Timestamp;

/// Writes `value` into `slot` unless it is already populated.
fn write_once<T>(slot: &mut Option<T>, value: T, field: StateField) -> Result<(), StateViolation> {
    if slot.is_some() {
        return Err(StateViolation { field });
    }
    *slot = Some(value);
    Ok(())
}

/// Progressively-enriched record of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct OrganizationalState {
    raw_messages: Vec<CommunicationRecord>,
    normalized_segments: Option<Vec<Segment>>,
    team_dynamics: Option<TeamDynamics>,
    leadership_findings: Option<Judgment>,
    team_health_findings: Option<Judgment>,
    risk_findings: Option<Judgment>,
    dashboard: Option<AnalysisResult>,
    stage_history: Vec<StageRecord>,
}

impl OrganizationalState {
    /// Creates a state holding only the raw input.
    pub fn new(raw_messages: Vec<CommunicationRecord>) -> Self {
        Self {
            raw_messages,
            ..Self::default()
        }
    }

    /// Appends a history entry stamped with the current time. Never fails.
    pub fn record(&mut self, stage: StageKind, status: StageStatus) {
        self.stage_history.push(StageRecord {
            stage,
            status,
            at: Timestamp::now(),
        });
    }

    /// Returns `true` if `field` has been written.
    ///
    /// `raw_messages` and `stage_history` exist from construction.
    pub fn is_written(&self, field: StateField) -> bool {
        match field {
            StateField::RawMessages | StateField::StageHistory => true,
            StateField::NormalizedSegments => self.normalized_segments.is_some(),
            StateField::TeamDynamics => self.team_dynamics.is_some(),
            StateField::LeadershipFindings => self.leadership_findings.is_some(),
            StateField::TeamHealthFindings => self.team_health_findings.is_some(),
            StateField::RiskFindings => self.risk_findings.is_some(),
            StateField::Dashboard => self.dashboard.is_some(),
        }
    }

    // -----------------------------------------------------------------------
    // Setters (write-once)
    // -----------------------------------------------------------------------

    /// Writes the normalized segments.
    pub fn set_normalized_segments(&mut self, segments: Vec<Segment>) -> Result<(), StateViolation> {
        write_once(&mut self.normalized_segments, segments, StateField::NormalizedSegments)
    }

    /// Writes the team dynamics.
    pub fn set_team_dynamics(&mut self, dynamics: TeamDynamics) -> Result<(), StateViolation> {
        write_once(&mut self.team_dynamics, dynamics, StateField::TeamDynamics)
    }

    /// Writes the leadership judgment.
    pub fn set_leadership_findings(&mut self, judgment: Judgment) -> Result<(), StateViolation> {
        write_once(&mut self.leadership_findings, judgment, StateField::LeadershipFindings)
    }

    /// Writes the team-health judgment.
    pub fn set_team_health_findings(&mut self, judgment: Judgment) -> Result<(), StateViolation> {
        write_once(&mut self.team_health_findings, judgment, StateField::TeamHealthFindings)
    }

    /// Writes the risk judgment.
    pub fn set_risk_findings(&mut self, judgment: Judgment) -> Result<(), StateViolation> {
        write_once(&mut self.risk_findings, judgment, StateField::RiskFindings)
    }

    /// Writes the dashboard.
    pub fn set_dashboard(&mut self, dashboard: AnalysisResult) -> Result<(), StateViolation> {
        write_once(&mut self.dashboard, dashboard, StateField::Dashboard)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The raw input records.
    pub fn raw_messages(&self) -> &[CommunicationRecord] {
        &self.raw_messages
    }

    /// Normalized segments, once Preprocess has run.
    pub fn normalized_segments(&self) -> Option<&[Segment]> {
        self.normalized_segments.as_deref()
    }

    /// Team dynamics, once Preprocess has run.
    pub fn team_dynamics(&self) -> Option<&TeamDynamics> {
        self.team_dynamics.as_ref()
    }

    /// Leadership judgment, once LeadershipAnalysis has run.
    pub fn leadership_findings(&self) -> Option<&Judgment> {
        self.leadership_findings.as_ref()
    }

    /// Team-health judgment, once TeamHealthAnalysis has run.
    pub fn team_health_findings(&self) -> Option<&Judgment> {
        self.team_health_findings.as_ref()
    }

    /// Risk judgment, once RiskDetection has run.
    pub fn risk_findings(&self) -> Option<&Judgment> {
        self.risk_findings.as_ref()
    }

    /// The dashboard, once Summary has run.
    pub fn dashboard(&self) -> Option<&AnalysisResult> {
        self.dashboard.as_ref()
    }

    /// The stage history in append order.
    pub fn stage_history(&self) -> &[StageRecord] {
        &self.stage_history
    }

    /// The most recent recorded status of `stage`, if any.
    pub fn status_of(&self, stage: StageKind) -> Option<StageStatus> {
        self.stage_history
            .iter()
            .rev()
            .find(|r| r.stage == stage)
            .map(|r| r.status)
    }

    /// Consumes the state, returning the dashboard and the history.
    pub fn into_parts(self) -> (Option<AnalysisResult>, Vec<StageRecord>) {
        (self.dashboard, self.stage_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgment::Finding;
    use crate::types::{CommunicationType, JudgmentScore};

    fn judgment(score: f64) -> Judgment {
        Judgment::new(
            JudgmentScore::new(score).unwrap(),
            vec![Finding::observation("steady")],
            "because",
        )
    }

    #[test]
    fn new_state_holds_only_raw_input() {
        let state = OrganizationalState::new(vec![CommunicationRecord::new(
            CommunicationType::TeamMeeting,
            "Alex: hi",
        )]);
        assert_eq!(state.raw_messages().len(), 1);
        assert!(state.is_written(StateField::RawMessages));
        assert!(!state.is_written(StateField::NormalizedSegments));
        assert!(state.leadership_findings().is_none());
        assert!(state.stage_history().is_empty());
    }

    #[test]
    fn setters_are_write_once() {
        let mut state = OrganizationalState::default();
        state.set_leadership_findings(judgment(8.0)).unwrap();

        let err = state.set_leadership_findings(judgment(2.0)).unwrap_err();

        assert_eq!(err.field, StateField::LeadershipFindings);
        assert_eq!(state.leadership_findings().unwrap().score.as_f64(), 8.0);
    }

    #[test]
    fn each_field_is_independent() {
        let mut state = OrganizationalState::default();
        state.set_normalized_segments(vec![]).unwrap();
        state.set_team_dynamics(TeamDynamics::default()).unwrap();
        state.set_risk_findings(judgment(5.0)).unwrap();
        assert!(state.set_normalized_segments(vec![]).is_err());
        assert!(state.set_team_health_findings(judgment(6.0)).is_ok());
    }

    #[test]
    fn history_is_append_only_and_latest_status_wins() {
        let mut state = OrganizationalState::default();
        state.record(StageKind::Preprocess, StageStatus::Ok);
        state.record(StageKind::LeadershipAnalysis, StageStatus::Failed);

        assert_eq!(state.stage_history().len(), 2);
        assert_eq!(state.status_of(StageKind::Preprocess), Some(StageStatus::Ok));
        assert_eq!(
            state.status_of(StageKind::LeadershipAnalysis),
            Some(StageStatus::Failed)
        );
        assert_eq!(state.status_of(StageKind::Summary), None);
        assert!(state.stage_history()[0].at <= state.stage_history()[1].at);
    }
}
