//! Judgments: the structured verdict each language-model stage produces.
//!
//! Collaborator responses are untrusted. [`Judgment::from_response`] validates
//! the JSON shape field by field and reports the first violation as a
//! [`MalformedJudgment`]; nothing is defaulted into a fabricated score.
//!
//! Accepted response shape:
//!
//! ```json
//! {
//!   "score": 7.5,
//!   "key_findings": [
//!     "Plain observation",
//!     { "text": "Schedule skip-level 1:1s", "actionable": true, "urgency": "immediate" }
//!   ],
//!   "reasoning": "Why the score is what it is"
//! }
//! ```
//!
//! `raw_reasoning` is accepted as an alias for `reasoning`, and `finding` as
//! an alias for a finding's `text`. `urgency` may be absent or `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::errors::StageFailure;
use crate::types::{JudgmentScore, Urgency};

/// Prose replies are quoted up to this many characters in errors.
const PREVIEW_CHARS: usize = 80;

/// A collaborator response did not match the judgment contract.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct MalformedJudgment {
    /// The first contract violation found.
    pub reason: String,
}

impl MalformedJudgment {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<MalformedJudgment> for StageFailure {
    fn from(err: MalformedJudgment) -> Self {
        StageFailure::MalformedJudgment { reason: err.reason }
    }
}

// ---------------------------------------------------------------------------

/// One finding within a judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The finding text.
    pub text: String,
    /// Whether the finding is a recommendation the leader can act on.
    pub actionable: bool,
    /// Declared urgency for actionable findings.
    pub urgency: Option<Urgency>,
}

impl Finding {
    /// A non-actionable observation.
    pub fn observation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actionable: false,
            urgency: None,
        }
    }

    /// An actionable recommendation with an optional urgency.
    pub fn action(text: impl Into<String>, urgency: Option<Urgency>) -> Self {
        Self {
            text: text.into(),
            actionable: true,
            urgency,
        }
    }
}

/// A stage's structured verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    /// Score in `[0, 10]`; higher is healthier.
    pub score: JudgmentScore,
    /// Findings in the order the collaborator listed them.
    pub key_findings: Vec<Finding>,
    /// The collaborator's explanation, kept verbatim.
    pub raw_reasoning: String,
}

impl Judgment {
    /// Creates a judgment from already-validated parts.
    pub fn new(score: JudgmentScore, key_findings: Vec<Finding>, raw_reasoning: impl Into<String>) -> Self {
        Self {
            score,
            key_findings,
            raw_reasoning: raw_reasoning.into(),
        }
    }

    /// Validates an untrusted collaborator response.
    pub fn from_response(response: &Value) -> Result<Self, MalformedJudgment> {
        if let Value::String(reply) = response {
            return Err(MalformedJudgment::new(format!(
                "reply contains no JSON object: {}",
                preview(reply)
            )));
        }
        let object = response
            .as_object()
            .ok_or_else(|| MalformedJudgment::new("response is not a JSON object"))?;

        let score = parse_score(object)?;
        let key_findings = parse_findings(object)?;
        let raw_reasoning = ["reasoning", "raw_reasoning"]
            .iter()
            .find_map(|key| object.get(*key))
            .ok_or_else(|| MalformedJudgment::new("missing 'reasoning'"))?
            .as_str()
            .ok_or_else(|| MalformedJudgment::new("'reasoning' is not a string"))?
            .to_string();

        Ok(Self {
            score,
            key_findings,
            raw_reasoning,
        })
    }

    /// Findings flagged as actionable, in order.
    pub fn actions(&self) -> impl Iterator<Item = &Finding> {
        self.key_findings.iter().filter(|f| f.actionable)
    }

    /// Findings that are plain observations, in order.
    pub fn observations(&self) -> impl Iterator<Item = &Finding> {
        self.key_findings.iter().filter(|f| !f.actionable)
    }

    /// Compact rendering used as context for later stages.
    pub fn to_prompt_context(&self) -> String {
        let findings = self
            .key_findings
            .iter()
            .map(|f| format!("- {}", f.text))
            .collect::<Vec<_>>()
            .join("\n");
        format!("score: {}\nfindings:\n{}", self.score, findings)
    }
}

/// First line of a prose reply, cut to [`PREVIEW_CHARS`] characters.
fn preview(reply: &str) -> String {
    let line = reply.trim().lines().next().unwrap_or_default();
    match line.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

fn parse_score(object: &Map<String, Value>) -> Result<JudgmentScore, MalformedJudgment> {
    let raw = object
        .get("score")
        .ok_or_else(|| MalformedJudgment::new("missing 'score'"))?;
    let value = raw
        .as_f64()
        .ok_or_else(|| MalformedJudgment::new(format!("'score' is not a number: {raw}")))?;
    JudgmentScore::new(value)
        .ok_or_else(|| MalformedJudgment::new(format!("'score' {value} is outside [0, 10]")))
}

fn parse_findings(object: &Map<String, Value>) -> Result<Vec<Finding>, MalformedJudgment> {
    let raw = object
        .get("key_findings")
        .ok_or_else(|| MalformedJudgment::new("missing 'key_findings'"))?;
    let items = raw
        .as_array()
        .ok_or_else(|| MalformedJudgment::new("'key_findings' is not an array"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_finding(index, item))
        .collect()
}

fn parse_finding(index: usize, item: &Value) -> Result<Finding, MalformedJudgment> {
    let finding = match item {
        Value::String(text) => Finding::observation(text.trim()),
        Value::Object(fields) => {
            let text = ["text", "finding"]
                .iter()
                .find_map(|key| fields.get(*key))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    MalformedJudgment::new(format!("key_findings[{index}] has no string 'text'"))
                })?;
            let actionable = match fields.get("actionable") {
                None | Some(Value::Null) => false,
                Some(Value::Bool(flag)) => *flag,
                Some(other) => {
                    return Err(MalformedJudgment::new(format!(
                        "key_findings[{index}].actionable is not a boolean: {other}"
                    )))
                }
            };
            let urgency = match fields.get("urgency") {
                None | Some(Value::Null) => None,
                Some(Value::String(label)) => Some(label.parse::<Urgency>().map_err(|e| {
                    MalformedJudgment::new(format!("key_findings[{index}].urgency: {e}"))
                })?),
                Some(other) => {
                    return Err(MalformedJudgment::new(format!(
                        "key_findings[{index}].urgency is not a string: {other}"
                    )))
                }
            };
            Finding {
                text: text.trim().to_string(),
                actionable,
                urgency,
            }
        }
        other => {
            return Err(MalformedJudgment::new(format!(
                "key_findings[{index}] is neither a string nor an object: {other}"
            )))
        }
    };

    if finding.text.is_empty() {
        return Err(MalformedJudgment::new(format!(
            "key_findings[{index}] is blank"
        )));
    }
    Ok(finding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_mixed_findings() {
        let response = json!({
            "score": 7.25,
            "key_findings": [
                "Clear goal setting",
                { "text": "Run a retro on the Q3 miss", "actionable": true, "urgency": "immediate" },
                { "finding": "Formalize mentorship", "actionable": true }
            ],
            "reasoning": "Leaders set direction but dissent is rare."
        });

        let judgment = Judgment::from_response(&response).unwrap();

        assert_eq!(judgment.score.as_f64(), 7.25);
        assert_eq!(judgment.key_findings.len(), 3);
        assert_eq!(judgment.key_findings[0], Finding::observation("Clear goal setting"));
        assert_eq!(
            judgment.key_findings[1],
            Finding::action("Run a retro on the Q3 miss", Some(Urgency::Immediate))
        );
        assert_eq!(judgment.key_findings[2].urgency, None);
        assert_eq!(judgment.actions().count(), 2);
        assert_eq!(judgment.observations().count(), 1);
    }

    #[test]
    fn accepts_raw_reasoning_alias_and_empty_findings() {
        let response = json!({ "score": 0, "key_findings": [], "raw_reasoning": "" });
        let judgment = Judgment::from_response(&response).unwrap();
        assert_eq!(judgment.score.as_f64(), 0.0);
        assert!(judgment.key_findings.is_empty());
    }

    #[test]
    fn rejects_non_object_responses() {
        let err = Judgment::from_response(&json!(["score", 5])).unwrap_err();
        assert!(err.reason.contains("not a JSON object"));
    }

    #[test]
    fn rejects_prose_replies() {
        let err = Judgment::from_response(&json!("I'm sorry, I cannot score this.\nMore text"))
            .unwrap_err();
        assert_eq!(
            err.reason,
            "reply contains no JSON object: I'm sorry, I cannot score this."
        );
    }

    #[test]
    fn rejects_missing_or_out_of_range_score() {
        let missing = json!({ "key_findings": [], "reasoning": "x" });
        assert!(Judgment::from_response(&missing)
            .unwrap_err()
            .reason
            .contains("missing 'score'"));

        let too_high = json!({ "score": 11, "key_findings": [], "reasoning": "x" });
        assert!(Judgment::from_response(&too_high)
            .unwrap_err()
            .reason
            .contains("outside"));

        let textual = json!({ "score": "eight", "key_findings": [], "reasoning": "x" });
        assert!(Judgment::from_response(&textual).is_err());
    }

    #[test]
    fn rejects_findings_with_unknown_urgency_or_bad_types() {
        let unknown_urgency = json!({
            "score": 5,
            "key_findings": [{ "text": "Do it", "actionable": true, "urgency": "someday" }],
            "reasoning": "x"
        });
        assert!(Judgment::from_response(&unknown_urgency)
            .unwrap_err()
            .reason
            .contains("urgency"));

        let numeric_finding = json!({ "score": 5, "key_findings": [42], "reasoning": "x" });
        assert!(Judgment::from_response(&numeric_finding).is_err());

        let blank = json!({ "score": 5, "key_findings": ["  "], "reasoning": "x" });
        assert!(Judgment::from_response(&blank).is_err());
    }

    #[test]
    fn malformed_judgment_converts_into_stage_failure() {
        let failure: StageFailure = MalformedJudgment::new("missing 'score'").into();
        assert_eq!(
            failure,
            StageFailure::MalformedJudgment {
                reason: "missing 'score'".into()
            }
        );
    }
}
