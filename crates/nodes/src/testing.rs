//! Test doubles for the language model port.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pipeline::{
    CancellationFlag, ClientError, CompanyName, LanguageModelClient, LeaderName,
    LeadershipProfile, StageKind,
};
use serde_json::{json, Value};

pub(crate) fn fixture_profile() -> LeadershipProfile {
    LeadershipProfile::new(
        LeaderName::new("Dana Whitfield").unwrap(),
        CompanyName::new("Northwind").unwrap(),
    )
}

/// A well-formed judgment response.
pub(crate) fn judgment_json(score: f64, findings: Value) -> Value {
    json!({
        "score": score,
        "key_findings": findings,
        "reasoning": "scripted"
    })
}

#[derive(Debug, Clone)]
enum Reply {
    Respond(Value),
    Fail(ClientError),
}

#[derive(Debug, Clone)]
struct Script {
    reply: Reply,
    delay: Duration,
    cancel: Option<CancellationFlag>,
}

/// Language model stub that answers per stage.
///
/// The stage is recognized from the `Stage: <name>` header the built-in
/// templates start with. Every call is recorded, including ones that fail.
#[derive(Debug, Default)]
pub(crate) struct ScriptedClient {
    scripts: HashMap<StageKind, Script>,
    calls: Mutex<Vec<StageKind>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers all three judging stages; scores 8.1 / 6.8 / 9.0.
    pub(crate) fn healthy() -> Self {
        Self::new()
            .with_response(
                StageKind::LeadershipAnalysis,
                judgment_json(
                    8.1,
                    json!([
                        "Direction is clear",
                        {"text": "Share the Q3 plan in writing", "actionable": true, "urgency": "immediate"}
                    ]),
                ),
            )
            .with_response(
                StageKind::TeamHealthAnalysis,
                judgment_json(
                    6.8,
                    json!([
                        "Junior voices are quiet",
                        {"text": "Rotate meeting facilitation", "actionable": true}
                    ]),
                ),
            )
            .with_response(
                StageKind::RiskDetection,
                judgment_json(
                    9.0,
                    json!([
                        {"text": "Revisit hiring plan", "actionable": true, "urgency": "strategic"}
                    ]),
                ),
            )
    }

    pub(crate) fn with_response(mut self, stage: StageKind, response: Value) -> Self {
        self.scripts.insert(
            stage,
            Script {
                reply: Reply::Respond(response),
                delay: Duration::ZERO,
                cancel: None,
            },
        );
        self
    }

    pub(crate) fn with_failure(mut self, stage: StageKind, error: ClientError) -> Self {
        self.scripts.insert(
            stage,
            Script {
                reply: Reply::Fail(error),
                delay: Duration::ZERO,
                cancel: None,
            },
        );
        self
    }

    /// Delays the scripted reply for `stage`.
    pub(crate) fn with_delay(mut self, stage: StageKind, delay: Duration) -> Self {
        if let Some(script) = self.scripts.get_mut(&stage) {
            script.delay = delay;
        }
        self
    }

    /// Sets `flag` while answering `stage`.
    pub(crate) fn cancelling_on(mut self, stage: StageKind, flag: CancellationFlag) -> Self {
        if let Some(script) = self.scripts.get_mut(&stage) {
            script.cancel = Some(flag);
        }
        self
    }

    pub(crate) fn calls(&self) -> Vec<StageKind> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

fn stage_of(prompt: &str) -> Option<StageKind> {
    prompt
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Stage: "))
        .and_then(|name| name.parse().ok())
}

#[async_trait]
impl LanguageModelClient for ScriptedClient {
    async fn complete(
        &self,
        prompt: &str,
        _input_text: &str,
        _timeout: Duration,
    ) -> Result<Value, ClientError> {
        let stage = stage_of(prompt).ok_or_else(|| ClientError::InvalidResponse {
            message: "prompt does not name a stage".to_string(),
        })?;
        self.calls.lock().unwrap().push(stage);

        let script = self
            .scripts
            .get(&stage)
            .cloned()
            .ok_or_else(|| ClientError::InvalidResponse {
                message: format!("no scripted reply for {stage}"),
            })?;
        if let Some(flag) = &script.cancel {
            flag.cancel();
        }
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        match script.reply {
            Reply::Respond(value) => Ok(value),
            Reply::Fail(error) => Err(error),
        }
    }
}
