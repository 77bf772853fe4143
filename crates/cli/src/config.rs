//! `org-compass` configuration file.
//!
//! Every section and every key is optional; missing values take the defaults
//! below. Unknown keys are rejected so typos fail loudly.
//!
//! ```toml
//! [llm]
//! model = "gpt-4"
//! base_url = "https://api.openai.com/v1"
//! temperature = 0.3
//! api_key_env = "OPENAI_API_KEY"
//!
//! [pipeline]
//! call_timeout_secs = 60
//! max_segments_per_prompt = 25
//!
//! [prompts.overrides]
//! leadership_analysis = "..."
//!
//! [retry]
//! max_attempts = 3
//! base_delay_ms = 1000
//!
//! [observability]
//! log_format = "pretty"          # or "json"
//! otlp_endpoint = "http://localhost:4317"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use llm::{OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use nodes::{PipelineOptions, DEFAULT_MAX_SEGMENTS_PER_PROMPT};
use pipeline::{ProfileAdapter, StageKind};
use serde::Deserialize;
use thiserror::Error;

/// Configuration could not be loaded or is inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {origin}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("[prompts.overrides] names unknown stage '{name}'")]
    UnknownStage { name: String },

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("environment variable {var} is not set; it must hold the language model API key")]
    MissingApiKey { var: String },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LlmSettings {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PipelineSettings {
    pub call_timeout_secs: u64,
    pub max_segments_per_prompt: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let defaults = PipelineOptions::default();
        Self {
            call_timeout_secs: defaults.call_timeout.as_secs(),
            max_segments_per_prompt: DEFAULT_MAX_SEGMENTS_PER_PROMPT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PromptSettings {
    /// Stage name → literal prompt used instead of the built-in template.
    pub overrides: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RetrySettings {
    /// Total attempts including the first; `1` disables retrying.
    pub max_attempts: u32,
    /// Back-off before the second attempt; doubles for each later one.
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetrySettings {
    /// Back-off before attempt `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ObservabilitySettings {
    pub log_format: LogFormat,
    /// OTLP gRPC collector; spans are exported only when set.
    pub otlp_endpoint: Option<String>,
}

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CompassConfig {
    pub llm: LlmSettings,
    pub pipeline: PipelineSettings,
    pub prompts: PromptSettings,
    pub retry: RetrySettings,
    pub observability: ObservabilitySettings,
}

impl CompassConfig {
    /// Loads `path`, or returns the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, &path.display().to_string())
    }

    /// Parses and validates a TOML document. `origin` names it in errors.
    pub fn from_toml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        };
        if self.pipeline.call_timeout_secs == 0 {
            return Err(invalid("pipeline.call_timeout_secs", "must be at least 1"));
        }
        if self.pipeline.max_segments_per_prompt == 0 {
            return Err(invalid("pipeline.max_segments_per_prompt", "must be at least 1"));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(invalid("llm.temperature", "must be within [0, 2]"));
        }
        self.adapter().map(|_| ())
    }

    /// Builds the profile adapter with the configured prompt overrides.
    pub fn adapter(&self) -> Result<ProfileAdapter, ConfigError> {
        self.prompts
            .overrides
            .iter()
            .try_fold(ProfileAdapter::new(), |adapter, (name, template)| {
                let stage: StageKind = name
                    .parse()
                    .map_err(|_| ConfigError::UnknownStage { name: name.clone() })?;
                Ok(adapter.with_override(stage, template.clone()))
            })
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            call_timeout: Duration::from_secs(self.pipeline.call_timeout_secs),
            max_segments_per_prompt: self.pipeline.max_segments_per_prompt,
        }
    }

    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                var: self.llm.api_key_env.clone(),
            })
    }

    pub fn openai_config(&self, api_key: String) -> OpenAiConfig {
        OpenAiConfig::new(api_key)
            .with_model(self.llm.model.clone())
            .with_base_url(self.llm.base_url.clone())
            .with_temperature(self.llm.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{CompanyName, LeaderName, LeadershipProfile};

    #[test]
    fn empty_document_yields_defaults() {
        let config = CompassConfig::from_toml("", "test").unwrap();
        assert_eq!(config, CompassConfig::default());
        assert_eq!(config.pipeline.max_segments_per_prompt, 25);
        assert_eq!(config.pipeline_options().call_timeout, Duration::from_secs(60));
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn sections_override_defaults() {
        let config = CompassConfig::from_toml(
            r#"
            [llm]
            model = "gpt-4o-mini"

            [pipeline]
            call_timeout_secs = 20

            [retry]
            max_attempts = 1

            [observability]
            log_format = "json"
            otlp_endpoint = "http://collector:4317"
            "#,
            "test",
        )
        .unwrap();

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.pipeline.call_timeout_secs, 20);
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(
            config.observability.otlp_endpoint.as_deref(),
            Some("http://collector:4317")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CompassConfig::from_toml("[llm]\nmodle = \"gpt-4\"", "test").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_attempts_are_rejected() {
        let err = CompassConfig::from_toml("[retry]\nmax_attempts = 0", "test").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "retry.max_attempts", .. }));
    }

    #[test]
    fn prompt_overrides_reach_the_adapter() {
        let config = CompassConfig::from_toml(
            "[prompts.overrides]\nrisk_detection = \"Custom risk prompt\"",
            "test",
        )
        .unwrap();
        let profile = LeadershipProfile::new(
            LeaderName::new("Dana").unwrap(),
            CompanyName::new("Northwind").unwrap(),
        );

        let selector = config
            .adapter()
            .unwrap()
            .prompt_for(StageKind::RiskDetection, &profile);

        assert_eq!(selector.custom_override.as_deref(), Some("Custom risk prompt"));
    }

    #[test]
    fn overrides_for_unknown_stages_are_rejected() {
        let err = CompassConfig::from_toml("[prompts.overrides]\nsentiment = \"x\"", "test")
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownStage { name } if name == "sentiment"));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let retry = RetrySettings {
            max_attempts: 5,
            base_delay_ms: 100,
        };
        assert_eq!(retry.backoff(1), Duration::from_millis(100));
        assert_eq!(retry.backoff(2), Duration::from_millis(200));
        assert_eq!(retry.backoff(3), Duration::from_millis(400));
    }
}
