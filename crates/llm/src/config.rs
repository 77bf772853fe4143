//! Provider configuration.

use secrecy::{ExposeSecret, Secret};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// OpenAI API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Low temperature keeps judgments stable across re-runs.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Configuration for [`crate::OpenAiClient`].
///
/// The API key is held as a [`Secret`] so it never appears in `Debug` output
/// or logs.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    api_key: Secret<String>,
    /// Model name sent with every request.
    pub model: String,
    /// API root; `/chat/completions` is appended.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl OpenAiConfig {
    /// Creates a configuration with default model, endpoint, and temperature.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API root. A trailing slash is ignored.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_builders() {
        let config = OpenAiConfig::new("sk-test")
            .with_model("gpt-4o")
            .with_base_url("http://localhost:8080/v1/")
            .with_temperature(0.0);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.api_key(), "sk-test");
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let rendered = format!("{:?}", OpenAiConfig::new("sk-very-secret"));
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains(DEFAULT_MODEL));
    }
}
