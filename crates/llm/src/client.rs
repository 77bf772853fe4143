//! Chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{ClientError, LanguageModelClient};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::OpenAiConfig;
use crate::extract::extract_json_object;

/// Provider error bodies are cut to this many characters in error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// [`LanguageModelClient`] for OpenAI-compatible chat-completions endpoints.
///
/// The prompt is sent as the system message and the input text as the user
/// message. The first JSON object in the reply is returned, or the reply text
/// as a JSON string when it holds none; validating the shape is the caller's
/// job.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    http: Client,
}

impl OpenAiClient {
    /// Creates a client for `config`.
    pub fn new(config: OpenAiConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .build()
            .map_err(|e| ClientError::Network {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, http })
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl LanguageModelClient for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.config.model, input_chars = input_text.len()))]
    async fn complete(
        &self,
        prompt: &str,
        input_text: &str,
        timeout: Duration,
    ) -> Result<Value, ClientError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: prompt,
                },
                ChatMessage {
                    role: "user",
                    content: input_text,
                },
            ],
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(self.config.api_key())
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Language model request rejected");
            return Err(classify_status(status, retry_after, &body));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout { after: timeout }
            } else {
                ClientError::InvalidResponse {
                    message: format!("unreadable completion body: {e}"),
                }
            }
        })?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClientError::InvalidResponse {
                message: "completion has no message content".to_string(),
            })?;

        debug!(reply_chars = content.len(), "Language model replied");
        Ok(parse_reply(&content))
    }
}

// ---------------------------------------------------------------------------
// Response mapping
// ---------------------------------------------------------------------------

fn transport_error(err: &reqwest::Error, timeout: Duration) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout { after: timeout }
    } else if err.is_connect() {
        ClientError::Network {
            message: format!("connection failed: {err}"),
        }
    } else {
        ClientError::Network {
            message: err.to_string(),
        }
    }
}

/// Maps a non-success HTTP status to a [`ClientError`].
fn classify_status(status: StatusCode, retry_after: Option<Duration>, body: &str) -> ClientError {
    let detail = truncate(body);
    match status.as_u16() {
        401 | 403 => ClientError::Authentication,
        429 => ClientError::RateLimited { retry_after },
        500..=599 => ClientError::Unavailable {
            message: format!("{status}: {detail}"),
        },
        _ => ClientError::Network {
            message: format!("unexpected status {status}: {detail}"),
        },
    }
}

/// Reads a `Retry-After` header given in seconds. HTTP-date values are ignored.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Returns the first JSON object in `content`, or the reply text itself as a
/// JSON string when there is none, so the caller's validation can report it.
fn parse_reply(content: &str) -> Value {
    match extract_json_object(content).map(serde_json::from_str::<Value>) {
        Some(Ok(object)) => object,
        Some(Err(e)) => {
            debug!(error = %e, "Reply JSON does not parse; passing the text through");
            Value::String(content.to_string())
        }
        None => Value::String(content.to_string()),
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
