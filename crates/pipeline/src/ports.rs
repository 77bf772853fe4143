//! Port traits for the external collaborators the pipeline consumes.
//!
//! Infrastructure crates implement these; the pipeline never sees transport,
//! file formats, or provider details.
//!
//! | Port | Default implementation |
//! |------|------------------------|
//! | [`CommunicationParser`] | `ingest::TranscriptParser` |
//! | [`PromptProvider`] | `nodes::TemplatePromptProvider` |
//! | [`LanguageModelClient`] | `llm::OpenAiClient` |

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::adapter::PromptSelector;
use crate::errors::{ClientError, ParseError};
use crate::segment::Segment;
use crate::types::CommunicationType;

/// Turns raw communication text into canonical segments.
pub trait CommunicationParser: Send + Sync {
    /// Parses `raw_text` as `communication_type`.
    ///
    /// Every returned segment is tagged with its source type. Input that
    /// cannot be read as the declared type fails with
    /// [`ParseError::UnsupportedFormat`]; implementations must not guess.
    fn parse(
        &self,
        raw_text: &str,
        communication_type: CommunicationType,
    ) -> Result<Vec<Segment>, ParseError>;

    /// Infers the communication type of `raw_text` for callers that did not
    /// declare one.
    fn detect_type(&self, raw_text: &str) -> CommunicationType;
}

/// Selects the prompt text for a stage.
///
/// Must be a pure function of the selector: same selector, same prompt.
pub trait PromptProvider: Send + Sync {
    /// Returns the prompt for `selector`. A `custom_override` takes precedence
    /// over any built-in template.
    fn template_for(&self, selector: &PromptSelector) -> String;
}

/// The text-understanding service.
///
/// Treated as untrusted: it may be slow, fail, or return JSON of the wrong
/// shape. Callers validate every response.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    /// Sends `prompt` (instructions) and `input_text` (material to judge) and
    /// returns the JSON object found in the reply.
    ///
    /// A reply without a parseable JSON object is returned as a JSON string
    /// holding the reply text. [`ClientError`] is reserved for transport and
    /// provider failures.
    ///
    /// Implementations should give up after `timeout`; callers additionally
    /// bound the call themselves.
    async fn complete(
        &self,
        prompt: &str,
        input_text: &str,
        timeout: Duration,
    ) -> Result<Value, ClientError>;
}
