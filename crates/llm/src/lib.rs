//! Language model infrastructure adapter.
//!
//! Implements the [`pipeline::LanguageModelClient`] trait for OpenAI-compatible
//! chat-completions endpoints. Other providers are added as new types in this
//! crate without any changes to the `pipeline` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, status mapping, and
//! JSON extraction from free-text replies live here. The [`pipeline`] crate
//! sees only [`pipeline::LanguageModelClient`] and [`pipeline::ClientError`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `OpenAiConfig` |
//! | [`client`] | `OpenAiClient` |
//! | [`extract`] | JSON object extraction from reply text |

pub mod client;
pub mod config;
pub mod extract;

pub use client::OpenAiClient;
pub use config::{OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use extract::extract_json_object;
