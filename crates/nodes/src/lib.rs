//! Analysis stages and the pipeline executor.
//!
//! This crate provides the five stage implementations (Preprocess through
//! Summary), the [`PipelineExecutor`] that runs them in their fixed order over
//! a write-once [`pipeline::OrganizationalState`], and the built-in prompt
//! templates.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Stages sequence calls between business logic in
//! the [`pipeline`] crate and the collaborator ports (parser, prompt provider,
//! language model). They contain no domain rules of their own; scoring,
//! weighting, and routing live in [`pipeline`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`stage`] | `AnalysisStage` trait, stage outputs, stage context, options |
//! | [`stages`] | The five stage implementations |
//! | [`executor`] | `PipelineExecutor` and `analyze_organization` |
//! | [`templates`] | `TemplatePromptProvider` |

pub mod executor;
pub mod stage;
pub mod stages;
pub mod templates;

#[cfg(test)]
mod testing;

pub use executor::PipelineExecutor;
pub use stage::{
    AnalysisStage, PipelineOptions, StageContext, StageOutcome, StageOutput,
    DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_SEGMENTS_PER_PROMPT,
};
pub use stages::default_stages;
pub use templates::TemplatePromptProvider;
