//! Narrative insights over search-analytics digests.
//!
//! A [`ReportOrchestrator`] runs the named analyses from `gsclens-analytics`
//! and hands each digest to a [`NarrativeGenerator`] (an `OpenAI`-compatible
//! chat endpoint in production). Without a configured generator, or when a
//! call fails, the deterministic digest is returned instead.

pub mod error;
pub mod generator;
pub mod openai;
pub mod orchestrator;
pub mod prompt;

pub use error::GeneratorError;
pub use generator::{CompletionRequest, NarrativeGenerator};
pub use openai::OpenAiClient;
pub use orchestrator::{Mode, NarrativeSettings, ReportOrchestrator};
pub use prompt::{build_prompt, suggested_questions, ENABLE_AI_SUGGESTION, SYSTEM_INSTRUCTIONS};
