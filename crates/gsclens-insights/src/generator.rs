use std::future::Future;

use crate::error::GeneratorError;

/// One completion call: instructions, prompt and sampling limits.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instructions: String,
    pub user_prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// A hosted language model that turns a prompt into narrative text.
///
/// Implementations make exactly one attempt per call; retrying is left to
/// whoever invokes the analysis again.
pub trait NarrativeGenerator {
    /// Returns the generated text.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Unavailable`] when the generator cannot be used at
    /// all, [`GeneratorError::Request`] or [`GeneratorError::Http`] when the
    /// call itself fails.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, GeneratorError>> + Send;
}
