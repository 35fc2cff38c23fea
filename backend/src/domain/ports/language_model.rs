//! Driven port for the text-generation model behind `/ask-kuber`.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while prompting the language model.
    pub enum LanguageModelError {
        /// No API key was configured.
        NotConfigured => "language model is not configured",
        /// Network transport failed before receiving a response.
        Transport { message: String } => "language model transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "language model request timed out: {message}",
        /// The provider's quota or rate limit was hit.
        RateLimited { message: String } => "language model rate limited request: {message}",
        /// The provider refused the request.
        Rejected { message: String } => "language model rejected request: {message}",
        /// The reply could not be decoded or carried no text.
        Decode { message: String } => "language model reply could not be decoded: {message}",
    }
}

/// Single-turn text completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send `prompt` and return the model's text reply.
    async fn complete(&self, prompt: &str) -> Result<String, LanguageModelError>;
}

/// Model used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLanguageModel;

#[async_trait]
impl LanguageModel for DisabledLanguageModel {
    async fn complete(&self, _prompt: &str) -> Result<String, LanguageModelError> {
        Err(LanguageModelError::not_configured())
    }
}
