use async_trait::async_trait;

use crate::domain::DomainError;

/// Sends a role-tagged prompt to a text-completion model and returns the
/// assistant's reply.
///
/// Implementors own transport and vendor-specific details so
/// [`super::LlmAdviceGenerator`] only deals with prompts and text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a `system` instruction followed by a `user` message.
    ///
    /// Failures are reported as [`DomainError::GenerationFailure`], carrying the
    /// upstream error body when the service returned one.
    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
