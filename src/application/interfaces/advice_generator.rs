use async_trait::async_trait;

use crate::domain::{DomainError, PainDescription};

/// Produces raw exercise advice text for a pain description.
///
/// Implementations make exactly one upstream request per call and never retry;
/// retries belong to the recommendation use case, which regenerates advice
/// from scratch on every attempt.
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    /// Returns the unparsed completion text, or
    /// [`DomainError::GenerationFailure`] when the upstream call fails.
    async fn generate(&self, pain: &PainDescription) -> Result<String, DomainError>;
}
