use async_trait::async_trait;

use crate::domain::DomainError;

/// Outcome of a demonstration-media lookup that reached the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLookup {
    Found(String),
    NotFound,
}

impl MediaLookup {
    pub fn url(&self) -> Option<&str> {
        match self {
            MediaLookup::Found(url) => Some(url),
            MediaLookup::NotFound => None,
        }
    }
}

/// Resolves a validated exercise name to a demonstration media URL.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// An empty result set is [`MediaLookup::NotFound`], not an error.
    /// Transport and service failures are [`DomainError::ResolutionFailure`].
    /// When several matches come back, the first one wins.
    async fn resolve(&self, exercise_name: &str) -> Result<MediaLookup, DomainError>;
}
