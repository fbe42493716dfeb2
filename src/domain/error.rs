use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Generation failed: {message}")]
    GenerationFailure {
        message: String,
        /// Error payload returned by the completion service, when there was one.
        upstream: Option<String>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Incomplete response: {0}")]
    IncompleteResponse(String),

    #[error("Unrecognized exercise: {0}")]
    UnrecognizedExercise(String),

    #[error("Media resolution failed: no demonstration found for '{0}'")]
    ResolutionNotFound(String),

    #[error("Media resolution failed: {0}")]
    ResolutionFailure(String),

    #[error("Recommendation failed after {attempts} attempt(s): {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<DomainError>,
    },

    #[error("Deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::GenerationFailure {
            message: msg.into(),
            upstream: None,
        }
    }

    pub fn generation_with_upstream(msg: impl Into<String>, upstream: impl Into<String>) -> Self {
        Self::GenerationFailure {
            message: msg.into(),
            upstream: Some(upstream.into()),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn incomplete(msg: impl Into<String>) -> Self {
        Self::IncompleteResponse(msg.into())
    }

    pub fn unrecognized(name: impl Into<String>) -> Self {
        Self::UnrecognizedExercise(name.into())
    }

    pub fn resolution_not_found(name: impl Into<String>) -> Self {
        Self::ResolutionNotFound(name.into())
    }

    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::ResolutionFailure(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Failures that belong to a single pipeline attempt and warrant a fresh one.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::GenerationFailure { .. }
                | Self::MalformedResponse(_)
                | Self::IncompleteResponse(_)
                | Self::UnrecognizedExercise(_)
                | Self::ResolutionNotFound(_)
                | Self::ResolutionFailure(_)
        )
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The error that ended the final attempt, looking through `Exhausted`.
    pub fn root_cause(&self) -> &DomainError {
        match self {
            Self::Exhausted { last, .. } => last.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_scoped_failures_are_retryable() {
        assert!(DomainError::generation("boom").is_retryable());
        assert!(DomainError::malformed("x").is_retryable());
        assert!(DomainError::incomplete("x").is_retryable());
        assert!(DomainError::unrecognized("levitation").is_retryable());
        assert!(DomainError::resolution_not_found("dead bug").is_retryable());
        assert!(DomainError::resolution("timeout").is_retryable());

        assert!(!DomainError::config("missing token").is_retryable());
        assert!(!DomainError::invalid_input("empty").is_retryable());
        assert!(!DomainError::Cancelled.is_retryable());
    }

    #[test]
    fn exhausted_message_includes_last_cause() {
        let err = DomainError::Exhausted {
            attempts: 5,
            last: Box::new(DomainError::resolution_not_found("dead bug")),
        };
        let msg = err.to_string();
        assert!(msg.contains("5 attempt(s)"));
        assert!(msg.contains("Media resolution failed"));
        assert!(matches!(err.root_cause(), DomainError::ResolutionNotFound(_)));
    }
}
