use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::application::{MediaLookup, MediaResolver};
use crate::domain::DomainError;

const MOCK_MEDIA_BASE: &str = "https://media.invalid/exercises";

#[derive(Debug, Clone)]
enum Mode {
    /// Derive a URL from the exercise name.
    Derived,
    Fixed(String),
    NotFound,
}

/// Offline [`MediaResolver`] that never touches the network.
pub struct MockMediaResolver {
    mode: Mode,
    calls: AtomicUsize,
}

impl MockMediaResolver {
    pub fn new() -> Self {
        Self::with_mode(Mode::Derived)
    }

    /// Always resolves to `url`.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::with_mode(Mode::Fixed(url.into()))
    }

    /// Never finds a match.
    pub fn not_found() -> Self {
        Self::with_mode(Mode::NotFound)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn slug(exercise_name: &str) -> String {
        exercise_name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl Default for MockMediaResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaResolver for MockMediaResolver {
    async fn resolve(&self, exercise_name: &str) -> Result<MediaLookup, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match &self.mode {
            Mode::Derived => MediaLookup::Found(format!(
                "{}/{}.gif",
                MOCK_MEDIA_BASE,
                Self::slug(exercise_name)
            )),
            Mode::Fixed(url) => MediaLookup::Found(url.clone()),
            Mode::NotFound => MediaLookup::NotFound,
        })
    }
}
