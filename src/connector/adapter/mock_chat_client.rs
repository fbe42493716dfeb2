use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::connector::adapter::ChatClient;
use crate::domain::{DomainError, VocabularyRegistry, DEFAULT_DISCLAIMER};

/// Offline [`ChatClient`].
///
/// By default it answers every prompt with a fenced JSON recommendation whose
/// exercise is picked deterministically from the vocabulary by hashing the user
/// message. [`MockChatClient::with_responses`] plays back a fixed script
/// instead; the last reply repeats once the script is used up.
pub struct MockChatClient {
    script: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn canned_reply(user: &str) -> String {
        let mut hasher = DefaultHasher::new();
        user.hash(&mut hasher);

        let registry = VocabularyRegistry::standard();
        let index = (hasher.finish() % registry.len().max(1) as u64) as usize;
        let name = registry.names().nth(index).unwrap_or("dead bug");

        let body = serde_json::json!({
            "exercises": [{
                "exercise_name": name,
                "steps": [
                    "Get into the starting position slowly",
                    "Perform the movement with control",
                    "Return to the start and repeat 8-10 times"
                ],
                "precautions": [
                    "Stop if the pain gets worse",
                    "Keep your breathing steady"
                ]
            }],
            "disclaimer": DEFAULT_DISCLAIMER,
        });
        format!("```json\n{body}\n```")
    }

    fn next_scripted(&self) -> Option<String> {
        let mut script = self.script.lock().ok()?;
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        }
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, DomainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let reply = self
            .next_scripted()
            .unwrap_or_else(|| Self::canned_reply(user));
        debug!("MockChatClient call {} -> {} chars", call, reply.len());
        Ok(reply)
    }

    fn model_name(&self) -> &str {
        "mock-chat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AdviceParser;

    #[tokio::test]
    async fn canned_reply_is_deterministic_and_valid() {
        let client = MockChatClient::new();
        let first = client.complete("sys", "sore shoulder").await.unwrap();
        let second = client.complete("sys", "sore shoulder").await.unwrap();

        assert_eq!(first, second);
        assert!(AdviceParser::standard().parse(&first).is_ok());
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn script_plays_in_order_then_repeats_last() {
        let client = MockChatClient::with_responses(["one", "two"]);
        assert_eq!(client.complete("s", "u").await.unwrap(), "one");
        assert_eq!(client.complete("s", "u").await.unwrap(), "two");
        assert_eq!(client.complete("s", "u").await.unwrap(), "two");
    }
}
