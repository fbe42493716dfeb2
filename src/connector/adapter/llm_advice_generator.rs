use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::AdviceGenerator;
use crate::connector::adapter::ChatClient;
use crate::domain::{
    DomainError, PainDescription, VocabularyRegistry, DEFAULT_DISCLAIMER, MAX_PRECAUTIONS,
    MAX_STEPS,
};

const PROMPT_PREAMBLE: &str = "\
You are a physiotherapy assistant that answers ONLY with a single JSON object. \
Do not write any words before or after the JSON.";

/// An [`AdviceGenerator`] that asks a chat model for one exercise drawn from
/// the vocabulary.
///
/// The system prompt is rendered once from the [`VocabularyRegistry`], so the
/// names the model is offered are exactly the names the parser accepts.
pub struct LlmAdviceGenerator {
    chat_client: Arc<dyn ChatClient>,
    system_prompt: String,
}

impl LlmAdviceGenerator {
    pub fn new(chat_client: Arc<dyn ChatClient>) -> Self {
        Self::with_registry(chat_client, VocabularyRegistry::standard())
    }

    pub fn with_registry(chat_client: Arc<dyn ChatClient>, registry: &VocabularyRegistry) -> Self {
        Self {
            chat_client,
            system_prompt: Self::build_system_prompt(registry),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn build_system_prompt(registry: &VocabularyRegistry) -> String {
        let names: Vec<&str> = registry.names().collect();
        let vocabulary = serde_json::to_string_pretty(&names).unwrap_or_else(|_| names.join("\n"));

        format!(
            r#"{PROMPT_PREAMBLE}

1. Choose EXACTLY ONE exercise from this list, spelled exactly as written:
{vocabulary}

2. Reply with this structure and nothing else:
{{
  "exercises": [
    {{
      "exercise_name": "<name from the list>",
      "steps": ["Step 1", "Step 2", "Step 3"],
      "precautions": ["Precaution 1", "Precaution 2"]
    }}
  ],
  "disclaimer": "{DEFAULT_DISCLAIMER}"
}}

3. Rules:
- The exercise MUST come from the list above, in lowercase.
- At most {MAX_STEPS} steps and {MAX_PRECAUTIONS} precautions.
- Pick the exercise that best relieves the pain the user describes.
- Output valid JSON only: no markdown, no code fences, no commentary."#
        )
    }
}

#[async_trait]
impl AdviceGenerator for LlmAdviceGenerator {
    async fn generate(&self, pain: &PainDescription) -> Result<String, DomainError> {
        debug!(
            "Requesting advice from {} ({} chars of pain description)",
            self.chat_client.model_name(),
            pain.as_str().len()
        );

        let text = self
            .chat_client
            .complete(&self.system_prompt, pain.as_str())
            .await?;

        debug!("LlmAdviceGenerator raw response: {}", text);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::EXERCISE_NAMES;

    #[derive(Default)]
    struct CapturingClient {
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ChatClient for CapturingClient {
        async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            Ok("reply".to_string())
        }

        fn model_name(&self) -> &str {
            "capturing"
        }
    }

    #[test]
    fn prompt_embeds_every_vocabulary_name() {
        let generator = LlmAdviceGenerator::new(Arc::new(CapturingClient::default()));
        for name in EXERCISE_NAMES {
            assert!(
                generator.system_prompt().contains(&format!("\"{name}\"")),
                "prompt is missing {name}"
            );
        }
        assert!(generator.system_prompt().contains("\"exercise_name\""));
    }

    #[test]
    fn prompt_follows_custom_registry() {
        let registry = VocabularyRegistry::from_names(["wall sit"]);
        let generator =
            LlmAdviceGenerator::with_registry(Arc::new(CapturingClient::default()), &registry);
        assert!(generator.system_prompt().contains("\"wall sit\""));
        assert!(!generator.system_prompt().contains("\"dead bug\""));
    }

    #[tokio::test]
    async fn sends_pain_description_as_user_message() {
        let client = Arc::new(CapturingClient::default());
        let generator = LlmAdviceGenerator::new(client.clone());
        let pain = PainDescription::new("  stiff neck\nsince Monday ").unwrap();

        let text = generator.generate(&pain).await.unwrap();

        assert_eq!(text, "reply");
        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, "  stiff neck\nsince Monday ");
        assert_eq!(seen[0].0, generator.system_prompt());
    }
}
