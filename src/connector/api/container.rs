use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::{BackoffSleeper, MediaResolver, RecommendExerciseUseCase};
use crate::connector::adapter::{
    ChatClient, ExerciseDbResolver, LlmAdviceGenerator, MockChatClient, MockMediaResolver,
    TokioSleeper, WorkersAiClient,
};
use crate::domain::RetryPolicy;

/// Everything the process needs to talk to its upstream services.
///
/// Built once at startup (from CLI flags, environment, and `.env`) and handed to
/// [`Container::new`]; nothing below this point reads the environment.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Serve canned completions and media instead of calling upstream services.
    pub mock: bool,
    pub cloudflare_api_token: Option<String>,
    pub cloudflare_account_id: Option<String>,
    pub cloudflare_model: String,
    pub cloudflare_base_url: String,
    pub exercisedb_api_key: Option<String>,
    pub exercisedb_api_host: String,
    /// Overrides `https://{exercisedb_api_host}`.
    pub exercisedb_base_url: Option<String>,
    pub retry_policy: RetryPolicy,
}

pub struct Container {
    recommend_use_case: Arc<RecommendExerciseUseCase>,
    shutdown: CancellationToken,
    model_name: String,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let (chat_client, media_resolver): (Arc<dyn ChatClient>, Arc<dyn MediaResolver>) =
            if config.mock {
                debug!("Using mock completion and media services");
                (
                    Arc::new(MockChatClient::new()),
                    Arc::new(MockMediaResolver::new()),
                )
            } else {
                let token = required(config.cloudflare_api_token, "CLOUDFLARE_API_TOKEN")?;
                let account_id = required(config.cloudflare_account_id, "CLOUDFLARE_ACCOUNT_ID")?;
                let api_key = required(config.exercisedb_api_key, "EXERCISEDB_API_KEY")?;

                debug!(
                    "Using Workers AI model {} at {}",
                    config.cloudflare_model, config.cloudflare_base_url
                );
                let chat = WorkersAiClient::new(
                    token,
                    account_id,
                    config.cloudflare_model,
                    &config.cloudflare_base_url,
                )
                .context("failed to initialize Workers AI client")?;

                debug!("Using ExerciseDB host {}", config.exercisedb_api_host);
                let resolver = ExerciseDbResolver::new(
                    api_key,
                    config.exercisedb_api_host,
                    config.exercisedb_base_url.as_deref(),
                )
                .context("failed to initialize ExerciseDB resolver")?;

                (Arc::new(chat), Arc::new(resolver))
            };

        Ok(Self::from_parts(
            chat_client,
            media_resolver,
            Arc::new(TokioSleeper),
            config.retry_policy,
        ))
    }

    /// Wires a container from already-built services.
    pub fn from_parts(
        chat_client: Arc<dyn ChatClient>,
        media_resolver: Arc<dyn MediaResolver>,
        sleeper: Arc<dyn BackoffSleeper>,
        retry_policy: RetryPolicy,
    ) -> Self {
        let model_name = chat_client.model_name().to_string();
        let generator = Arc::new(LlmAdviceGenerator::new(chat_client));
        let use_case = RecommendExerciseUseCase::new(generator, media_resolver, sleeper)
            .with_policy(retry_policy);

        Self {
            recommend_use_case: Arc::new(use_case),
            shutdown: CancellationToken::new(),
            model_name,
        }
    }

    pub fn recommend_use_case(&self) -> Arc<RecommendExerciseUseCase> {
        self.recommend_use_case.clone()
    }

    /// Cancelled when the process is shutting down; in-flight recommendations
    /// watch child tokens of this one.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{name} is not set (use --mock to run without upstream services)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::adapter::{DEFAULT_API_HOST, DEFAULT_BASE_URL, DEFAULT_MODEL};

    fn config(mock: bool) -> ContainerConfig {
        ContainerConfig {
            mock,
            cloudflare_api_token: None,
            cloudflare_account_id: None,
            cloudflare_model: DEFAULT_MODEL.to_string(),
            cloudflare_base_url: DEFAULT_BASE_URL.to_string(),
            exercisedb_api_key: None,
            exercisedb_api_host: DEFAULT_API_HOST.to_string(),
            exercisedb_base_url: None,
            retry_policy: RetryPolicy::default().with_max_attempts(2),
        }
    }

    #[test]
    fn mock_mode_needs_no_credentials() {
        let container = Container::new(config(true)).unwrap();
        assert_eq!(container.model_name(), "mock-chat");
        assert_eq!(container.recommend_use_case().policy().max_attempts(), 2);
    }

    #[test]
    fn live_mode_requires_credentials() {
        let err = Container::new(config(false)).err().unwrap();
        assert!(err.to_string().contains("CLOUDFLARE_API_TOKEN"));

        let mut cfg = config(false);
        cfg.cloudflare_api_token = Some("token".into());
        cfg.cloudflare_account_id = Some("acct".into());
        cfg.exercisedb_api_key = Some("   ".into());
        let err = Container::new(cfg).err().unwrap();
        assert!(err.to_string().contains("EXERCISEDB_API_KEY"));
    }

    #[test]
    fn live_mode_builds_with_credentials() {
        let mut cfg = config(false);
        cfg.cloudflare_api_token = Some("token".into());
        cfg.cloudflare_account_id = Some("acct".into());
        cfg.exercisedb_api_key = Some("key".into());
        let container = Container::new(cfg).unwrap();
        assert_eq!(container.model_name(), DEFAULT_MODEL);
    }
}
