use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::connector::adapter::ChatClient;
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com";
pub const DEFAULT_MODEL: &str = "@cf/meta/llama-2-7b-chat-int8";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct ApiRequest<'a> {
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: Option<ApiResult>,
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    response: Option<String>,
}

fn default_success() -> bool {
    true
}

/// HTTP client for Cloudflare Workers AI text generation.
///
/// Requests go to `{base}/client/v4/accounts/{account_id}/ai/run/{model}` with
/// a bearer token. The base URL is overridable for proxies and local stand-ins.
pub struct WorkersAiClient {
    client: reqwest::Client,
    api_token: String,
    model: String,
    /// Full endpoint URL including account and model.
    url: String,
}

impl WorkersAiClient {
    pub fn new(
        api_token: impl Into<String>,
        account_id: impl AsRef<str>,
        model: impl Into<String>,
        base_url: impl AsRef<str>,
    ) -> Result<Self, DomainError> {
        let model = model.into();
        let url = Self::endpoint(base_url.as_ref(), account_id.as_ref(), &model);
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::config(format!("WorkersAiClient: failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_token: api_token.into(),
            model,
            url,
        })
    }

    fn endpoint(base_url: &str, account_id: &str, model: &str) -> String {
        format!(
            "{}/client/v4/accounts/{}/ai/run/{}",
            base_url.trim_end_matches('/'),
            account_id,
            model.trim_start_matches('/')
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn extract_text(body: ApiResponse) -> Result<String, DomainError> {
        if !body.success {
            let errors = serde_json::to_string(&body.errors).unwrap_or_default();
            return Err(DomainError::generation_with_upstream(
                "WorkersAiClient: service reported failure",
                errors,
            ));
        }

        body.result
            .and_then(|r| r.response)
            .ok_or_else(|| DomainError::generation("WorkersAiClient: response has no 'result.response'"))
    }
}

#[async_trait]
impl ChatClient for WorkersAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError> {
        let request = ApiRequest {
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: system,
                },
                ApiMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::generation(format!("WorkersAiClient: request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("WorkersAiClient: API returned {status}: {body}");
            return Err(DomainError::generation_with_upstream(
                format!("WorkersAiClient: API returned {status}"),
                body,
            ));
        }

        let body: ApiResponse = response.json().await.map_err(|e| {
            DomainError::generation(format!("WorkersAiClient: failed to parse response: {e}"))
        })?;

        let text = Self::extract_text(body)?;
        debug!("WorkersAiClient: received {} characters", text.len());
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_account_and_model() {
        let client =
            WorkersAiClient::new("token", "acct-123", DEFAULT_MODEL, "https://api.cloudflare.com/").unwrap();
        assert_eq!(
            client.url(),
            "https://api.cloudflare.com/client/v4/accounts/acct-123/ai/run/@cf/meta/llama-2-7b-chat-int8"
        );
        assert_eq!(client.model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn extracts_response_text() {
        let body: ApiResponse = serde_json::from_str(
            r#"{"result":{"response":"{\"exercises\":[]}"},"success":true,"errors":[],"messages":[]}"#,
        )
        .unwrap();
        assert_eq!(WorkersAiClient::extract_text(body).unwrap(), r#"{"exercises":[]}"#);
    }

    #[test]
    fn reported_failure_carries_upstream_errors() {
        let body: ApiResponse = serde_json::from_str(
            r#"{"result":null,"success":false,"errors":[{"code":7000,"message":"No route"}]}"#,
        )
        .unwrap();
        match WorkersAiClient::extract_text(body).unwrap_err() {
            DomainError::GenerationFailure { upstream, .. } => {
                assert!(upstream.unwrap().contains("No route"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_result_is_a_generation_failure() {
        let body: ApiResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            WorkersAiClient::extract_text(body),
            Err(DomainError::GenerationFailure { upstream: None, .. })
        ));
    }
}
