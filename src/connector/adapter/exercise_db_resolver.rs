use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::{MediaLookup, MediaResolver};
use crate::domain::DomainError;

pub const DEFAULT_API_HOST: &str = "exercisedb.p.rapidapi.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ExerciseEntry {
    #[serde(rename = "gifUrl")]
    gif_url: Option<String>,
}

/// Looks exercises up by name in ExerciseDB (RapidAPI).
pub struct ExerciseDbResolver {
    client: reqwest::Client,
    api_key: String,
    api_host: String,
    base_url: Url,
}

impl ExerciseDbResolver {
    /// `base_url` defaults to `https://{api_host}`.
    pub fn new(
        api_key: impl Into<String>,
        api_host: impl Into<String>,
        base_url: Option<&str>,
    ) -> Result<Self, DomainError> {
        let api_host = api_host.into();
        let base = match base_url {
            Some(url) => url.to_string(),
            None => format!("https://{api_host}"),
        };
        let base_url = Url::parse(&base)
            .map_err(|e| DomainError::config(format!("ExerciseDbResolver: invalid base URL '{base}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DomainError::config(format!(
                "ExerciseDbResolver: '{base}' cannot be used as a base URL"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::config(format!("ExerciseDbResolver: failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_host,
            base_url,
        })
    }

    /// `{base}/exercises/name/{name}` with the name percent-encoded as one path segment.
    pub fn lookup_url(&self, exercise_name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["exercises", "name", exercise_name]);
        }
        url
    }

    fn first_match(exercise_name: &str, entries: Vec<ExerciseEntry>) -> MediaLookup {
        let total = entries.len();
        match entries.into_iter().next() {
            None => {
                debug!("ExerciseDB has no match for '{}'", exercise_name);
                MediaLookup::NotFound
            }
            Some(entry) => match entry.gif_url.filter(|u| !u.trim().is_empty()) {
                Some(url) => {
                    if total > 1 {
                        debug!(
                            "ExerciseDB returned {} matches for '{}', using the first",
                            total, exercise_name
                        );
                    }
                    MediaLookup::Found(url)
                }
                None => {
                    warn!("First ExerciseDB match for '{}' has no gifUrl", exercise_name);
                    MediaLookup::NotFound
                }
            },
        }
    }
}

#[async_trait]
impl MediaResolver for ExerciseDbResolver {
    async fn resolve(&self, exercise_name: &str) -> Result<MediaLookup, DomainError> {
        let url = self.lookup_url(exercise_name);

        let response = self
            .client
            .get(url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .send()
            .await
            .map_err(|e| DomainError::resolution(format!("ExerciseDbResolver: request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("ExerciseDbResolver: API returned {status}: {body}");
            return Err(DomainError::resolution(format!(
                "ExerciseDbResolver: API returned {status}"
            )));
        }

        let entries: Vec<ExerciseEntry> = response.json().await.map_err(|e| {
            DomainError::resolution(format!("ExerciseDbResolver: failed to parse response: {e}"))
        })?;

        Ok(Self::first_match(exercise_name, entries))
    }
}
