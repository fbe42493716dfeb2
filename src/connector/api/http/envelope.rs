//! JSON bodies returned by the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::Recommendation;

/// Message returned with a 400 when the pain description is missing or blank.
pub const PAIN_REQUIRED: &str = "Pain description is required";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub pain_description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePayload {
    pub name: String,
    pub steps: Vec<String>,
    pub precautions: Vec<String>,
    pub gif_url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub success: bool,
    pub exercise: ExercisePayload,
    pub disclaimer: String,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        let (advice, gif_url) = recommendation.into_parts();
        Self {
            success: true,
            exercise: ExercisePayload {
                name: advice.exercise_name().to_string(),
                steps: advice.steps().to_vec(),
                precautions: advice.precautions().to_vec(),
                gif_url,
            },
            disclaimer: advice.disclaimer().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseList {
    pub exercises: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub ok: bool,
    pub message: String,
}

pub fn ok(recommendation: Recommendation) -> Response {
    (
        StatusCode::OK,
        Json(RecommendationResponse::from(recommendation)),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationError {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(FailureResponse {
            success: false,
            error: message.into(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExerciseRecommendation;

    #[test]
    fn recommendation_serializes_with_camel_case_media_field() {
        let advice = ExerciseRecommendation::new(
            "dead bug".to_string(),
            vec!["Lie on back".to_string()],
            vec!["Keep lower back flat".to_string()],
            Some("See a physio".to_string()),
        );
        let response = RecommendationResponse::from(advice.with_media_url("http://x/y.gif"));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "exercise": {
                    "name": "dead bug",
                    "steps": ["Lie on back"],
                    "precautions": ["Keep lower back flat"],
                    "gifUrl": "http://x/y.gif"
                },
                "disclaimer": "See a physio"
            })
        );
    }

    #[test]
    fn request_accepts_missing_field() {
        let req: RecommendationRequest = serde_json::from_str("{}").unwrap();
        assert!(req.pain_description.is_none());

        let req: RecommendationRequest =
            serde_json::from_str(r#"{"painDescription":"sore knee"}"#).unwrap();
        assert_eq!(req.pain_description.as_deref(), Some("sore knee"));
    }

    #[test]
    fn failure_carries_status() {
        let response = failure(StatusCode::SERVICE_UNAVAILABLE, "Request cancelled");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(bad_request(PAIN_REQUIRED).status(), StatusCode::BAD_REQUEST);
    }
}
