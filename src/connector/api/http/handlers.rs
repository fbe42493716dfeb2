use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::domain::{PainDescription, VocabularyRegistry};

use super::envelope::{self, ExerciseList, HealthResponse, RecommendationRequest, PAIN_REQUIRED};
use super::AppState;

/// `POST /api/recommendations`
///
/// A missing, blank, or unparseable pain description is answered with a 400
/// before any upstream call is made.
pub async fn create_recommendation(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Response {
    let text = match payload {
        Ok(Json(request)) => request.pain_description,
        Err(rejection) => {
            debug!("Rejected recommendation body: {}", rejection);
            None
        }
    };
    let Some(pain) = text.and_then(|t| PainDescription::new(t).ok()) else {
        return envelope::bad_request(PAIN_REQUIRED);
    };

    let request_id = Uuid::new_v4();
    let cancel = state.shutdown.child_token();
    let use_case = state.recommend_use_case.clone();

    async move {
        info!("Recommendation requested ({} chars)", pain.as_str().len());
        match use_case.execute_with_cancellation(&pain, &cancel).await {
            Ok(recommendation) => {
                info!(
                    "Recommended '{}' with {}",
                    recommendation.exercise_name(),
                    recommendation.media_url()
                );
                envelope::ok(recommendation)
            }
            Err(e) if e.is_cancelled() => {
                info!("Recommendation cancelled");
                envelope::failure(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            Err(e) => {
                error!("Recommendation failed: {}", e);
                envelope::failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
    .instrument(info_span!("recommendation", %request_id))
    .await
}

/// `GET /api/exercises`
pub async fn list_exercises() -> Json<ExerciseList> {
    Json(ExerciseList {
        exercises: VocabularyRegistry::standard()
            .names()
            .map(str::to_string)
            .collect(),
    })
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        message: format!("Recommendation service is running on {}", state.model_name),
    })
}
