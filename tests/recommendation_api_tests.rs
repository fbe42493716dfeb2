use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use physio_advisor::connector::api::http::{create_app, AppState};
use physio_advisor::{Container, MockChatClient, MockMediaResolver, RetryPolicy, TokioSleeper};

const DEAD_BUG_REPLY: &str = r#"```json
{"exercises":[{"exercise_name":"dead bug","steps":["Lie on back","Extend opposite limbs"],"precautions":["Keep lower back flat"]}],"disclaimer":"See a physio"}
```"#;

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new()
        .with_max_attempts(max_attempts)
        .with_initial_delay(Duration::from_millis(1))
}

fn container(chat: Arc<MockChatClient>, media: Arc<MockMediaResolver>, attempts: u32) -> Container {
    Container::from_parts(chat, media, Arc::new(TokioSleeper), fast_policy(attempts))
}

async fn post_json(container: &Container, body: &str) -> Response {
    create_app(AppState::from_container(container))
        .oneshot(
            Request::post("/api/recommendations")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn returns_validated_recommendation_with_media() {
    let chat = Arc::new(MockChatClient::with_responses([DEAD_BUG_REPLY]));
    let media = Arc::new(MockMediaResolver::with_url("http://x/y.gif"));
    let container = container(chat.clone(), media.clone(), 3);

    let response = post_json(
        &container,
        r#"{"painDescription":"I have lower back pain from sitting too long."}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "success": true,
            "exercise": {
                "name": "dead bug",
                "steps": ["Lie on back", "Extend opposite limbs"],
                "precautions": ["Keep lower back flat"],
                "gifUrl": "http://x/y.gif"
            },
            "disclaimer": "See a physio"
        })
    );
    assert_eq!(chat.calls(), 1);
    assert_eq!(media.calls(), 1);
}

#[tokio::test]
async fn blank_description_makes_no_upstream_calls() {
    for body in [
        r#"{"painDescription":""}"#,
        r#"{"painDescription":"   "}"#,
        r#"{}"#,
        r#"{"painDescription":42}"#,
    ] {
        let chat = Arc::new(MockChatClient::with_responses([DEAD_BUG_REPLY]));
        let media = Arc::new(MockMediaResolver::with_url("http://x/y.gif"));
        let container = container(chat.clone(), media.clone(), 3);

        let response = post_json(&container, body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Pain description is required" })
        );
        assert_eq!(chat.calls(), 0);
        assert_eq!(media.calls(), 0);
    }
}

#[tokio::test]
async fn missing_media_exhausts_attempts() {
    let chat = Arc::new(MockChatClient::with_responses([DEAD_BUG_REPLY]));
    let media = Arc::new(MockMediaResolver::not_found());
    let container = container(chat.clone(), media.clone(), 3);

    let response = post_json(&container, r#"{"painDescription":"sore back"}"#).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("3 attempt(s)"), "error: {error}");
    assert!(error.contains("resolution"), "error: {error}");
    assert_eq!(chat.calls(), 3);
    assert_eq!(media.calls(), 3);
}

#[tokio::test]
async fn off_vocabulary_reply_is_retried() {
    let chat = Arc::new(MockChatClient::with_responses([
        r#"{"exercises":[{"exercise_name":"Moonwalk","steps":["Glide"]}]}"#,
        "not json at all",
        DEAD_BUG_REPLY,
    ]));
    let media = Arc::new(MockMediaResolver::with_url("http://x/y.gif"));
    let container = container(chat.clone(), media.clone(), 5);

    let response = post_json(&container, r#"{"painDescription":"sore back"}"#).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["exercise"]["name"], "dead bug");
    assert_eq!(chat.calls(), 3);
    assert_eq!(media.calls(), 1);
}

#[tokio::test]
async fn shutdown_cancels_requests() {
    let chat = Arc::new(MockChatClient::with_responses([DEAD_BUG_REPLY]));
    let media = Arc::new(MockMediaResolver::with_url("http://x/y.gif"));
    let container = container(chat.clone(), media, 3);
    container.shutdown_token().cancel();

    let response = post_json(&container, r#"{"painDescription":"sore back"}"#).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Request cancelled" })
    );
    assert_eq!(chat.calls(), 0);
}
