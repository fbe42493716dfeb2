//! HTTP surface for the recommendation service.
//!
//! Routes:
//! - `POST /api/recommendations` takes `{"painDescription": "..."}` and returns one exercise
//! - `GET /api/exercises` lists the exercise vocabulary
//! - `GET /health` is a liveness probe

pub mod envelope;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::application::RecommendExerciseUseCase;

use super::Container;

#[derive(Clone)]
pub struct AppState {
    recommend_use_case: Arc<RecommendExerciseUseCase>,
    shutdown: CancellationToken,
    model_name: Arc<str>,
}

impl AppState {
    pub fn from_container(container: &Container) -> Self {
        Self {
            recommend_use_case: container.recommend_use_case(),
            shutdown: container.shutdown_token(),
            model_name: Arc::from(container.model_name()),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/recommendations", post(handlers::create_recommendation))
        .route("/api/exercises", get(handlers::list_exercises))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves until Ctrl-C, then cancels in-flight recommendations and drains.
pub async fn serve(container: &Container, addr: SocketAddr) -> Result<()> {
    let app = create_app(AppState::from_container(container));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Listening on http://{}", addr);

    let shutdown = container.shutdown_token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                    }
                    info!("Shutdown signal received");
                    shutdown.cancel();
                }
                _ = shutdown.cancelled() => {}
            }
        })
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}
