//! Route modules for the notebook server

pub mod notebook;
pub mod ui;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::notebook::PoolStats;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub workers: PoolStats,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        workers: state.pool_stats(),
    })
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config().server.max_upload_bytes();

    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/health", get(health_check))
        .merge(notebook::router(body_limit))
        .merge(ui::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
