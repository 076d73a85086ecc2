//! Router configuration for the HTTP API.
//!
//! This module sets up all routes and middleware (CORS, tracing) and creates
//! the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::config::RouteSettings;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState, routes: &RouteSettings) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::class_boundaries))
        .route("/ok", get(handlers::ok))
        .route("/uptime", get(handlers::uptime))
        .route(
            &routes.ingest_path,
            get(handlers::get_points).post(handlers::ingest_point),
        )
        .route(&routes.stream_path, get(handlers::stream_samples))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
