//! HTTP handlers for the API.
//!
//! Each handler corresponds to an endpoint and delegates to the service layer.

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::convert::Infallible;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::dto::{PointsQuery, StreamQuery, UptimeResponse};
use super::error::AppError;
use super::state::{AppState, StaticContent};
use crate::models::PointsDocument;
use crate::services::stream::{session_duration, spawn_session, STREAM_CONTENT_TYPE};
use crate::services::{ingest, render, StreamSession, ADDED};

// =============================================================================
// Health
// =============================================================================

/// GET /ok
pub async fn ok() -> &'static str {
    "OK\n"
}

/// GET /uptime
pub async fn uptime(State(state): State<AppState>) -> Json<UptimeResponse> {
    Json(UptimeResponse {
        uptime: state.uptime.uptime(),
    })
}

/// GET /
///
/// The class boundaries picture, rendered at startup.
pub async fn class_boundaries(State(state): State<AppState>) -> StaticContent {
    state.boundaries
}

// =============================================================================
// Points
// =============================================================================

/// POST <ingest-path>
///
/// Store one point, taken from the JSON body if there is one and from the
/// query string otherwise.
pub async fn ingest_point(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    match ingest::ingest(state.repository.as_ref(), &params, &body) {
        Ok((point, encoding)) => {
            debug!(?point, ?encoding, "point added");
            Ok(ADDED)
        }
        Err(e) => {
            warn!(error = %e, "rejected point body");
            Err(e.into())
        }
    }
}

/// GET <ingest-path>[?format=svg]
///
/// The current point set as JSON, or as a scatter plot when `format=svg`.
pub async fn get_points(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let query = PointsQuery::from_params(&params);
    let points = state.repository.snapshot();

    if !query.wants_svg() {
        let document: PointsDocument = render::to_document(points);
        return Ok(Json(document).into_response());
    }

    let renderer = state.renderer.clone();
    let settings = state.render_settings.clone();
    let content_type = renderer.content_type();
    let image = tokio::task::spawn_blocking(move || {
        render::render_image(&points, &settings, renderer.as_ref())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(|e| {
        error!(error = %e, "failed to render points");
        AppError::from(e)
    })?;

    Ok(([(header::CONTENT_TYPE, content_type)], image).into_response())
}

// =============================================================================
// Stream
// =============================================================================

/// GET <stream-path>?t=<seconds>
///
/// Open a chunked response and feed it from a freshly spawned session. The
/// headers go out right away; samples follow as the session flushes them.
pub async fn stream_samples(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = StreamQuery::from_params(&params);
    let id = Uuid::new_v4().to_string();
    let duration = session_duration(query.t.as_deref());
    info!(session = %id, ?duration, "stream session opened");

    let settings = state.stream_settings.as_ref().clone();
    let capacity = settings.channel_capacity;
    let session = StreamSession::new(id, settings, duration, StdRng::from_entropy());
    let mut chunks = spawn_session(session, capacity);

    let body = async_stream::stream! {
        while let Some(chunk) = chunks.recv().await {
            yield Ok::<_, Infallible>(chunk);
        }
    };

    (
        [
            (header::CONTENT_TYPE, STREAM_CONTENT_TYPE),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(body),
    )
        .into_response()
}
