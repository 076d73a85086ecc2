//! Application state for the HTTP server.

use axum::body::Bytes;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::PointRepository;
use crate::services::boundaries::render_class_boundaries;
use crate::services::{PlotRenderer, RenderError, RenderSettings, StreamSettings, UptimeTracker};

/// A response body fixed at startup, served without further allocation.
#[derive(Debug, Clone)]
pub struct StaticContent {
    pub body: Bytes,
    pub content_type: &'static str,
}

impl StaticContent {
    pub fn new(body: impl Into<Bytes>, content_type: &'static str) -> Self {
        Self {
            body: body.into(),
            content_type,
        }
    }
}

impl IntoResponse for StaticContent {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Point storage; the only mutable shared resource
    pub repository: Arc<dyn PointRepository>,
    pub renderer: Arc<dyn PlotRenderer>,
    pub render_settings: Arc<RenderSettings>,
    pub stream_settings: Arc<StreamSettings>,
    /// Class boundaries picture, rendered once
    pub boundaries: StaticContent,
    pub uptime: UptimeTracker,
}

impl AppState {
    /// Create the application state, rendering the static pictures up front.
    pub fn new(
        repository: Arc<dyn PointRepository>,
        renderer: Arc<dyn PlotRenderer>,
        config: &ServerConfig,
    ) -> Result<Self, RenderError> {
        let render_settings = config.render_settings();
        let boundaries = StaticContent::new(
            render_class_boundaries(renderer.as_ref(), render_settings.size)?,
            renderer.content_type(),
        );

        Ok(Self {
            repository,
            renderer,
            render_settings: Arc::new(render_settings),
            stream_settings: Arc::new(config.stream.clone()),
            boundaries,
            uptime: UptimeTracker::new(),
        })
    }
}
