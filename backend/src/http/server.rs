//! The demo server object.

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use super::router::create_router;
use super::state::AppState;
use crate::config::ServerConfig;
use crate::db::LocalPointStore;
use crate::services::{RenderError, SvgRenderer};

/// Owns the point store and everything needed to serve it.
///
/// The store lives exactly as long as the server; handlers reach it through
/// the shared [`AppState`].
pub struct DemoServer {
    config: ServerConfig,
    store: LocalPointStore,
    state: AppState,
}

impl DemoServer {
    /// Build a server with an empty store and the SVG renderer.
    pub fn new(config: ServerConfig) -> Result<Self, RenderError> {
        let store = LocalPointStore::new();
        let state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(SvgRenderer::new()),
            &config,
        )?;
        Ok(Self {
            config,
            store,
            state,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &LocalPointStore {
        &self.store
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone(), &self.config.routes)
    }

    /// Serve on an already bound listener until the process exits.
    pub async fn serve_on(self, listener: TcpListener) -> std::io::Result<()> {
        let app = self.router();
        axum::serve(listener, app).await
    }

    /// Bind the configured address and serve.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.bind_addr()?;
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on http://{}", listener.local_addr()?);
        info!(
            "Points at {}, stream at {}",
            self.config.routes.ingest_path, self.config.routes.stream_path
        );
        self.serve_on(listener).await?;
        info!("Done.");
        Ok(())
    }
}
