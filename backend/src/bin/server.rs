//! Demo HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo-server
//! PORT=8080 RUST_LOG=debug cargo run --bin demo-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 2015)
//! - `DEMO_CONFIG`: Path to a TOML configuration file
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use demo_server::config::ServerConfig;
use demo_server::http::DemoServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting demo server");

    let config = ServerConfig::load()?;
    let server = DemoServer::new(config)?;
    server.serve().await
}
