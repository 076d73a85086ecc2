//! # Demo Server
//!
//! A small HTTP server around a mutable set of labeled 2D points.
//!
//! ## Features
//!
//! - **Ingestion**: add points from query parameters or a JSON body
//! - **Presentation**: read the point set back as JSON or as an SVG scatter plot
//! - **Streaming**: a time-bounded, chunked stream of synthetic samples
//!
//! ## Architecture
//!
//! - [`models`]: point value types
//! - [`db`]: the point repository and its in-memory implementation
//! - [`services`]: ingestion, rendering and streaming logic
//! - [`config`]: TOML + environment configuration
//! - `http`: axum router, handlers and server (feature `http-server`)

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
