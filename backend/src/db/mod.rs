//! Point storage.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (ingest, query)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository.rs)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  LocalPointStore (in-memory, process lifetime)           │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod repositories;
pub mod repository;

pub use repositories::LocalPointStore;
pub use repository::PointRepository;
