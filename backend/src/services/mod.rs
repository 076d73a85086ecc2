//! Service layer.
//!
//! Everything here is independent of HTTP: the handlers in `crate::http`
//! only translate requests into these calls and results into responses.

pub mod boundaries;
pub mod ingest;
pub mod plot;
pub mod render;
pub mod stream;
pub mod uptime;

pub use ingest::{ingest, IngestError, ADDED};
pub use plot::{PlotRenderer, RenderError, ScatterPlot, SvgRenderer};
pub use render::RenderSettings;
pub use stream::{StreamSession, StreamSettings};
pub use uptime::UptimeTracker;
