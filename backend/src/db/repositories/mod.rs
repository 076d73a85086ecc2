//! Repository implementations module.
//!
//! - `local`: in-memory implementation, the only backend the demo needs
pub mod local;

pub use local::LocalPointStore;
