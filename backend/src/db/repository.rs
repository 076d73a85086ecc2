//! Repository trait for point storage.
//!
//! The HTTP layer only ever talks to a `PointRepository`, so the in-memory
//! store can be swapped for something else without touching the handlers.

use crate::models::Point;

/// Ordered, append-only point storage.
///
/// Implementations must make `append` atomic with respect to `snapshot`:
/// a reader sees either the whole new point or nothing of it.
pub trait PointRepository: Send + Sync {
    /// Add `point` as the new last element.
    fn append(&self, point: Point);

    /// Copy of every point appended before the call, in insertion order.
    fn snapshot(&self) -> Vec<Point>;

    /// Number of stored points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
