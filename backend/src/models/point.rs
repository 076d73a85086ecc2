//! Labeled 2D points and the document that wraps a list of them.

use serde::{Deserialize, Serialize};

/// A single labeled point.
///
/// Points are plain values: two points are equal when all three fields are
/// equal, and a point has no identity beyond its position in the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub label: bool,
}

impl Point {
    pub fn new(x: f64, y: f64, label: bool) -> Self {
        Self { x, y, label }
    }
}

/// Structured document for the whole point set: `{"points": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsDocument {
    pub points: Vec<Point>,
}

impl From<Vec<Point>> for PointsDocument {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}
