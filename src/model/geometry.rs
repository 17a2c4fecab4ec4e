//! Points, line segments and the distance functions used for connectivity.

use crate::config::float_cmp::approx_zero;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// A position in drawing space (CAD units or page units, never mixed).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point without validation.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a point, rejecting NaN and infinite coordinates.
    pub fn try_new(x: f64, y: f64) -> Result<Self> {
        if x.is_finite() && y.is_finite() {
            Ok(Self { x, y })
        } else {
            Err(AnalysisError::NonFiniteCoordinate { x, y })
        }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(*self, *other)
    }
}

/// One drawn line, or one edge of a flattened polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    /// Source CAD layer (or category label for non-CAD input).
    pub layer: String,
}

impl Segment {
    /// Create a segment, rejecting non-finite endpoints.
    pub fn try_new(start: Point, end: Point, layer: impl Into<String>) -> Result<Self> {
        let start = Point::try_new(start.x, start.y)?;
        let end = Point::try_new(end.x, end.y)?;
        Ok(Self {
            start,
            end,
            layer: layer.into(),
        })
    }

    /// Segment length.
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    /// Check if both endpoints coincide (within `EPS`).
    pub fn is_degenerate(&self) -> bool {
        approx_zero(self.length())
    }

    /// Shortest distance from a point to this segment.
    pub fn distance_to_point(&self, point: Point) -> f64 {
        point_to_segment_distance(point, self.start, self.end)
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Distance from `point` to the closest point of the segment from `start`
/// to `end`.
///
/// The projection parameter is clamped to `[0, 1]`. A zero-length segment
/// falls back to point-to-point distance.
pub fn point_to_segment_distance(point: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        return distance(point, start);
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / len_sq).clamp(0.0, 1.0);
    let projection = Point::new(start.x + t * dx, start.y + t * dy);

    distance(point, projection)
}
