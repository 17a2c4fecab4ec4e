//! Data model types for drawing analysis.

mod component;
mod drawing;
mod geometry;

pub use component::{Category, Component, ComponentType};
pub use drawing::{Drawing, RawComponent, RawDrawing, RawSegment};
pub use geometry::{distance, point_to_segment_distance, Point, Segment};
