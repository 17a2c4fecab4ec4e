//! Coordinate transformations for the drawing viewer.

mod coords;

pub use coords::*;
