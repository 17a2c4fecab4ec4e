//! Isolation valve search over the proximity graph.

mod isolation;

pub use isolation::*;
