//! Isolation procedure generation.

mod steps;

pub use steps::*;
