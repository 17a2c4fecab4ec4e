//! Connectivity graph construction.

mod proximity;

pub use proximity::*;
