//! Validation of drawings and analysis configuration.

mod validate;

pub use validate::*;
