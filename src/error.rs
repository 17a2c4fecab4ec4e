//! Error types for drawing analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for drawing analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// General parse error (-3)
    ParseError = -3,
    /// Unsupported drawing format (-4)
    UnsupportedFormat = -4,
    /// Tag is empty after normalization (E100)
    InvalidTag = 100,
    /// NaN or infinite coordinate (E101)
    NonFiniteCoordinate = 101,
    /// Target valve absent from the drawing (E200)
    ValveNotFound = 200,
}

/// Main error type for the analyzer.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Unsupported drawing format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid tag '{raw}': empty after normalization")]
    InvalidTag { raw: String },

    #[error("Non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("Valve {tag} not found")]
    ValveNotFound { tag: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalysisError::FileNotFound { .. } => ErrorCode::FileNotFound,
            AnalysisError::EmptyFile { .. } => ErrorCode::EmptyFile,
            AnalysisError::ParseError { .. } => ErrorCode::ParseError,
            AnalysisError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            AnalysisError::InvalidTag { .. } => ErrorCode::InvalidTag,
            AnalysisError::NonFiniteCoordinate { .. } => ErrorCode::NonFiniteCoordinate,
            AnalysisError::ValveNotFound { .. } => ErrorCode::ValveNotFound,
            AnalysisError::Json(_) => ErrorCode::ParseError,
            AnalysisError::Io(_) => ErrorCode::FileNotFound,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }

    /// Whether this is a target lookup failure rather than an input problem.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, AnalysisError::ValveNotFound { .. })
    }
}

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valve_not_found_message() {
        let err = AnalysisError::ValveNotFound {
            tag: "VC-9999".to_string(),
        };
        assert_eq!(err.to_string(), "Valve VC-9999 not found");
        assert_eq!(err.code(), ErrorCode::ValveNotFound);
        assert_eq!(err.code_value(), 200);
        assert!(err.is_lookup_failure());
    }

    #[test]
    fn test_parse_error_code() {
        let err = AnalysisError::ParseError {
            line: 12,
            message: "bad group code".to_string(),
        };
        assert_eq!(err.code_value(), -3);
        assert!(!err.is_lookup_failure());
    }
}
