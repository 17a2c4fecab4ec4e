//! Drawing readers (ASCII DXF and JSON interchange).

mod dxf;
mod entities;

pub use dxf::DxfParser;
pub use entities::Entity;

use crate::error::{AnalysisError, Result};
use crate::model::RawDrawing;
use std::path::Path;

/// Parse a drawing file, choosing the reader by extension.
///
/// `.dxf` files are read as ASCII DXF (non-UTF-8 bytes are replaced),
/// `.json` files as a serialized [`RawDrawing`]. The drawing name defaults
/// to the file name.
pub fn parse_drawing_file(path: &Path) -> Result<RawDrawing> {
    use std::fs;

    if !path.exists() {
        return Err(AnalysisError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);

    if content.trim().is_empty() {
        return Err(AnalysisError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let mut raw = match extension.as_str() {
        "dxf" => DxfParser::new(&content)?.parse(),
        "json" => parse_drawing_json(&content)?,
        _ => {
            return Err(AnalysisError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    if raw.name.is_none() {
        raw.name = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string);
    }

    Ok(raw)
}

/// Parse the JSON interchange form of a drawing.
pub fn parse_drawing_json(content: &str) -> Result<RawDrawing> {
    Ok(serde_json::from_str(content)?)
}
