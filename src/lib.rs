//! pid-isolate - valve isolation analysis for P&ID drawings.
//!
//! Reads tagged components and pipe line segments from a drawing, links
//! components that sit near a common line, and searches that graph for the
//! valves that isolate a target component. The result is turned into an
//! ordered CLOSE / OPEN / VERIFY work procedure.
//!
//! # Example
//!
//! ```no_run
//! use pid_isolate::{analyze_drawing_file, AnalysisConfig};
//! use std::path::Path;
//!
//! let config = AnalysisConfig::default();
//! let report = analyze_drawing_file(Path::new("unit-43.dxf"), Some("VC-4307"), &config)?;
//! if let Some(procedure) = &report.isolation_procedure {
//!     println!("{}", procedure.render_text());
//! }
//! # Ok::<(), pid_isolate::AnalysisError>(())
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod parser;
pub mod procedure;
pub mod report;
pub mod search;
pub mod transform;
pub mod validation;

// Re-exports for convenience
pub use classify::{classify_tag, normalize_tag};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, ErrorCode, Result};
pub use graph::{build_proximity_graph, ProximityGraph};
pub use model::{Component, ComponentType, Drawing, Point, RawDrawing, Segment};
pub use parser::{parse_drawing_file, parse_drawing_json};
pub use procedure::{generate_procedure, procedure_for, Procedure, Step, StepAction};
pub use report::{analyze_drawing, DrawingReport, IsolationAnalysis};
pub use search::{find_isolation_valves, FlowDirection, IsolationCandidate, IsolationResult};
pub use transform::{viewer_markers, ImageOrientation, ViewerMarker};
pub use validation::{validate_config, ValidationResult};

use std::path::Path;

/// Read a drawing file and analyze it.
///
/// Errors only when the file cannot be read or parsed. Problems inside the
/// drawing are logged and carried in [`DrawingReport::warnings`].
pub fn analyze_drawing_file(
    path: &Path,
    target: Option<&str>,
    config: &AnalysisConfig,
) -> Result<DrawingReport> {
    let drawing = load_drawing(path, config)?;
    Ok(analyze_drawing(&drawing, target, config))
}

/// Read a drawing file and classify its content.
pub fn load_drawing(path: &Path, config: &AnalysisConfig) -> Result<Drawing> {
    let raw = parse_drawing_file(path)?;
    Ok(Drawing::from_raw(&raw, config))
}
