//! Best-effort checks on drawings and configuration.
//!
//! Drawing problems are reported as warnings and never stop an analysis;
//! only an unusable configuration is an error.

use crate::config::AnalysisConfig;
use crate::graph::ProximityGraph;
use crate::model::Drawing;

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Check that the configuration can drive an analysis.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if !config.proximity_threshold.is_finite() || config.proximity_threshold <= 0.0 {
        result.add_error(format!(
            "Proximity threshold must be a positive number, got {}",
            config.proximity_threshold
        ));
    }

    if config.isolation_types.is_empty() {
        result.add_warning("No isolation valve types configured; procedures will only verify");
    }

    result
}

/// Check a drawing's content. Never produces errors.
pub fn validate_drawing(drawing: &Drawing) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let name = &drawing.name;

    if drawing.components.is_empty() {
        result.add_warning(format!("{}: No tagged components found", name));
    }

    if drawing.segments.is_empty() {
        result.add_warning(format!("{}: No line segments found", name));
    }

    let degenerate = drawing.segments.iter().filter(|s| s.is_degenerate()).count();
    if degenerate > 0 {
        result.add_warning(format!(
            "{}: {} zero-length segment(s); point distance used",
            name, degenerate
        ));
    }

    if !drawing.skipped.is_empty() {
        result.add_warning(format!(
            "{}: {} entity(ies) skipped during extraction",
            name,
            drawing.skipped.len()
        ));
    }

    result
}

/// Report components that no segment comes near.
pub fn validate_connectivity(drawing: &Drawing, graph: &ProximityGraph) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let unattached: Vec<&str> = drawing
        .components
        .iter()
        .filter(|c| graph.incident_segments(&c.tag).is_none())
        .map(|c| c.tag.as_str())
        .collect();

    if !unattached.is_empty() {
        result.add_warning(format!(
            "{}: {} component(s) not near any line: {}",
            drawing.name,
            unattached.len(),
            unattached.join(", ")
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_proximity_graph;
    use crate::model::{Component, ComponentType, Point, RawDrawing, RawSegment, Segment};

    // ==================== ValidationResult tests ====================

    #[test]
    fn test_validation_result_ok() {
        let result = ValidationResult::ok();
        assert!(result.passed);
        assert!(result.warnings.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_merge_propagates_failure() {
        let mut result = ValidationResult::ok();
        let mut other = ValidationResult::ok();
        other.add_error("bad");
        other.add_warning("meh");
        result.merge(other);
        assert!(!result.passed);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }

    // ==================== Config tests ====================

    #[test]
    fn test_default_config_is_valid() {
        let result = validate_config(&AnalysisConfig::default());
        assert!(result.passed);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_bad_threshold() {
        let result = validate_config(&AnalysisConfig::new(0.0, 3));
        assert!(!result.passed);
        let result = validate_config(&AnalysisConfig::new(f64::NAN, 3));
        assert!(!result.passed);
    }

    #[test]
    fn test_empty_isolation_types_warns() {
        let config = AnalysisConfig::default().with_isolation_types(Vec::<ComponentType>::new());
        let result = validate_config(&config);
        assert!(result.passed);
        assert_eq!(result.warnings.len(), 1);
    }

    // ==================== Drawing tests ====================

    #[test]
    fn test_empty_drawing_warns_but_passes() {
        let result = validate_drawing(&Drawing::default());
        assert!(result.passed);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_skipped_and_degenerate() {
        let raw = RawDrawing {
            name: Some("x.dxf".to_string()),
            components: vec![],
            segments: vec![
                RawSegment::new(Point::new(1.0, 1.0), Point::new(1.0, 1.0), "0"),
                RawSegment::default(),
            ],
        };
        let drawing = Drawing::from_raw(&raw, &AnalysisConfig::default());
        let result = validate_drawing(&drawing);
        assert!(result.passed);
        // no components, one zero-length segment, one skipped segment
        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings.iter().any(|w| w.contains("zero-length")));
    }

    #[test]
    fn test_unattached_components() {
        let comps = vec![
            Component::try_new("VG-1", ComponentType::Gate, Point::new(0.0, 0.0), true).unwrap(),
            Component::try_new("VG-2", ComponentType::Gate, Point::new(500.0, 500.0), true)
                .unwrap(),
        ];
        let segs = vec![Segment::try_new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), "P").unwrap()];
        let drawing = Drawing::new("d", comps, segs);
        let graph = build_proximity_graph(&drawing.components, &drawing.segments, 30.0);
        let result = validate_connectivity(&drawing, &graph);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].ends_with("VG-2"));
    }
}
