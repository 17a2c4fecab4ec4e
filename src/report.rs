//! Per-drawing analysis report.

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::graph::build_proximity_graph;
use crate::model::{ComponentType, Drawing};
use crate::procedure::{generate_procedure, Procedure};
use crate::search::{find_isolation_valves, IsolationResult};
use crate::validation::{validate_connectivity, validate_drawing};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Outcome of the isolation search, as written to the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IsolationAnalysis {
    Found(IsolationResult),
    /// Target absent from the drawing; no procedure is produced.
    NotFound { error: String },
}

impl IsolationAnalysis {
    /// The search result, if the target was found.
    pub fn result(&self) -> Option<&IsolationResult> {
        match self {
            IsolationAnalysis::Found(result) => Some(result),
            IsolationAnalysis::NotFound { .. } => None,
        }
    }
}

/// Everything computed for one drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawingReport {
    pub drawing: String,
    /// Number of classified components.
    pub valve_count: usize,
    /// Number of line segments.
    pub line_count: usize,
    pub type_counts: BTreeMap<ComponentType, usize>,
    /// Proximity graph adjacency.
    pub connections: BTreeMap<String, BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolation_analysis: Option<IsolationAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolation_procedure: Option<Procedure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Analyze one drawing, optionally isolating `target`.
///
/// The target is matched ignoring case, whitespace and hyphens. A missing
/// target is recorded in the report rather than returned as an error.
pub fn analyze_drawing(
    drawing: &Drawing,
    target: Option<&str>,
    config: &AnalysisConfig,
) -> DrawingReport {
    let graph = build_proximity_graph(
        &drawing.components,
        &drawing.segments,
        config.proximity_threshold,
    );

    let mut validation = validate_drawing(drawing);
    validation.merge(validate_connectivity(drawing, &graph));
    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    let mut report = DrawingReport {
        drawing: drawing.name.clone(),
        valve_count: drawing.components.len(),
        line_count: drawing.segments.len(),
        type_counts: drawing.type_counts(),
        connections: graph.connections().clone(),
        isolation_analysis: None,
        isolation_procedure: None,
        warnings: validation.warnings,
    };

    let Some(query) = target else {
        return report;
    };

    let outcome = match drawing.resolve_tag(query) {
        Some(tag) => find_isolation_valves(tag, drawing, &graph, config),
        None => Err(AnalysisError::ValveNotFound {
            tag: query.to_string(),
        }),
    };

    match outcome {
        Ok(result) => {
            let procedure = generate_procedure(&result);
            info!(
                "{}: isolation procedure for {} has {} step(s)",
                drawing.name,
                result.target,
                procedure.steps.len()
            );
            report.isolation_analysis = Some(IsolationAnalysis::Found(result));
            report.isolation_procedure = Some(procedure);
        }
        Err(e) => {
            info!("{}: {}", drawing.name, e);
            report.isolation_analysis = Some(IsolationAnalysis::NotFound {
                error: e.to_string(),
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Point, Segment};

    fn drawing() -> Drawing {
        let config = AnalysisConfig::default();
        let comp = |tag: &str, t: ComponentType, y: f64| {
            Component::try_new(tag, t, Point::new(0.0, y), config.can_isolate(t)).unwrap()
        };
        Drawing::new(
            "unit.dxf",
            vec![
                comp("VG-4301", ComponentType::Gate, 100.0),
                comp("VC-4307", ComponentType::Check, 50.0),
                comp("VB-4302", ComponentType::Ball, 0.0),
            ],
            vec![Segment::try_new(Point::new(0.0, 0.0), Point::new(0.0, 100.0), "PIPE").unwrap()],
        )
    }

    #[test]
    fn test_report_without_target() {
        let report = analyze_drawing(&drawing(), None, &AnalysisConfig::default());
        assert_eq!(report.valve_count, 3);
        assert_eq!(report.line_count, 1);
        assert_eq!(report.connections.len(), 3);
        assert!(report.isolation_analysis.is_none());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_report_resolves_loose_target() {
        let report = analyze_drawing(&drawing(), Some("vc4307"), &AnalysisConfig::default());
        let result = report.isolation_analysis.as_ref().and_then(|a| a.result()).unwrap();
        assert_eq!(result.target, "VC-4307");
        assert_eq!(report.isolation_procedure.unwrap().steps.len(), 3);
    }

    #[test]
    fn test_report_not_found() {
        let report = analyze_drawing(&drawing(), Some("VC-9999"), &AnalysisConfig::default());
        assert!(report.isolation_procedure.is_none());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isolation_analysis"]["error"], "Valve VC-9999 not found");
        assert!(json.get("isolation_procedure").is_none());
        assert_eq!(json["type_counts"]["gate"], 1);
    }
}
