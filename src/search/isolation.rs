//! Breadth-first search for the valves that isolate a target valve.

use crate::classify::normalize_tag;
use crate::config::{AnalysisConfig, MAX_CANDIDATES_PER_DIRECTION};
use crate::error::{AnalysisError, Result};
use crate::graph::ProximityGraph;
use crate::model::{Component, ComponentType, Drawing, Point};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Side of the target a candidate sits on, along the inferred flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Upstream,
    Downstream,
}

impl FlowDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowDirection::Upstream => "upstream",
            FlowDirection::Downstream => "downstream",
        }
    }
}

/// Decides whether a neighbor lies upstream or downstream of the target.
pub trait FlowDirectionPolicy {
    fn direction(&self, target: &Component, neighbor: &Component) -> FlowDirection;
}

/// Flow runs from high y to low y: anything strictly above the target is
/// upstream, everything else downstream.
///
/// This is a layout heuristic. Drawings that do not follow a single
/// vertical flow convention get wrong directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalFlow;

impl FlowDirectionPolicy for VerticalFlow {
    fn direction(&self, target: &Component, neighbor: &Component) -> FlowDirection {
        if neighbor.position.y > target.position.y {
            FlowDirection::Upstream
        } else {
            FlowDirection::Downstream
        }
    }
}

/// An isolation-capable valve reached from the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationCandidate {
    pub tag: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub direction: FlowDirection,
    /// Hops from the target (1 = direct neighbor).
    pub depth: usize,
    /// Tags from the target to this candidate, both inclusive.
    pub path: Vec<String>,
    pub position: Point,
}

/// Nearest isolation valves on each side of a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationResult {
    pub target: String,
    pub target_type: ComponentType,
    pub target_position: Point,
    /// Closest first, at most two.
    #[serde(rename = "upstream_isolation")]
    pub upstream: Vec<IsolationCandidate>,
    /// Closest first, at most two.
    #[serde(rename = "downstream_isolation")]
    pub downstream: Vec<IsolationCandidate>,
    /// Every tag reached by the search, in discovery order.
    #[serde(rename = "all_connected_valves")]
    pub all_connected: Vec<String>,
}

impl IsolationResult {
    /// All candidates, upstream first.
    pub fn candidates(&self) -> impl Iterator<Item = &IsolationCandidate> {
        self.upstream.iter().chain(self.downstream.iter())
    }
}

/// Find isolation valves for `target` using the vertical flow heuristic.
pub fn find_isolation_valves(
    target: &str,
    drawing: &Drawing,
    graph: &ProximityGraph,
    config: &AnalysisConfig,
) -> Result<IsolationResult> {
    find_isolation_valves_with_policy(target, drawing, graph, config, &VerticalFlow)
}

/// Find isolation valves for `target` with a caller-supplied direction policy.
///
/// `target` is normalized before lookup, falling back to a match that also
/// ignores hyphens. Fails with [`AnalysisError::ValveNotFound`] when no tag
/// of `drawing` matches. Nodes at `config.max_search_depth` are not
/// expanded, so no candidate is deeper than that.
pub fn find_isolation_valves_with_policy(
    target: &str,
    drawing: &Drawing,
    graph: &ProximityGraph,
    config: &AnalysisConfig,
    policy: &dyn FlowDirectionPolicy,
) -> Result<IsolationResult> {
    let target_comp = drawing
        .find(&normalize_tag(target))
        .or_else(|| drawing.resolve_tag(target).and_then(|tag| drawing.find(tag)))
        .ok_or_else(|| AnalysisError::ValveNotFound {
            tag: target.trim().to_string(),
        })?;

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(target_comp.tag.as_str());
    let mut discovered: Vec<String> = Vec::new();
    let mut candidates: Vec<IsolationCandidate> = Vec::new();

    let mut queue: VecDeque<(&str, usize, Vec<String>)> = VecDeque::new();
    queue.push_back((target_comp.tag.as_str(), 0, vec![target_comp.tag.clone()]));

    while let Some((current, depth, path)) = queue.pop_front() {
        if depth >= config.max_search_depth {
            continue;
        }

        for neighbor_tag in graph.neighbors(current) {
            if !visited.insert(neighbor_tag) {
                continue;
            }
            let Some(neighbor) = drawing.find(neighbor_tag) else {
                continue;
            };

            discovered.push(neighbor.tag.clone());
            let mut neighbor_path = path.clone();
            neighbor_path.push(neighbor.tag.clone());

            if neighbor.can_isolate {
                candidates.push(IsolationCandidate {
                    tag: neighbor.tag.clone(),
                    component_type: neighbor.component_type,
                    direction: policy.direction(target_comp, neighbor),
                    depth: depth + 1,
                    path: neighbor_path.clone(),
                    position: neighbor.position,
                });
            }

            queue.push_back((neighbor.tag.as_str(), depth + 1, neighbor_path));
        }
    }

    let (mut upstream, mut downstream): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| c.direction == FlowDirection::Upstream);
    upstream.sort_by_key(|c| c.depth);
    downstream.sort_by_key(|c| c.depth);
    upstream.truncate(MAX_CANDIDATES_PER_DIRECTION);
    downstream.truncate(MAX_CANDIDATES_PER_DIRECTION);

    debug!(
        "Isolation search from {}: {} reached, {} upstream, {} downstream",
        target_comp.tag,
        discovered.len(),
        upstream.len(),
        downstream.len()
    );

    Ok(IsolationResult {
        target: target_comp.tag.clone(),
        target_type: target_comp.component_type,
        target_position: target_comp.position,
        upstream,
        downstream,
        all_connected: discovered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_proximity_graph;
    use crate::model::Segment;

    fn comp(tag: &str, t: ComponentType, x: f64, y: f64) -> Component {
        let config = AnalysisConfig::default();
        Component::try_new(tag, t, Point::new(x, y), config.can_isolate(t)).unwrap()
    }

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::try_new(Point::new(x1, y1), Point::new(x2, y2), "PIPE").unwrap()
    }

    fn analyze(drawing: &Drawing, target: &str, config: &AnalysisConfig) -> Result<IsolationResult> {
        let graph = build_proximity_graph(
            &drawing.components,
            &drawing.segments,
            config.proximity_threshold,
        );
        find_isolation_valves(target, drawing, &graph, config)
    }

    /// Vertical chain of components at x=0, y=100*i, each pair joined by
    /// its own short segment.
    fn chain(specs: &[(&str, ComponentType)]) -> Drawing {
        let comps = specs
            .iter()
            .enumerate()
            .map(|(i, (tag, t))| comp(tag, *t, 0.0, 100.0 * i as f64))
            .collect();
        let segs = (1..specs.len())
            .map(|i| seg(0.0, 100.0 * (i - 1) as f64, 0.0, 100.0 * i as f64))
            .collect();
        Drawing::new("chain", comps, segs)
    }

    #[test]
    fn test_collinear_valves() {
        let drawing = Drawing::new(
            "a",
            vec![
                comp("V1", ComponentType::Gate, 0.0, 100.0),
                comp("V2", ComponentType::Check, 0.0, 50.0),
                comp("V3", ComponentType::Ball, 0.0, 0.0),
            ],
            vec![seg(0.0, 0.0, 0.0, 100.0)],
        );
        let result = analyze(&drawing, "V2", &AnalysisConfig::default()).unwrap();
        assert_eq!(result.target_type, ComponentType::Check);
        assert_eq!(result.upstream.len(), 1);
        assert_eq!(result.upstream[0].tag, "V1");
        assert_eq!(result.upstream[0].depth, 1);
        assert_eq!(result.upstream[0].path, vec!["V2", "V1"]);
        assert_eq!(result.downstream.len(), 1);
        assert_eq!(result.downstream[0].tag, "V3");
        assert_eq!(result.downstream[0].depth, 1);
    }

    #[test]
    fn test_target_not_found() {
        let drawing = chain(&[("VG-1", ComponentType::Gate), ("VG-2", ComponentType::Gate)]);
        let err = analyze(&drawing, "VC-9999", &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::ValveNotFound { ref tag } if tag == "VC-9999"));
    }

    #[test]
    fn test_target_query_is_normalized() {
        let drawing = chain(&[("VC-2", ComponentType::Check), ("VG-1", ComponentType::Gate)]);
        let config = AnalysisConfig::default();
        for query in [" vc-2 ", "vc 2", "VC2"] {
            let result = analyze(&drawing, query, &config).unwrap();
            assert_eq!(result.target, "VC-2");
            assert_eq!(result.upstream[0].tag, "VG-1");
        }
    }

    #[test]
    fn test_depth_bound() {
        // Target at the bottom, five gates stacked above it.
        let drawing = chain(&[
            ("VC-0", ComponentType::Check),
            ("VG-1", ComponentType::Gate),
            ("VG-2", ComponentType::Gate),
            ("VG-3", ComponentType::Gate),
            ("VG-4", ComponentType::Gate),
            ("VG-5", ComponentType::Gate),
        ]);
        let config = AnalysisConfig::default();
        let result = analyze(&drawing, "VC-0", &config).unwrap();
        assert_eq!(result.all_connected, vec!["VG-1", "VG-2", "VG-3"]);
        assert!(result.candidates().all(|c| c.depth <= config.max_search_depth));
        let tags: Vec<_> = result.upstream.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["VG-1", "VG-2"]);
    }

    #[test]
    fn test_zero_depth_finds_nothing() {
        let drawing = chain(&[("VC-0", ComponentType::Check), ("VG-1", ComponentType::Gate)]);
        let config = AnalysisConfig::new(30.0, 0);
        let result = analyze(&drawing, "VC-0", &config).unwrap();
        assert!(result.upstream.is_empty());
        assert!(result.all_connected.is_empty());
    }

    #[test]
    fn test_traverses_through_non_isolating() {
        let drawing = chain(&[
            ("VC-0", ComponentType::Check),
            ("PI-1", ComponentType::Instrument),
            ("FCV-2", ComponentType::ControlFlow),
            ("VG-3", ComponentType::Gate),
        ]);
        let result = analyze(&drawing, "VC-0", &AnalysisConfig::default()).unwrap();
        assert_eq!(result.upstream.len(), 1);
        assert_eq!(result.upstream[0].tag, "VG-3");
        assert_eq!(result.upstream[0].depth, 3);
        assert_eq!(result.upstream[0].path, vec!["VC-0", "PI-1", "FCV-2", "VG-3"]);
    }

    #[test]
    fn test_truncates_to_two_per_direction() {
        let mut comps = vec![comp("VC-0", ComponentType::Check, 0.0, 0.0)];
        for i in 1..=4 {
            comps.push(comp(&format!("VG-{}", i), ComponentType::Gate, 10.0 * i as f64, 5.0));
            comps.push(comp(&format!("VB-{}", i), ComponentType::Ball, 10.0 * i as f64, -5.0));
        }
        let drawing = Drawing::new("t", comps, vec![seg(0.0, 0.0, 50.0, 0.0)]);
        let result = analyze(&drawing, "VC-0", &AnalysisConfig::default()).unwrap();
        assert_eq!(result.upstream.len(), 2);
        assert_eq!(result.downstream.len(), 2);
        assert_eq!(result.all_connected.len(), 8);
    }

    #[test]
    fn test_cycle_terminates() {
        // Square loop: four gates on the corners of a closed rectangle.
        let drawing = Drawing::new(
            "loop",
            vec![
                comp("VC-0", ComponentType::Check, 0.0, 0.0),
                comp("VG-1", ComponentType::Gate, 100.0, 0.0),
                comp("VG-2", ComponentType::Gate, 100.0, 100.0),
                comp("VG-3", ComponentType::Gate, 0.0, 100.0),
            ],
            vec![
                seg(0.0, 0.0, 100.0, 0.0),
                seg(100.0, 0.0, 100.0, 100.0),
                seg(100.0, 100.0, 0.0, 100.0),
                seg(0.0, 100.0, 0.0, 0.0),
            ],
        );
        let result = analyze(&drawing, "VC-0", &AnalysisConfig::default()).unwrap();
        assert_eq!(result.all_connected.len(), 3);
        let upstream: Vec<_> = result.upstream.iter().map(|c| (c.tag.as_str(), c.depth)).collect();
        assert_eq!(upstream, vec![("VG-3", 1), ("VG-2", 2)]);
        assert_eq!(result.downstream[0].tag, "VG-1");
    }

    #[test]
    fn test_isolated_target() {
        let drawing = Drawing::new(
            "lonely",
            vec![
                comp("VC-0", ComponentType::Check, 500.0, 500.0),
                comp("VG-1", ComponentType::Gate, 0.0, 0.0),
            ],
            vec![seg(0.0, 0.0, 10.0, 0.0)],
        );
        let result = analyze(&drawing, "VC-0", &AnalysisConfig::default()).unwrap();
        assert!(result.upstream.is_empty());
        assert!(result.downstream.is_empty());
        assert!(result.all_connected.is_empty());
    }

    struct LeftToRight;

    impl FlowDirectionPolicy for LeftToRight {
        fn direction(&self, target: &Component, neighbor: &Component) -> FlowDirection {
            if neighbor.position.x < target.position.x {
                FlowDirection::Upstream
            } else {
                FlowDirection::Downstream
            }
        }
    }

    #[test]
    fn test_custom_direction_policy() {
        let drawing = Drawing::new(
            "h",
            vec![
                comp("VG-1", ComponentType::Gate, 0.0, 0.0),
                comp("VC-2", ComponentType::Check, 50.0, 0.0),
                comp("VG-3", ComponentType::Gate, 100.0, 0.0),
            ],
            vec![seg(0.0, 0.0, 100.0, 0.0)],
        );
        let config = AnalysisConfig::default();
        let graph = build_proximity_graph(&drawing.components, &drawing.segments, 30.0);
        let result =
            find_isolation_valves_with_policy("VC-2", &drawing, &graph, &config, &LeftToRight)
                .unwrap();
        assert_eq!(result.upstream[0].tag, "VG-1");
        assert_eq!(result.downstream[0].tag, "VG-3");

        // Same y everywhere: the vertical heuristic puts both downstream.
        let result = find_isolation_valves("VC-2", &drawing, &graph, &config).unwrap();
        assert!(result.upstream.is_empty());
        assert_eq!(result.downstream.len(), 2);
    }
}
