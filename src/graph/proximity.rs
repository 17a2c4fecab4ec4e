//! Valve adjacency inferred from proximity to shared line segments.

use crate::model::{Component, Segment};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Undirected, unweighted adjacency between component tags.
///
/// Two components are adjacent when at least one segment lies within the
/// proximity threshold of both. Ordering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProximityGraph {
    /// Tag -> adjacent tags. Only tags with at least one neighbor appear.
    connections: BTreeMap<String, BTreeSet<String>>,
    /// Tag -> indices of segments within threshold.
    #[serde(skip)]
    incident: BTreeMap<String, BTreeSet<usize>>,
}

impl ProximityGraph {
    /// Neighbors of a tag, in sorted order. Unknown tags have none.
    pub fn neighbors<'a>(&'a self, tag: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.connections
            .get(tag)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Check if `a` and `b` are adjacent.
    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.connections
            .get(a)
            .map(|set| set.contains(b))
            .unwrap_or(false)
    }

    /// Segments incident to a tag.
    pub fn incident_segments(&self, tag: &str) -> Option<&BTreeSet<usize>> {
        self.incident.get(tag)
    }

    /// Full adjacency map.
    pub fn connections(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.connections
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.connections.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Check if the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    fn connect(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.connections
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.connections
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }
}

/// Build the proximity graph for one drawing.
///
/// A segment is incident to a component when the point-to-segment distance
/// is strictly less than `threshold`. Components sharing any incident
/// segment become neighbors.
pub fn build_proximity_graph(
    components: &[Component],
    segments: &[Segment],
    threshold: f64,
) -> ProximityGraph {
    let mut graph = ProximityGraph::default();
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); segments.len()];

    for (comp_idx, component) in components.iter().enumerate() {
        for (seg_idx, segment) in segments.iter().enumerate() {
            if segment.distance_to_point(component.position) < threshold {
                graph
                    .incident
                    .entry(component.tag.clone())
                    .or_default()
                    .insert(seg_idx);
                members[seg_idx].push(comp_idx);
            }
        }
    }

    for on_segment in members.iter().filter(|m| m.len() > 1) {
        for (i, &a) in on_segment.iter().enumerate() {
            for &b in &on_segment[i + 1..] {
                graph.connect(&components[a].tag, &components[b].tag);
            }
        }
    }

    debug!(
        "Proximity graph: {} components, {} segments, {} connected tags, {} edges",
        components.len(),
        segments.len(),
        graph.connections.len(),
        graph.edge_count()
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentType, Point};

    fn valve(tag: &str, x: f64, y: f64) -> Component {
        Component::try_new(tag, ComponentType::Gate, Point::new(x, y), true).unwrap()
    }

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::try_new(Point::new(x1, y1), Point::new(x2, y2), "PIPE").unwrap()
    }

    #[test]
    fn test_shared_segment_connects() {
        let comps = vec![valve("VG-1", 0.0, 0.0), valve("VG-2", 100.0, 5.0)];
        let segs = vec![seg(0.0, 0.0, 100.0, 0.0)];
        let graph = build_proximity_graph(&comps, &segs, 30.0);
        assert!(graph.contains_edge("VG-1", "VG-2"));
        assert!(graph.contains_edge("VG-2", "VG-1"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_parallel_lines_stay_separate() {
        let comps = vec![valve("VG-1", 0.0, 0.0), valve("VG-2", 50.0, 100.0)];
        let segs = vec![seg(-10.0, 0.0, 100.0, 0.0), seg(-10.0, 100.0, 100.0, 100.0)];
        let graph = build_proximity_graph(&comps, &segs, 30.0);
        assert!(graph.is_empty());
        assert_eq!(graph.incident_segments("VG-1").unwrap().len(), 1);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let comps = vec![valve("VG-1", 0.0, 30.0), valve("VG-2", 10.0, 0.0)];
        let segs = vec![seg(0.0, 0.0, 20.0, 0.0)];
        let graph = build_proximity_graph(&comps, &segs, 30.0);
        assert!(graph.incident_segments("VG-1").is_none());
        assert!(!graph.contains_edge("VG-1", "VG-2"));

        let graph = build_proximity_graph(&comps, &segs, 30.0001);
        assert!(graph.contains_edge("VG-1", "VG-2"));
    }

    #[test]
    fn test_no_self_loops_and_symmetry() {
        let comps = vec![
            valve("VG-1", 0.0, 0.0),
            valve("VG-2", 10.0, 0.0),
            valve("VG-3", 20.0, 0.0),
        ];
        let segs = vec![seg(0.0, 0.0, 20.0, 0.0), seg(0.0, 0.0, 10.0, 0.0)];
        let graph = build_proximity_graph(&comps, &segs, 5.0);
        for (tag, neighbors) in graph.connections() {
            assert!(!neighbors.contains(tag));
            for n in neighbors {
                assert!(graph.contains_edge(n, tag));
            }
        }
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_degenerate_segment_connects_by_point_distance() {
        let comps = vec![valve("VG-1", 0.0, 3.0), valve("VG-2", 4.0, 0.0)];
        let segs = vec![seg(0.0, 0.0, 0.0, 0.0)];
        let graph = build_proximity_graph(&comps, &segs, 5.0);
        assert!(graph.contains_edge("VG-1", "VG-2"));
    }

    #[test]
    fn test_empty_inputs() {
        let graph = build_proximity_graph(&[], &[], 30.0);
        assert!(graph.is_empty());
        assert_eq!(graph.neighbors("VG-1").count(), 0);

        let comps = vec![valve("VG-1", 0.0, 0.0)];
        let graph = build_proximity_graph(&comps, &[], 30.0);
        assert!(graph.is_empty());
    }
}
