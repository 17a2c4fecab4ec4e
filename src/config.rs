//! Configuration constants and settings for the analyzer.

use crate::model::ComponentType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Default distance (drawing units) under which a component touches a line.
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 30.0;

/// Default number of BFS hops explored from the target valve.
pub const DEFAULT_MAX_SEARCH_DEPTH: usize = 3;

/// Isolation candidates kept per flow direction.
pub const MAX_CANDIDATES_PER_DIRECTION: usize = 2;

/// Component types that can fully stop flow by default.
pub const DEFAULT_ISOLATION_TYPES: [ComponentType; 4] = [
    ComponentType::Gate,
    ComponentType::Ball,
    ComponentType::Shutoff,
    ComponentType::Hand,
];

/// Analysis configuration, passed explicitly into each operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum point-to-segment distance (exclusive) for a component to
    /// count as sitting on a line.
    pub proximity_threshold: f64,
    /// Maximum BFS depth; candidates deeper than this are never surfaced.
    pub max_search_depth: usize,
    /// Component types treated as isolation-capable.
    pub isolation_types: BTreeSet<ComponentType>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            max_search_depth: DEFAULT_MAX_SEARCH_DEPTH,
            isolation_types: DEFAULT_ISOLATION_TYPES.into_iter().collect(),
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with the given threshold and depth.
    pub fn new(proximity_threshold: f64, max_search_depth: usize) -> Self {
        Self {
            proximity_threshold,
            max_search_depth,
            ..Default::default()
        }
    }

    /// Replace the isolation-capable type set.
    pub fn with_isolation_types(mut self, types: impl IntoIterator<Item = ComponentType>) -> Self {
        self.isolation_types = types.into_iter().collect();
        self
    }

    /// Check if a component type is isolation-capable under this config.
    pub fn can_isolate(&self, component_type: ComponentType) -> bool {
        self.isolation_types.contains(&component_type)
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.proximity_threshold, 30.0);
        assert_eq!(config.max_search_depth, 3);
        assert!(config.can_isolate(ComponentType::Gate));
        assert!(config.can_isolate(ComponentType::Hand));
        assert!(!config.can_isolate(ComponentType::Check));
        assert!(!config.can_isolate(ComponentType::Line));
    }

    #[test]
    fn test_custom_isolation_types() {
        let config = AnalysisConfig::new(10.0, 1).with_isolation_types([ComponentType::Check]);
        assert!(config.can_isolate(ComponentType::Check));
        assert!(!config.can_isolate(ComponentType::Gate));
        assert_eq!(config.max_search_depth, 1);
    }

    #[test]
    fn test_float_cmp() {
        assert!(float_cmp::approx_eq(1.0, 1.00001));
        assert!(!float_cmp::approx_eq(1.0, 1.01));
        assert!(float_cmp::approx_zero(0.00001));
    }
}
