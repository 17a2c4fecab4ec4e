//! One drawing's worth of classified components and line segments.

use crate::classify::tag_key;
use crate::config::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::{Component, ComponentType, Point, Segment};

/// Text entity as extracted from a drawing, before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComponent {
    /// Raw text (tag candidate).
    #[serde(alias = "text", default, deserialize_with = "lenient::string")]
    pub tag: Option<String>,
    /// Insertion point X.
    #[serde(default, deserialize_with = "lenient::number")]
    pub x: Option<f64>,
    /// Insertion point Y.
    #[serde(default, deserialize_with = "lenient::number")]
    pub y: Option<f64>,
}

impl RawComponent {
    /// Create a raw text entity at a known position.
    pub fn new(tag: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            tag: Some(tag.into()),
            x: Some(x),
            y: Some(y),
        }
    }
}

/// Line or polyline edge as extracted from a drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(default, deserialize_with = "lenient::point")]
    pub start: Option<Point>,
    #[serde(default, deserialize_with = "lenient::point")]
    pub end: Option<Point>,
    #[serde(default, deserialize_with = "lenient::layer")]
    pub layer: String,
}

impl RawSegment {
    /// Create a raw segment between two points.
    pub fn new(start: Point, end: Point, layer: impl Into<String>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            layer: layer.into(),
        }
    }
}

/// Unvalidated drawing content produced by a reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDrawing {
    /// Drawing identifier (usually the file name).
    #[serde(default)]
    pub name: Option<String>,
    /// Entries that are not objects become empty entities, skipped later.
    #[serde(default, deserialize_with = "lenient::entries")]
    pub components: Vec<RawComponent>,
    #[serde(default, deserialize_with = "lenient::entries")]
    pub segments: Vec<RawSegment>,
}

/// Field deserializers that turn a malformed value into "missing" so one bad
/// entity is skipped by [`Drawing::from_raw`] instead of failing the file.
mod lenient {
    use super::Point;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let values = Vec::<Value>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|value| serde_json::from_value(value).unwrap_or_default())
            .collect())
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(Value::deserialize(deserializer)?.as_str().map(str::to_string))
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(Value::deserialize(deserializer)?.as_f64())
    }

    pub fn point<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Point>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let x = value.get("x").and_then(Value::as_f64);
        let y = value.get("y").and_then(Value::as_f64);
        Ok(x.zip(y).map(|(x, y)| Point::new(x, y)))
    }

    pub fn layer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(string(deserializer)?.unwrap_or_default())
    }
}

/// Validated components and segments for a single drawing.
///
/// Tags are unique within a drawing only; never mix components from
/// different drawings in one `Drawing`.
#[derive(Debug, Clone, Default)]
pub struct Drawing {
    /// Drawing identifier.
    pub name: String,
    /// Classified components, in extraction order.
    pub components: Vec<Component>,
    /// Flattened line segments.
    pub segments: Vec<Segment>,
    /// Why individual entities were skipped during construction.
    pub skipped: Vec<String>,
    /// Tag -> index into `components`.
    index: HashMap<String, usize>,
}

impl Drawing {
    /// Build a drawing from already-validated parts.
    ///
    /// Components with a tag seen earlier are dropped.
    pub fn new(name: impl Into<String>, components: Vec<Component>, segments: Vec<Segment>) -> Self {
        let mut drawing = Self {
            name: name.into(),
            segments,
            ..Default::default()
        };
        for component in components {
            drawing.push_component(component);
        }
        drawing
    }

    /// Classify and validate raw content.
    ///
    /// Unrecognized text is dropped silently. Entities with a missing or
    /// non-finite position are skipped with a warning; processing of the
    /// rest of the drawing continues.
    pub fn from_raw(raw: &RawDrawing, config: &AnalysisConfig) -> Self {
        let mut drawing = Self {
            name: raw.name.clone().unwrap_or_default(),
            ..Default::default()
        };

        for (idx, raw_comp) in raw.components.iter().enumerate() {
            let (Some(text), Some(x), Some(y)) = (&raw_comp.tag, raw_comp.x, raw_comp.y) else {
                drawing.skip(format!("Text entity {}: missing text or position", idx + 1));
                continue;
            };
            match Component::from_text(text, Point::new(x, y), config) {
                Ok(Some(component)) => drawing.push_component(component),
                Ok(None) => {}
                Err(e) => drawing.skip(format!("Text entity {} ('{}'): {}", idx + 1, text, e)),
            }
        }

        for (idx, raw_seg) in raw.segments.iter().enumerate() {
            let (Some(start), Some(end)) = (raw_seg.start, raw_seg.end) else {
                drawing.skip(format!("Segment {}: missing endpoint", idx + 1));
                continue;
            };
            match Segment::try_new(start, end, raw_seg.layer.clone()) {
                Ok(segment) => drawing.segments.push(segment),
                Err(e) => drawing.skip(format!("Segment {}: {}", idx + 1, e)),
            }
        }

        debug!(
            "Drawing '{}': {} components, {} segments, {} skipped",
            drawing.name,
            drawing.components.len(),
            drawing.segments.len(),
            drawing.skipped.len()
        );

        drawing
    }

    fn skip(&mut self, message: String) {
        warn!("{}: skipped {}", self.name, message);
        self.skipped.push(message);
    }

    fn push_component(&mut self, component: Component) {
        if self.index.contains_key(&component.tag) {
            self.skip(format!("duplicate tag {}", component.tag));
            return;
        }
        self.index
            .insert(component.tag.clone(), self.components.len());
        self.components.push(component);
    }

    /// Look up a component by canonical tag.
    pub fn find(&self, tag: &str) -> Option<&Component> {
        self.index.get(tag).map(|&i| &self.components[i])
    }

    /// Resolve a user-supplied tag, ignoring case, whitespace and hyphens.
    pub fn resolve_tag(&self, query: &str) -> Option<&str> {
        let wanted = tag_key(query);
        if wanted.is_empty() {
            return None;
        }
        self.components
            .iter()
            .find(|c| tag_key(&c.tag) == wanted)
            .map(|c| c.tag.as_str())
    }

    /// Number of components per type.
    pub fn type_counts(&self) -> BTreeMap<ComponentType, usize> {
        let mut counts = BTreeMap::new();
        for component in &self.components {
            *counts.entry(component.component_type).or_insert(0) += 1;
        }
        counts
    }

    /// Check if the drawing has neither components nor segments.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.segments.is_empty()
    }
}
