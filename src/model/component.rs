//! Valves, instruments and equipment located on a drawing.

use crate::classify::{classify_tag, normalize_tag, tag_prefix};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Point;

/// Kind of component, derived from the tag prefix.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Gate,
    Check,
    Ball,
    /// Line valve, also used as drain/vent.
    Line,
    ControlFlow,
    ControlLevel,
    ControlTemp,
    ControlPressure,
    /// Pressure safety / relief valve.
    Safety,
    Hand,
    Shutoff,
    Instrument,
    Equipment,
    #[default]
    Unknown,
}

impl ComponentType {
    /// All known types, in declaration order.
    pub const ALL: [ComponentType; 14] = [
        ComponentType::Gate,
        ComponentType::Check,
        ComponentType::Ball,
        ComponentType::Line,
        ComponentType::ControlFlow,
        ComponentType::ControlLevel,
        ComponentType::ControlTemp,
        ComponentType::ControlPressure,
        ComponentType::Safety,
        ComponentType::Hand,
        ComponentType::Shutoff,
        ComponentType::Instrument,
        ComponentType::Equipment,
        ComponentType::Unknown,
    ];

    /// Snake-case name used in reports and procedure text.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Gate => "gate",
            ComponentType::Check => "check",
            ComponentType::Ball => "ball",
            ComponentType::Line => "line",
            ComponentType::ControlFlow => "control_flow",
            ComponentType::ControlLevel => "control_level",
            ComponentType::ControlTemp => "control_temp",
            ComponentType::ControlPressure => "control_pressure",
            ComponentType::Safety => "safety",
            ComponentType::Hand => "hand",
            ComponentType::Shutoff => "shutoff",
            ComponentType::Instrument => "instrument",
            ComponentType::Equipment => "equipment",
            ComponentType::Unknown => "unknown",
        }
    }

    /// Check if this is any kind of valve.
    pub fn is_valve(&self) -> bool {
        !matches!(
            self,
            ComponentType::Instrument | ComponentType::Equipment | ComponentType::Unknown
        )
    }

    /// Check if this is an automatic control valve.
    pub fn is_control_valve(&self) -> bool {
        matches!(
            self,
            ComponentType::ControlFlow
                | ComponentType::ControlLevel
                | ComponentType::ControlTemp
                | ComponentType::ControlPressure
        )
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        ComponentType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown component type '{}'", s))
    }
}

/// Display category used by the drawing viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Valve,
    #[serde(rename = "Safety Valve")]
    SafetyValve,
    #[serde(rename = "Control Valve")]
    ControlValve,
    Pressure,
    Temperature,
    Flow,
    Level,
    Analysis,
    Position,
    Vibration,
    Speed,
    Electrical,
    #[serde(rename = "Hand/Manual")]
    HandManual,
    Pump,
    Tank,
    #[serde(rename = "Heat Exchanger")]
    HeatExchanger,
    Motor,
    Blower,
    Compressor,
    Fan,
    Equipment,
    Other,
}

impl Category {
    /// Derive the viewer category from a classified tag.
    pub fn for_component(tag: &str, component_type: ComponentType) -> Self {
        match component_type {
            ComponentType::Safety => Category::SafetyValve,
            t if t.is_control_valve() => Category::ControlValve,
            ComponentType::Hand => Category::HandManual,
            ComponentType::Instrument => Self::for_instrument_prefix(tag_prefix(tag)),
            ComponentType::Equipment => Self::for_equipment_prefix(tag_prefix(tag)),
            ComponentType::Unknown => Category::Other,
            _ => Category::Valve,
        }
    }

    fn for_instrument_prefix(prefix: &str) -> Self {
        if matches!(prefix, "II" | "IT" | "JI" | "JT" | "WI" | "WT") {
            return Category::Electrical;
        }
        match prefix.chars().next() {
            Some('T') => Category::Temperature,
            Some('P') => Category::Pressure,
            Some('F') => Category::Flow,
            Some('L') => Category::Level,
            Some('A') => Category::Analysis,
            Some('Z') => Category::Position,
            Some('V') => Category::Vibration,
            Some('S') => Category::Speed,
            Some('H') => Category::HandManual,
            _ => Category::Other,
        }
    }

    fn for_equipment_prefix(prefix: &str) -> Self {
        match prefix {
            "PP" => Category::Pump,
            "TK" => Category::Tank,
            "HE" => Category::HeatExchanger,
            "M" => Category::Motor,
            "B" => Category::Blower,
            "C" => Category::Compressor,
            "FN" => Category::Fan,
            _ => Category::Equipment,
        }
    }
}

/// A classified tag placed on the drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Canonical tag (upper-case, no whitespace).
    pub tag: String,
    /// Type derived from the tag prefix.
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Text insertion point.
    #[serde(flatten)]
    pub position: Point,
    /// Whether this component may close off flow for isolation.
    pub can_isolate: bool,
}

impl Component {
    /// Create a component from an already-classified tag.
    ///
    /// The tag is normalized; an empty tag or a non-finite position is
    /// rejected.
    pub fn try_new(
        tag: &str,
        component_type: ComponentType,
        position: Point,
        can_isolate: bool,
    ) -> Result<Self> {
        let normalized = normalize_tag(tag);
        if normalized.is_empty() {
            return Err(AnalysisError::InvalidTag {
                raw: tag.to_string(),
            });
        }
        let position = Point::try_new(position.x, position.y)?;
        Ok(Self {
            tag: normalized,
            component_type,
            position,
            can_isolate,
        })
    }

    /// Classify raw drawing text into a component.
    ///
    /// Returns `Ok(None)` for text that is not a recognized tag.
    pub fn from_text(text: &str, position: Point, config: &AnalysisConfig) -> Result<Option<Self>> {
        let normalized = normalize_tag(text);
        let component_type = classify_tag(&normalized);
        if component_type == ComponentType::Unknown {
            return Ok(None);
        }
        Self::try_new(
            &normalized,
            component_type,
            position,
            config.can_isolate(component_type),
        )
        .map(Some)
    }

    /// Viewer category for this component.
    pub fn category(&self) -> Category {
        Category::for_component(&self.tag, self.component_type)
    }
}
