//! Conversion from drawing coordinates to image percentages for the viewer.

use crate::model::{Category, ComponentType, Drawing, Point};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the raster render relates to the drawing's axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageOrientation {
    /// Same axes as the drawing; image Y grows downward.
    #[default]
    Upright,
    /// Render turned a quarter: drawing Y runs along image X and drawing X
    /// runs along image Y, reversed.
    QuarterTurn,
}

impl FromStr for ImageOrientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "upright" => Ok(ImageOrientation::Upright),
            "quarter_turn" | "rotated" => Ok(ImageOrientation::QuarterTurn),
            other => Err(format!("unknown orientation '{}'", other)),
        }
    }
}

/// Axis-aligned extent of everything drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl DrawingBounds {
    /// Bounds over segment endpoints and component positions.
    /// Returns `None` for an empty drawing.
    pub fn from_drawing(drawing: &Drawing) -> Option<Self> {
        let points = drawing
            .segments
            .iter()
            .flat_map(|s| [s.start, s.end])
            .chain(drawing.components.iter().map(|c| c.position));
        Self::from_points(points)
    }

    /// Bounds over a set of points.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    min_x: p.x,
                    max_x: p.x,
                    min_y: p.y,
                    max_y: p.y,
                },
                Some(b) => Self {
                    min_x: b.min_x.min(p.x),
                    max_x: b.max_x.max(p.x),
                    min_y: b.min_y.min(p.y),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Position within the bounds as fractions in `[0, 1]`.
    /// A zero-extent axis maps to 0.
    fn normalize(&self, point: Point) -> (f64, f64) {
        let nx = if self.width() > 0.0 {
            (point.x - self.min_x) / self.width()
        } else {
            0.0
        };
        let ny = if self.height() > 0.0 {
            (point.y - self.min_y) / self.height()
        } else {
            0.0
        };
        (nx, ny)
    }
}

/// Position on the raster render, in percent of its width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePosition {
    pub x_percent: f64,
    pub y_percent: f64,
}

/// Original CAD coordinates carried alongside the image position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CadPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One tag marker for the drawing viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerMarker {
    pub tag: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub category: Category,
    pub drawing: String,
    pub position: ImagePosition,
    pub cad_position: CadPosition,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a drawing point to image percentages, rounded to 2 decimals.
pub fn to_image_percent(
    point: Point,
    bounds: &DrawingBounds,
    orientation: ImageOrientation,
) -> ImagePosition {
    let (nx, ny) = bounds.normalize(point);
    let (x, y) = match orientation {
        ImageOrientation::Upright => (nx, 1.0 - ny),
        ImageOrientation::QuarterTurn => (ny, 1.0 - nx),
    };
    ImagePosition {
        x_percent: round2(x * 100.0),
        y_percent: round2(y * 100.0),
    }
}

/// Viewer markers for every component of a drawing.
pub fn viewer_markers(drawing: &Drawing, orientation: ImageOrientation) -> Vec<ViewerMarker> {
    let Some(bounds) = DrawingBounds::from_drawing(drawing) else {
        return Vec::new();
    };

    drawing
        .components
        .iter()
        .map(|c| ViewerMarker {
            tag: c.tag.clone(),
            component_type: c.component_type,
            category: c.category(),
            drawing: drawing.name.clone(),
            position: to_image_percent(c.position, &bounds, orientation),
            cad_position: CadPosition {
                x: c.position.x,
                y: c.position.y,
                z: 0.0,
            },
        })
        .collect()
}
