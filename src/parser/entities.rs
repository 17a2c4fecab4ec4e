//! Entity-specific readers for DXF group data.

use crate::model::{Point, RawComponent, RawSegment};
use tracing::warn;

/// Polyline closed flag (group 70, bit 1).
const POLYLINE_CLOSED: i32 = 1;

/// One DXF entity: its type name and the group pairs that follow it.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    /// Entity type (`LINE`, `TEXT`, ...).
    pub kind: String,
    /// Group code / value pairs, in file order.
    pub groups: Vec<(i32, String)>,
    /// 1-based line of the entity's `0` group.
    pub line: usize,
}

impl Entity {
    /// First string value for a group code.
    pub fn string(&self, code: i32) -> Option<&str> {
        self.groups
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, v)| v.as_str())
    }

    /// First float value for a group code.
    pub fn float(&self, code: i32) -> Option<f64> {
        let value = self.string(code)?;
        match value.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(
                    "{} at line {}: invalid number '{}' for group {}",
                    self.kind, self.line, value, code
                );
                None
            }
        }
    }

    /// First integer value for a group code.
    pub fn int(&self, code: i32) -> Option<i32> {
        self.string(code)?.trim().parse().ok()
    }

    /// Layer name (group 8), `"0"` when absent.
    pub fn layer(&self) -> String {
        self.string(8).unwrap_or("0").trim().to_string()
    }

    /// Point from a pair of X/Y group codes.
    pub fn point(&self, x_code: i32, y_code: i32) -> Option<Point> {
        Some(Point::new(self.float(x_code)?, self.float(y_code)?))
    }

    /// Check if the polyline closed flag is set.
    pub fn is_closed(&self) -> bool {
        self.int(70)
            .map(|flags| flags & POLYLINE_CLOSED != 0)
            .unwrap_or(false)
    }
}

/// LINE: start (10/20) to end (11/21).
pub fn parse_line(entity: &Entity) -> RawSegment {
    RawSegment {
        start: entity.point(10, 20),
        end: entity.point(11, 21),
        layer: entity.layer(),
    }
}

/// TEXT: single-line text (1) at the insertion point (10/20).
pub fn parse_text(entity: &Entity) -> RawComponent {
    let insert = entity.point(10, 20);
    RawComponent {
        tag: entity.string(1).map(str::to_string),
        x: insert.map(|p| p.x),
        y: insert.map(|p| p.y),
    }
}

/// MTEXT: text split across any number of 3 groups followed by a final 1.
///
/// Formatting codes are left in place; tag normalization strips them.
pub fn parse_mtext(entity: &Entity) -> RawComponent {
    let mut text = String::new();
    let mut found = false;
    for (code, value) in &entity.groups {
        if *code == 3 || *code == 1 {
            text.push_str(value);
            found = true;
        }
    }
    let insert = entity.point(10, 20);
    RawComponent {
        tag: found.then_some(text),
        x: insert.map(|p| p.x),
        y: insert.map(|p| p.y),
    }
}

/// LWPOLYLINE vertices: each 10 group opens a vertex, the following 20
/// group completes it. Incomplete vertices are dropped.
pub fn lwpolyline_vertices(entity: &Entity) -> Vec<Point> {
    let mut vertices = Vec::new();
    let mut pending_x: Option<f64> = None;

    for (code, value) in &entity.groups {
        match code {
            10 => {
                if pending_x.is_some() {
                    warn!("LWPOLYLINE at line {}: vertex without Y dropped", entity.line);
                }
                pending_x = value.trim().parse().ok();
            }
            20 => match (pending_x.take(), value.trim().parse::<f64>().ok()) {
                (Some(x), Some(y)) => vertices.push(Point::new(x, y)),
                _ => warn!("LWPOLYLINE at line {}: malformed vertex dropped", entity.line),
            },
            _ => {}
        }
    }

    vertices
}

/// Flatten a vertex list into consecutive segments.
pub fn polyline_segments(vertices: &[Point], closed: bool, layer: &str) -> Vec<RawSegment> {
    let mut segments: Vec<RawSegment> = vertices
        .windows(2)
        .map(|w| RawSegment::new(w[0], w[1], layer))
        .collect();

    if closed && vertices.len() > 2 {
        if let (Some(&first), Some(&last)) = (vertices.first(), vertices.last()) {
            segments.push(RawSegment::new(last, first, layer));
        }
    }

    segments
}
