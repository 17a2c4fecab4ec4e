//! ASCII DXF reader for line geometry and tag text.

use crate::error::{AnalysisError, Result};
use crate::model::{Point, RawDrawing};
use tracing::{debug, warn};

use super::entities::*;

/// DXF parser over group code / value pairs.
pub struct DxfParser {
    /// (group code, value, 1-based line of the code).
    pairs: Vec<(i32, String, usize)>,
}

/// POLYLINE header waiting for its VERTEX entities.
struct OpenPolyline {
    layer: String,
    closed: bool,
    vertices: Vec<Point>,
}

impl DxfParser {
    /// Split file content into group pairs.
    ///
    /// Fails on a non-numeric group code or a code without a value line.
    pub fn new(content: &str) -> Result<Self> {
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() % 2 != 0 && !lines[lines.len() - 1].trim().is_empty() {
            return Err(AnalysisError::ParseError {
                line: lines.len(),
                message: "group code without value".to_string(),
            });
        }

        let mut pairs = Vec::with_capacity(lines.len() / 2);
        for (i, chunk) in lines.chunks_exact(2).enumerate() {
            let line = i * 2 + 1;
            let code = chunk[0]
                .trim()
                .parse::<i32>()
                .map_err(|_| AnalysisError::ParseError {
                    line,
                    message: format!("invalid group code '{}'", chunk[0].trim()),
                })?;
            pairs.push((code, chunk[1].trim_end_matches('\r').to_string(), line));
        }

        Ok(Self { pairs })
    }

    /// Entities of the ENTITIES section, in file order.
    pub fn entities(&self) -> Vec<Entity> {
        let Some(start) = self.entities_section_start() else {
            warn!("No ENTITIES section found");
            return Vec::new();
        };

        let mut entities: Vec<Entity> = Vec::new();
        for (code, value, line) in &self.pairs[start..] {
            if *code == 0 {
                let kind = value.trim();
                if kind == "ENDSEC" || kind == "EOF" {
                    break;
                }
                entities.push(Entity {
                    kind: kind.to_string(),
                    groups: Vec::new(),
                    line: *line,
                });
            } else if let Some(entity) = entities.last_mut() {
                entity.groups.push((*code, value.clone()));
            }
        }

        entities
    }

    /// Index of the first pair after `0 SECTION / 2 ENTITIES`.
    fn entities_section_start(&self) -> Option<usize> {
        self.pairs
            .windows(2)
            .position(|w| {
                w[0].0 == 0
                    && w[0].1.trim() == "SECTION"
                    && w[1].0 == 2
                    && w[1].1.trim() == "ENTITIES"
            })
            .map(|i| i + 2)
    }

    /// Read text and line geometry into a raw drawing.
    pub fn parse(&self) -> RawDrawing {
        let mut drawing = RawDrawing::default();
        let mut polyline: Option<OpenPolyline> = None;
        let mut ignored = 0usize;

        for entity in self.entities() {
            match entity.kind.as_str() {
                "LINE" => drawing.segments.push(parse_line(&entity)),
                "LWPOLYLINE" => {
                    let vertices = lwpolyline_vertices(&entity);
                    drawing.segments.extend(polyline_segments(
                        &vertices,
                        entity.is_closed(),
                        &entity.layer(),
                    ));
                }
                "POLYLINE" => {
                    polyline = Some(OpenPolyline {
                        layer: entity.layer(),
                        closed: entity.is_closed(),
                        vertices: Vec::new(),
                    });
                }
                "VERTEX" => match (polyline.as_mut(), entity.point(10, 20)) {
                    (Some(open), Some(point)) => open.vertices.push(point),
                    (Some(_), None) => {
                        warn!("VERTEX at line {}: missing coordinates", entity.line)
                    }
                    (None, _) => warn!("VERTEX at line {} outside POLYLINE", entity.line),
                },
                "SEQEND" => {
                    if let Some(open) = polyline.take() {
                        drawing.segments.extend(polyline_segments(
                            &open.vertices,
                            open.closed,
                            &open.layer,
                        ));
                    }
                }
                "TEXT" => drawing.components.push(parse_text(&entity)),
                "MTEXT" => drawing.components.push(parse_mtext(&entity)),
                _ => ignored += 1,
            }
        }

        if let Some(open) = polyline {
            warn!("POLYLINE without SEQEND; flushing {} vertices", open.vertices.len());
            drawing
                .segments
                .extend(polyline_segments(&open.vertices, open.closed, &open.layer));
        }

        debug!(
            "DXF: {} text entities, {} segments, {} other entities ignored",
            drawing.components.len(),
            drawing.segments.len(),
            ignored
        );

        drawing
    }
}
