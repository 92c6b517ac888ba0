//! Unit 7: convert basic shapes to `<path>` elements.

use crate::dom::{Document, NodeId};
use crate::path::{Command, Segment, write_path_data};

use super::pass::Pass;

/// Rewrite `rect`, `line`, `polyline`, `polygon` and (with arc conversion
/// on) `circle`/`ellipse` into equivalent `<path>` elements in place.
///
/// The element keeps its identity and remaining attributes; only the tag
/// name changes and the shape attributes collapse into `d`. Rounded rects
/// and shapes with unparsable geometry are left alone.
pub struct ConvertShapeToPath {
    pub convert_arcs: bool,
    pub precision: u32,
}

impl Default for ConvertShapeToPath {
    fn default() -> Self {
        Self {
            convert_arcs: true,
            precision: 3,
        }
    }
}

impl Pass for ConvertShapeToPath {
    fn name(&self) -> &'static str {
        "convert_shape_to_path"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        let segments = match doc.element_name(node) {
            Some("rect") => convert_rect(doc, node),
            Some("line") => convert_line(doc, node),
            Some("polyline") => convert_poly(doc, node, false),
            Some("polygon") => convert_poly(doc, node, true),
            Some("circle") if self.convert_arcs => convert_ellipse(doc, node, true),
            Some("ellipse") if self.convert_arcs => convert_ellipse(doc, node, false),
            _ => None,
        };

        let Some((segments, consumed)) = segments else {
            return;
        };
        for attr in consumed {
            doc.remove_attr(node, attr);
        }
        doc.set_attr(node, "d", write_path_data(&segments, self.precision));
        doc.set_element_name(node, "path");
    }
}

type Converted = Option<(Vec<Segment>, &'static [&'static str])>;

fn number(doc: &Document, node: NodeId, name: &str) -> Option<f64> {
    doc.attr(node, name)?.trim().parse().ok()
}

fn number_or(doc: &Document, node: NodeId, name: &str, default: f64) -> Option<f64> {
    match doc.attr(node, name) {
        Some(value) => value.trim().parse().ok(),
        None => Some(default),
    }
}

fn absolute(command: Command, args: Vec<f64>) -> Segment {
    Segment::new(command, false, args)
}

fn convert_rect(doc: &Document, node: NodeId) -> Converted {
    if doc.has_attr(node, "rx") || doc.has_attr(node, "ry") {
        return None;
    }
    let x = number_or(doc, node, "x", 0.0)?;
    let y = number_or(doc, node, "y", 0.0)?;
    let width = number(doc, node, "width")?;
    let height = number(doc, node, "height")?;

    let segments = vec![
        absolute(Command::Move, vec![x, y]),
        absolute(Command::Horizontal, vec![x + width]),
        absolute(Command::Vertical, vec![y + height]),
        absolute(Command::Horizontal, vec![x]),
        absolute(Command::Close, vec![]),
    ];
    Some((segments, &["x", "y", "width", "height"]))
}

fn convert_line(doc: &Document, node: NodeId) -> Converted {
    let x1 = number_or(doc, node, "x1", 0.0)?;
    let y1 = number_or(doc, node, "y1", 0.0)?;
    let x2 = number_or(doc, node, "x2", 0.0)?;
    let y2 = number_or(doc, node, "y2", 0.0)?;

    let segments = vec![
        absolute(Command::Move, vec![x1, y1]),
        absolute(Command::Line, vec![x2, y2]),
    ];
    Some((segments, &["x1", "y1", "x2", "y2"]))
}

fn convert_poly(doc: &Document, node: NodeId, close: bool) -> Converted {
    let points = doc.attr(node, "points")?;
    let numbers: Vec<f64> = points
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map_while(|s| s.parse().ok())
        .collect();
    // An odd trailing coordinate is dropped with the pair it never formed.
    let pairs: Vec<&[f64]> = numbers.chunks_exact(2).collect();
    if pairs.len() < 2 {
        return None;
    }

    let mut segments = vec![absolute(Command::Move, pairs[0].to_vec())];
    for pair in &pairs[1..] {
        segments.push(absolute(Command::Line, pair.to_vec()));
    }
    if close {
        segments.push(absolute(Command::Close, vec![]));
    }
    Some((segments, &["points"]))
}

fn convert_ellipse(doc: &Document, node: NodeId, is_circle: bool) -> Converted {
    let cx = number_or(doc, node, "cx", 0.0)?;
    let cy = number_or(doc, node, "cy", 0.0)?;
    let (rx, ry, consumed): (f64, f64, &'static [&'static str]) = if is_circle {
        let r = number(doc, node, "r")?;
        (r, r, &["cx", "cy", "r"])
    } else {
        let rx = number(doc, node, "rx")?;
        let ry = number(doc, node, "ry")?;
        (rx, ry, &["cx", "cy", "rx", "ry"])
    };
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }

    // Two half-turn arcs starting at the leftmost point.
    let segments = vec![
        absolute(Command::Move, vec![cx - rx, cy]),
        absolute(Command::Arc, vec![rx, ry, 0.0, 1.0, 0.0, cx + rx, cy]),
        absolute(Command::Arc, vec![rx, ry, 0.0, 1.0, 0.0, cx - rx, cy]),
        absolute(Command::Close, vec![]),
    ];
    Some((segments, consumed))
}
