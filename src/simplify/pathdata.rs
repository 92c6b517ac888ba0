//! Unit 13: compact and renormalize path data syntax.

use crate::dom::{Document, NodeId};
use crate::path::{parse_path_data, write_path_data};

use super::pass::Pass;

/// Reparse every `<path>`'s `d` attribute and re-emit it through the
/// compact writer: rounded coordinates, minimal separators, redundant
/// command letters dropped. A `d` that yields no segments is left as-is.
pub struct ConvertPathData {
    pub precision: u32,
}

impl Default for ConvertPathData {
    fn default() -> Self {
        Self { precision: 3 }
    }
}

impl Pass for ConvertPathData {
    fn name(&self) -> &'static str {
        "convert_path_data"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        if doc.element_name(node) != Some("path") {
            return;
        }
        let Some(d) = doc.attr(node, "d") else {
            return;
        };
        let segments = parse_path_data(d);
        if segments.is_empty() {
            return;
        }
        doc.set_attr(node, "d", write_path_data(&segments, self.precision));
    }
}
