//! Unit 8: remove paths entirely outside the visible canvas.

use crate::dom::{Document, NodeId};
use crate::extract::parse_view_box;
use crate::path::{approximate_bbox, parse_path_data};

use super::pass::Pass;

/// Delete `<path>` elements whose geometry lies wholly outside the root
/// `viewBox`.
///
/// Does nothing without a parsable `viewBox`. Paths carrying a `transform`
/// are kept — the transform may move them back on canvas — as are paths
/// whose bounding box touches the canvas edge.
#[derive(Default)]
pub struct RemoveOffCanvasPaths {
    canvas: Option<(f64, f64, f64, f64)>,
}

impl Pass for RemoveOffCanvasPaths {
    fn name(&self) -> &'static str {
        "remove_off_canvas_paths"
    }

    fn enter_root(&mut self, doc: &mut Document) {
        self.canvas = doc.svg_root().and_then(|svg| {
            let view_box = doc.attr(svg, "viewBox")?;
            parse_view_box(view_box)
        });
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        let Some((min_x, min_y, width, height)) = self.canvas else {
            return;
        };
        if doc.element_name(node) != Some("path") || doc.has_attr(node, "transform") {
            return;
        }
        let Some(d) = doc.attr(node, "d") else {
            return;
        };
        let Some((left, top, right, bottom)) = approximate_bbox(&parse_path_data(d)) else {
            return;
        };

        let off_canvas = right < min_x
            || left > min_x + width
            || bottom < min_y
            || top > min_y + height;
        if off_canvas {
            doc.detach(node);
        }
    }
}
