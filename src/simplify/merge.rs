//! Unit 12: merge sibling `<path>` elements.

use crate::dom::{Attribute, Document, NodeId};
use crate::path::{approximate_bbox, parse_path_data};

use super::pass::Pass;

/// Merge runs of adjacent sibling `<path>`s into the first of the run.
///
/// Candidates must agree on every attribute except `d`, carry no `id`, and
/// start their data with a moveto so concatenation is lossless. In force
/// mode (the default pipeline's setting) overlap is ignored; otherwise two
/// paths whose bounding boxes intersect are left separate, since one fill
/// could knock a hole in the other.
pub struct MergePaths {
    pub force: bool,
}

impl Default for MergePaths {
    fn default() -> Self {
        Self { force: true }
    }
}

impl Pass for MergePaths {
    fn name(&self) -> &'static str {
        "merge_paths"
    }

    fn exit_element(&mut self, doc: &mut Document, node: NodeId) {
        let mut anchor: Option<NodeId> = None;

        for child in doc.child_ids(node) {
            if !is_mergeable(doc, child) {
                anchor = None;
                continue;
            }
            let Some(prev) = anchor else {
                anchor = Some(child);
                continue;
            };

            if same_attrs_except_d(doc, prev, child) && self.overlap_allowed(doc, prev, child) {
                let appended = doc.attr(child, "d").unwrap_or_default().to_string();
                let mut merged = doc.attr(prev, "d").unwrap_or_default().to_string();
                merged.push_str(&appended);
                doc.set_attr(prev, "d", merged);
                doc.detach(child);
            } else {
                anchor = Some(child);
            }
        }
    }
}

impl MergePaths {
    fn overlap_allowed(&self, doc: &Document, a: NodeId, b: NodeId) -> bool {
        if self.force {
            return true;
        }
        let bbox_a = doc.attr(a, "d").and_then(|d| approximate_bbox(&parse_path_data(d)));
        let bbox_b = doc.attr(b, "d").and_then(|d| approximate_bbox(&parse_path_data(d)));
        match (bbox_a, bbox_b) {
            (Some(a), Some(b)) => !boxes_intersect(a, b),
            _ => false,
        }
    }
}

fn is_mergeable(doc: &Document, id: NodeId) -> bool {
    doc.element_name(id) == Some("path")
        && !doc.has_attr(id, "id")
        && doc
            .attr(id, "d")
            .is_some_and(|d| d.trim_start().starts_with(['M', 'm']))
}

fn same_attrs_except_d(doc: &Document, a: NodeId, b: NodeId) -> bool {
    let filter = |id: NodeId| -> Vec<&Attribute> {
        let mut attrs: Vec<&Attribute> = doc.attrs(id).iter().filter(|a| a.name != "d").collect();
        attrs.sort_by(|x, y| x.name.cmp(&y.name));
        attrs
    };
    filter(a) == filter(b)
}

fn boxes_intersect(a: (f64, f64, f64, f64), b: (f64, f64, f64, f64)) -> bool {
    a.0 <= b.2 && b.0 <= a.2 && a.1 <= b.3 && b.1 <= a.3
}
