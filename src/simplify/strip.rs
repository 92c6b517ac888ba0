//! The consumer-facing cleanup units: strip `fill` and `class` from paths
//! (units 9 and 10) and prune everything but groups and paths from the
//! root (unit 15).

use crate::dom::{Document, NodeId};

use super::pass::Pass;

/// Delete the `fill` attribute from every `<path>` so downstream renderers
/// can recolor icons freely.
#[derive(Default)]
pub struct RemoveFill;

impl Pass for RemoveFill {
    fn name(&self) -> &'static str {
        "remove_fill"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        if doc.element_name(node) == Some("path") {
            doc.remove_attr(node, "fill");
        }
    }
}

/// Delete the `class` attribute from every `<path>`; class names must not
/// leak into documents the icons get inlined into.
#[derive(Default)]
pub struct RemoveClass;

impl Pass for RemoveClass {
    fn name(&self) -> &'static str {
        "remove_class"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        if doc.element_name(node) == Some("path") {
            doc.remove_attr(node, "class");
        }
    }
}

/// Remove any element directly under the root `<svg>` that is neither a
/// `<g>` nor a `<path>`. Enforces the output-format contract; everything
/// else has had its chance to become a path by the time this runs.
#[derive(Default)]
pub struct RemoveIrrelevantElements;

impl Pass for RemoveIrrelevantElements {
    fn name(&self) -> &'static str {
        "remove_irrelevant_elements"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        let parent = doc.parent(node);
        if doc.element_name(parent) != Some("svg") {
            return;
        }
        if !matches!(doc.element_name(node), Some("g") | Some("path")) {
            doc.detach(node);
        }
    }
}
