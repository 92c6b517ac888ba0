//! Group structure units: push group transforms down (unit 6) and collapse
//! redundant `<g>` wrappers (unit 14).

use crate::dom::{Document, NodeId};

use super::pass::Pass;

/// Attributes that pin a group in place: moving or collapsing across them
/// would change meaning or break references.
const GROUP_ANCHORS: &[&str] = &["id", "clip-path", "mask", "filter"];

fn has_anchor(doc: &Document, id: NodeId) -> bool {
    GROUP_ANCHORS.iter().any(|a| doc.has_attr(id, a))
}

/// Concatenate two `transform` attribute values, parent first.
fn prepend_transform(parent: &str, child: Option<&str>) -> String {
    match child {
        Some(child) => format!("{parent} {child}"),
        None => parent.to_string(),
    }
}

// ----------------------------------------------------------------------
// Unit 6: move_group_attrs_to_elems
// ----------------------------------------------------------------------

/// Move a group's `transform` down onto each element child.
///
/// Applies only when the group itself is unanchored, every child is an
/// element and no child carries an `id`. The parent transform lands in
/// front of any child transform so composition order is preserved.
#[derive(Default)]
pub struct MoveGroupAttrsToElems;

impl Pass for MoveGroupAttrsToElems {
    fn name(&self) -> &'static str {
        "move_group_attrs_to_elems"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        if doc.element_name(node) != Some("g") || !doc.has_attr(node, "transform") {
            return;
        }
        if has_anchor(doc, node) {
            return;
        }

        let children = doc.child_ids(node);
        if children.is_empty() {
            return;
        }
        let movable = children
            .iter()
            .all(|&c| doc.is_element(c) && !doc.has_attr(c, "id"));
        if !movable {
            return;
        }

        let Some(transform) = doc.remove_attr(node, "transform") else {
            return;
        };
        for child in children {
            let combined = prepend_transform(&transform, doc.attr(child, "transform"));
            doc.set_attr(child, "transform", combined);
        }
    }
}

// ----------------------------------------------------------------------
// Unit 14: collapse_groups
// ----------------------------------------------------------------------

/// Collapse redundant `<g>` wrappers, bottom-up.
///
/// A group with a single element child first tries to hoist its attributes
/// onto that child (transforms concatenate, equal values dedupe, values the
/// child lacks move). Any group left attribute-less is then spliced into
/// its parent; nested wrappers cascade because this runs on element exit.
#[derive(Default)]
pub struct CollapseGroups;

impl Pass for CollapseGroups {
    fn name(&self) -> &'static str {
        "collapse_groups"
    }

    fn exit_element(&mut self, doc: &mut Document, node: NodeId) {
        if doc.element_name(node) != Some("g") {
            return;
        }
        // Only collapse into a real element parent.
        if !doc.is_element(doc.parent(node)) {
            return;
        }

        hoist_onto_single_child(doc, node);

        if doc.attrs(node).is_empty() {
            doc.replace_with_children(node);
        }
    }
}

fn hoist_onto_single_child(doc: &mut Document, group: NodeId) {
    if doc.has_attr(group, "id") {
        return;
    }
    let children = doc.child_ids(group);
    let [child] = children[..] else { return };
    if !doc.is_element(child) || doc.has_attr(child, "id") {
        return;
    }

    let names: Vec<String> = doc.attrs(group).iter().map(|a| a.name.clone()).collect();
    for name in names {
        let Some(value) = doc.attr(group, &name).map(str::to_string) else {
            continue;
        };
        if name == "transform" {
            let combined = prepend_transform(&value, doc.attr(child, "transform"));
            doc.set_attr(child, "transform", combined);
            doc.remove_attr(group, &name);
        } else if !doc.has_attr(child, &name) {
            doc.set_attr(child, &name, value);
            doc.remove_attr(group, &name);
        } else if doc.attr(child, &name) == Some(value.as_str()) {
            doc.remove_attr(group, &name);
        }
        // Conflicting values stay on the group, which then stays.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_svg;
    use crate::simplify::pass::run_unit;

    #[test]
    fn test_move_group_transform_down() {
        let mut doc = parse_svg(
            r#"<svg><g transform="translate(5 5)"><path d="M0 0" transform="scale(2)"/><path d="M1 1"/></g></svg>"#,
        )
        .unwrap();
        run_unit(&mut doc, &mut MoveGroupAttrsToElems);

        let svg = doc.svg_root().unwrap();
        let g = doc.child_ids(svg)[0];
        assert!(!doc.has_attr(g, "transform"));
        let kids = doc.child_ids(g);
        assert_eq!(
            doc.attr(kids[0], "transform"),
            Some("translate(5 5) scale(2)")
        );
        assert_eq!(doc.attr(kids[1], "transform"), Some("translate(5 5)"));
    }

    #[test]
    fn test_move_group_transform_skips_anchored() {
        let mut doc = parse_svg(
            r#"<svg><g transform="scale(2)" clip-path="url(#c)"><path d="M0 0"/></g></svg>"#,
        )
        .unwrap();
        run_unit(&mut doc, &mut MoveGroupAttrsToElems);

        let svg = doc.svg_root().unwrap();
        let g = doc.child_ids(svg)[0];
        assert!(doc.has_attr(g, "transform"));
    }

    #[test]
    fn test_collapse_plain_group() {
        let mut doc =
            parse_svg(r#"<svg><g><path d="M0 0"/><path d="M1 1"/></g></svg>"#).unwrap();
        run_unit(&mut doc, &mut CollapseGroups);

        let svg = doc.svg_root().unwrap();
        let kids = doc.child_ids(svg);
        assert_eq!(kids.len(), 2);
        assert!(kids.iter().all(|&k| doc.element_name(k) == Some("path")));
    }

    #[test]
    fn test_collapse_hoists_attrs_onto_single_child() {
        let mut doc = parse_svg(
            r#"<svg><g stroke="red" transform="scale(2)"><path d="M0 0" transform="translate(1 1)"/></g></svg>"#,
        )
        .unwrap();
        run_unit(&mut doc, &mut CollapseGroups);

        let svg = doc.svg_root().unwrap();
        let kids = doc.child_ids(svg);
        assert_eq!(kids.len(), 1);
        assert_eq!(doc.element_name(kids[0]), Some("path"));
        assert_eq!(doc.attr(kids[0], "stroke"), Some("red"));
        assert_eq!(
            doc.attr(kids[0], "transform"),
            Some("scale(2) translate(1 1)")
        );
    }

    #[test]
    fn test_collapse_keeps_conflicting_group() {
        let mut doc = parse_svg(
            r#"<svg><g fill="red"><path fill="blue" d="M0 0"/></g></svg>"#,
        )
        .unwrap();
        run_unit(&mut doc, &mut CollapseGroups);

        let svg = doc.svg_root().unwrap();
        let kids = doc.child_ids(svg);
        assert_eq!(doc.element_name(kids[0]), Some("g"));
        assert_eq!(doc.attr(kids[0], "fill"), Some("red"));
    }

    #[test]
    fn test_collapse_cascades_nested_groups() {
        let mut doc = parse_svg(r#"<svg><g><g><path d="M0 0"/></g></g></svg>"#).unwrap();
        run_unit(&mut doc, &mut CollapseGroups);

        let svg = doc.svg_root().unwrap();
        let kids = doc.child_ids(svg);
        assert_eq!(kids.len(), 1);
        assert_eq!(doc.element_name(kids[0]), Some("path"));
    }
}
