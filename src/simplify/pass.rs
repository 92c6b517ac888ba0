//! The transform-unit contract and the traversal driver.

use crate::dom::{Document, NodeId};

/// A named, composable tree-rewrite unit.
///
/// One pass of the pipeline drives every unit over the whole tree in
/// depth-first order: `enter_root`, then `enter_element`/`exit_element`
/// around each element's children, then `exit_root`. Units mutate the tree
/// in place; any per-run state a unit keeps must be reset in `enter_root`,
/// since the scheduler reuses unit instances across iterations.
///
/// Units are expected to touch only the nodes their documented contract
/// names and to leave everything else alone.
pub trait Pass {
    /// Unit name, used for diagnostics. Uniqueness is not enforced.
    fn name(&self) -> &'static str;

    fn enter_root(&mut self, _doc: &mut Document) {}

    fn exit_root(&mut self, _doc: &mut Document) {}

    fn enter_element(&mut self, _doc: &mut Document, _node: NodeId) {}

    fn exit_element(&mut self, _doc: &mut Document, _node: NodeId) {}
}

/// Drive a single unit over the whole tree once.
///
/// Child lists are snapshotted before descending, so a unit may detach the
/// current node, later siblings, or splice grandchildren upward without
/// corrupting the walk. A node detached by its own `enter_element` gets
/// neither child visits nor `exit_element`. Nodes attached during the walk
/// are picked up on the next scheduler iteration, not this one.
pub fn run_unit(doc: &mut Document, unit: &mut dyn Pass) {
    unit.enter_root(doc);
    for id in doc.child_ids(doc.root()) {
        visit(doc, unit, doc.root(), id);
    }
    unit.exit_root(doc);
}

fn visit(doc: &mut Document, unit: &mut dyn Pass, parent: NodeId, id: NodeId) {
    if !doc.is_element(id) {
        return;
    }

    unit.enter_element(doc, id);
    if doc.parent(id) != parent {
        return;
    }

    for child in doc.child_ids(id) {
        // A previously visited sibling may have consumed this one.
        if doc.parent(child) == id {
            visit(doc, unit, id, child);
        }
    }

    unit.exit_element(doc, id);
}
