//! Arena-based document tree for SVG processing.
//!
//! The tree is parsed once per compilation, mutated in place by the
//! simplification passes, and discarded after extraction. All nodes live in
//! a contiguous vector; parent/child/sibling links are indices into it, so
//! node ids stay stable across detach and splice operations.

mod parser;
mod serialize;

pub use parser::parse_svg;

/// Unique identifier for a node in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// An element attribute. Order within an element is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Synthetic document root owning the top-level nodes.
    Root,
    /// Element with tag name and ordered attributes (unique names).
    Element { name: String, attrs: Vec<Attribute> },
    /// Character data, including the contents of `<style>` elements.
    Text(String),
    /// Comment. Irrelevant to extraction but kept so the size metric sees it.
    Comment(String),
}

/// A node in the document arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Mutable document tree.
///
/// One compilation owns exactly one `Document`; nothing outside the tree
/// holds references into it, so passes are free to rewrite it in place.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create an empty document containing only the synthetic root.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId::NONE,
        };
        doc.root = doc.alloc(Node::new(NodeData::Root));
        doc
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// The synthetic root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Allocate a detached element node.
    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Element {
            name: name.into(),
            attrs: Vec::new(),
        }))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text.into())))
    }

    /// Allocate a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text.into())))
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Parent of `id`, or `NodeId::NONE` for the root and detached nodes.
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE)
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// The child must be detached; detach it first when moving a node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.parent(child).is_none(), "append of attached node");
        let old_last = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = old_last;
            node.next_sibling = NodeId::NONE;
        }
        if let Some(last) = self.get_mut(old_last) {
            last.next_sibling = child;
        }
        if let Some(p) = self.get_mut(parent) {
            if p.first_child.is_none() {
                p.first_child = child;
            }
            p.last_child = child;
        }
    }

    /// Insert a detached node immediately before `reference` under the
    /// reference's parent.
    pub fn insert_before(&mut self, reference: NodeId, new: NodeId) {
        let parent = self.parent(reference);
        let prev = self
            .get(reference)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(node) = self.get_mut(new) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if let Some(r) = self.get_mut(reference) {
            r.prev_sibling = new;
        }
        if let Some(p) = self.get_mut(prev) {
            p.next_sibling = new;
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new;
        }
    }

    /// Unlink a node from its parent. The node (and its subtree) stays in
    /// the arena but is no longer reachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if parent.is_none() {
            return;
        }

        if let Some(p) = self.get_mut(prev) {
            p.next_sibling = next;
        }
        if let Some(n) = self.get_mut(next) {
            n.prev_sibling = prev;
        }
        if let Some(par) = self.get_mut(parent) {
            if par.first_child == id {
                par.first_child = next;
            }
            if par.last_child == id {
                par.last_child = prev;
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Splice a node's children into its place, then detach the node.
    ///
    /// Used by group collapsing: `<g><path/><path/></g>` becomes the two
    /// paths at the position the group occupied.
    pub fn replace_with_children(&mut self, id: NodeId) {
        let children = self.child_ids(id);
        for child in children {
            self.detach(child);
            self.insert_before(id, child);
        }
        self.detach(id);
    }

    /// Iterate over the children of `id` via live sibling links.
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        ChildIter {
            doc: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Snapshot of the child list, safe to hold across mutation.
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }

    /// Preorder snapshot of all element descendants of `id` (excluding `id`).
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements(id, &mut out);
        out
    }

    fn collect_elements(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(id) {
            if self.is_element(child) {
                out.push(child);
                self.collect_elements(child, out);
            }
        }
    }

    /// First top-level element named `svg`, if any.
    pub fn svg_root(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| self.element_name(id) == Some("svg"))
    }

    // ------------------------------------------------------------------
    // Element accessors
    // ------------------------------------------------------------------

    /// Whether `id` is an element node.
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.get(id).map(|n| &n.data), Some(NodeData::Element { .. }))
    }

    /// Tag name of an element node.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Rename an element in place (shape-to-path conversion).
    pub fn set_element_name(&mut self, id: NodeId, new_name: impl Into<String>) {
        if let Some(NodeData::Element { name, .. }) = self.get_mut(id).map(|n| &mut n.data) {
            *name = new_name.into();
        }
    }

    /// Attributes of an element, empty for non-elements.
    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    /// Look up an attribute value.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether the element carries the attribute.
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute, replacing an existing value in place (keeps order)
    /// or appending a new one.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(NodeData::Element { attrs, .. }) = self.get_mut(id).map(|n| &mut n.data) {
            let value = value.into();
            if let Some(existing) = attrs.iter_mut().find(|a| a.name == name) {
                existing.value = value;
            } else {
                attrs.push(Attribute {
                    name: name.to_string(),
                    value,
                });
            }
        }
    }

    /// Remove an attribute, returning its former value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        if let Some(NodeData::Element { attrs, .. }) = self.get_mut(id).map(|n| &mut n.data) {
            let pos = attrs.iter().position(|a| a.name == name)?;
            return Some(attrs.remove(pos).value);
        }
        None
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in self.children(id) {
            match self.get(child).map(|n| &n.data) {
                Some(NodeData::Text(t)) => out.push_str(t),
                Some(NodeData::Element { .. }) => self.collect_text(child, out),
                _ => {}
            }
        }
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: impl Into<String>) {
        for child in self.child_ids(id) {
            self.detach(child);
        }
        let text_node = self.create_text(text);
        self.append_child(id, text_node);
    }

    /// Size metric for the convergence loop: byte length of the serialized
    /// document. Any structural or attribute change moves it.
    pub fn metric(&self) -> usize {
        self.to_svg().len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's children.
pub struct ChildIter<'a> {
    doc: &'a Document,
    next: NodeId,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next.is_none() {
            return None;
        }
        let current = self.next;
        self.next = self
            .doc
            .get(current)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(current)
    }
}
