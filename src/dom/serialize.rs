//! Deterministic document-to-text serialization.
//!
//! The scheduler compares the byte length of this output between passes to
//! decide convergence, so the writer must be stable: attribute order is
//! preserved, no pretty printing, childless elements always self-close.

use quick_xml::escape::escape;

use super::{Document, NodeData, NodeId};

impl Document {
    /// Serialize the tree back to SVG text.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { name, attrs }) => {
                out.push('<');
                out.push_str(name);
                for attr in attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape(attr.value.as_str()));
                    out.push('"');
                }

                let children = self.child_ids(id);
                if children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for child in children {
                        self.write_node(child, out);
                    }
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
            Some(NodeData::Text(text)) => out.push_str(&escape(text.as_str())),
            Some(NodeData::Comment(text)) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_svg;

    #[test]
    fn test_roundtrip_structure() {
        let doc =
            parse_svg(r#"<svg viewBox="0 0 24 24"><g fill="red"><path d="M0 0"/></g></svg>"#)
                .unwrap();
        assert_eq!(
            doc.to_svg(),
            r#"<svg viewBox="0 0 24 24"><g fill="red"><path d="M0 0"/></g></svg>"#
        );
    }

    #[test]
    fn test_escapes_attr_values() {
        let doc = parse_svg(r#"<svg data-x="a&amp;b"/>"#).unwrap();
        assert_eq!(doc.to_svg(), r#"<svg data-x="a&amp;b"/>"#);
    }

    #[test]
    fn test_metric_tracks_content() {
        let mut doc = parse_svg(r#"<svg><path d="M0 0" fill="red"/></svg>"#).unwrap();
        let before = doc.metric();
        let svg = doc.svg_root().unwrap();
        let path = doc.child_ids(svg)[0];
        doc.remove_attr(path, "fill");
        assert!(doc.metric() < before);
    }
}
