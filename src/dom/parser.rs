//! SVG text to document tree, via quick-xml pull events.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::Result;

use super::{Document, NodeId};

/// Parse raw SVG text into a [`Document`].
///
/// Whitespace-only text is trimmed away, XML declarations, doctypes and
/// processing instructions are dropped, comments are kept. Attribute values
/// that fail to unescape are taken verbatim rather than failing the parse.
pub fn parse_svg(source: &str) -> Result<Document> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut doc = Document::new();
    let mut stack: Vec<NodeId> = vec![doc.root()];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let id = open_element(&mut doc, &e);
                let parent = *stack.last().unwrap_or(&doc.root());
                doc.append_child(parent, id);
                stack.push(id);
            }
            Event::Empty(e) => {
                let id = open_element(&mut doc, &e);
                let parent = *stack.last().unwrap_or(&doc.root());
                doc.append_child(parent, id);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            Event::Text(e) => {
                let text = match e.xml_content() {
                    Ok(t) => match quick_xml::escape::unescape(&t) {
                        Ok(u) => u.into_owned(),
                        Err(_) => t.into_owned(),
                    },
                    Err(_) => String::from_utf8_lossy(e.as_ref()).into_owned(),
                };
                let id = doc.create_text(text);
                let parent = *stack.last().unwrap_or(&doc.root());
                doc.append_child(parent, id);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                let id = doc.create_text(text);
                let parent = *stack.last().unwrap_or(&doc.root());
                doc.append_child(parent, id);
            }
            Event::Comment(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                let id = doc.create_comment(text);
                let parent = *stack.last().unwrap_or(&doc.root());
                doc.append_child(parent, id);
            }
            Event::Eof => break,
            // Declarations, doctypes, PIs, entity references: irrelevant.
            _ => {}
        }
    }

    Ok(doc)
}

fn open_element(doc: &mut Document, e: &quick_xml::events::BytesStart<'_>) -> NodeId {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let id = doc.create_element(name);

    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        doc.set_attr(id, &key, value);
    }

    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let doc = parse_svg(r#"<svg viewBox="0 0 24 24"><g><path d="M0 0"/></g></svg>"#).unwrap();
        let svg = doc.svg_root().expect("svg root");
        assert_eq!(doc.attr(svg, "viewBox"), Some("0 0 24 24"));

        let kids = doc.child_ids(svg);
        assert_eq!(kids.len(), 1);
        assert_eq!(doc.element_name(kids[0]), Some("g"));
        let inner = doc.child_ids(kids[0]);
        assert_eq!(doc.attr(inner[0], "d"), Some("M0 0"));
    }

    #[test]
    fn test_parse_keeps_style_text() {
        let doc = parse_svg("<svg><style>.a { fill: red; }</style></svg>").unwrap();
        let svg = doc.svg_root().unwrap();
        let style = doc.child_ids(svg)[0];
        assert_eq!(doc.text_content(style), ".a { fill: red; }");
    }

    #[test]
    fn test_parse_drops_decl_keeps_comment() {
        let doc = parse_svg("<?xml version=\"1.0\"?><!-- hi --><svg/>").unwrap();
        let top = doc.child_ids(doc.root());
        assert_eq!(top.len(), 2);
        assert!(doc.svg_root().is_some());
    }

    #[test]
    fn test_parse_mismatched_tag_is_error() {
        assert!(parse_svg("<svg><g></svg>").is_err());
    }

    #[test]
    fn test_parse_unescapes_attrs() {
        let doc = parse_svg(r#"<svg data-x="a&amp;b"/>"#).unwrap();
        let svg = doc.svg_root().unwrap();
        assert_eq!(doc.attr(svg, "data-x"), Some("a&b"));
    }
}
