//! Style handling units: merge `<style>` sheets, inline matching rules,
//! convert style declarations to presentation attributes, drop `<style>`.
//!
//! CSS declaration blocks go through `cssparser`; rule structure and the
//! selector subset (tag, `.class`, `#id`, compounds, comma lists) are
//! handled directly. That subset covers what icon sources actually ship;
//! anything richer is left in the sheet untouched.

use cssparser::{Parser, ParserInput, Token};

use crate::dom::{Document, NodeId};

use super::pass::Pass;

/// One `property: value` declaration, property lowercased.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Declaration {
    pub property: String,
    pub value: String,
}

/// Parse a declaration block (`fill: red; stroke-width: 2`).
///
/// Malformed declarations are skipped, recovery resumes after the next
/// semicolon.
pub(crate) fn parse_declarations(css: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let result: Result<(), cssparser::ParseError<'_, ()>> = parser.try_parse(|i| {
            let property = match i.next()? {
                Token::Ident(name) => name.to_string().to_lowercase(),
                _ => return Err(i.new_custom_error(())),
            };

            i.skip_whitespace();
            match i.next()? {
                Token::Colon => {}
                _ => return Err(i.new_custom_error(())),
            }
            i.skip_whitespace();

            let start = i.position();
            loop {
                match i.next() {
                    Ok(Token::Semicolon) => break,
                    Ok(_) => continue,
                    Err(_) => break,
                }
            }
            let value = i
                .slice_from(start)
                .trim()
                .trim_end_matches(';')
                .trim()
                .to_string();
            if value.is_empty() {
                return Err(i.new_custom_error(()));
            }

            declarations.push(Declaration { property, value });
            Ok(())
        });

        if result.is_err() {
            // Skip to the next semicolon to recover.
            loop {
                match parser.next() {
                    Ok(Token::Semicolon) => break,
                    Ok(_) => continue,
                    Err(_) => return declarations,
                }
            }
        }
    }

    declarations
}

fn serialize_declarations(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|d| format!("{}:{}", d.property, d.value))
        .collect::<Vec<_>>()
        .join(";")
}

fn upsert(declarations: &mut Vec<Declaration>, declaration: Declaration) {
    if let Some(existing) = declarations
        .iter_mut()
        .find(|d| d.property == declaration.property)
    {
        existing.value = declaration.value;
    } else {
        declarations.push(declaration);
    }
}

/// Remove `/* ... */` comments.
fn strip_css_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(open) = rest.find("/*") {
        out.push_str(&rest[..open]);
        match rest[open + 2..].find("*/") {
            Some(close) => rest = &rest[open + 2 + close + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

// ----------------------------------------------------------------------
// Selector subset
// ----------------------------------------------------------------------

/// A compound selector: optional tag plus any number of class/id parts.
#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn specificity(&self) -> (u32, u32, u32) {
        (
            self.id.is_some() as u32,
            self.classes.len() as u32,
            self.tag.is_some() as u32,
        )
    }

    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if doc.element_name(id) != Some(tag.as_str()) {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if doc.attr(id, "id") != Some(want.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let Some(class_attr) = doc.attr(id, "class") else {
                return false;
            };
            let present: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| present.contains(&c.as_str())) {
                return false;
            }
        }
        true
    }
}

fn ident_end(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len())
}

/// Parse a compound selector. Combinators, pseudo-classes, attribute
/// selectors and the rest of full CSS come back as `None`.
fn parse_compound(selector: &str) -> Option<Compound> {
    let mut rest = selector.trim();
    if rest.is_empty() {
        return None;
    }
    let mut compound = Compound::default();
    let mut leading = true;

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('.') {
            let end = ident_end(stripped);
            if end == 0 {
                return None;
            }
            compound.classes.push(stripped[..end].to_string());
            rest = &stripped[end..];
        } else if let Some(stripped) = rest.strip_prefix('#') {
            let end = ident_end(stripped);
            if end == 0 {
                return None;
            }
            compound.id = Some(stripped[..end].to_string());
            rest = &stripped[end..];
        } else if leading && rest.starts_with('*') {
            rest = &rest[1..];
        } else if leading && rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let end = ident_end(rest);
            compound.tag = Some(rest[..end].to_string());
            rest = &rest[end..];
        } else {
            return None;
        }
        leading = false;
    }

    Some(compound)
}

// ----------------------------------------------------------------------
// Sheet structure
// ----------------------------------------------------------------------

#[derive(Debug)]
enum SheetItem {
    Rule {
        selectors: Vec<String>,
        declarations: String,
    },
    /// At-rules and anything else carried through verbatim.
    Raw(String),
}

fn parse_stylesheet(css: &str) -> Vec<SheetItem> {
    let mut items = Vec::new();
    let mut rest = css;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if rest.starts_with('@') {
            let end = at_rule_end(rest);
            items.push(SheetItem::Raw(rest[..end].trim().to_string()));
            rest = &rest[end..];
            continue;
        }

        let Some(open) = rest.find('{') else {
            // Trailing junk without a block.
            items.push(SheetItem::Raw(rest.trim().to_string()));
            break;
        };
        let Some(close) = rest[open..].find('}') else {
            items.push(SheetItem::Raw(rest.trim().to_string()));
            break;
        };
        let close = open + close;

        let selectors = rest[..open]
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        items.push(SheetItem::Rule {
            selectors,
            declarations: rest[open + 1..close].trim().to_string(),
        });
        rest = &rest[close + 1..];
    }

    items
}

/// Length of an at-rule: through its balanced block, or through the
/// terminating semicolon for block-less forms like `@import`.
fn at_rule_end(s: &str) -> usize {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1;
                }
            }
            ';' if depth == 0 => return i + 1,
            _ => {}
        }
    }
    s.len()
}

fn serialize_stylesheet(items: &[SheetItem]) -> String {
    let mut out = String::new();
    for item in items {
        match item {
            SheetItem::Rule {
                selectors,
                declarations,
            } => {
                out.push_str(&selectors.join(","));
                out.push('{');
                out.push_str(declarations);
                out.push('}');
            }
            SheetItem::Raw(text) => out.push_str(text),
        }
    }
    out
}

fn style_elements(doc: &Document) -> Vec<NodeId> {
    doc.descendant_elements(doc.root())
        .into_iter()
        .filter(|&id| doc.element_name(id) == Some("style"))
        .collect()
}

fn is_css_type(doc: &Document, id: NodeId) -> bool {
    matches!(doc.attr(id, "type"), None | Some("") | Some("text/css"))
}

// ----------------------------------------------------------------------
// Unit 1: merge_styles
// ----------------------------------------------------------------------

/// Concatenate every `<style>` element into the first one.
///
/// A `media` attribute is folded into an `@media` block so the merged
/// sheet preserves its meaning. Non-CSS `type`s are left alone.
#[derive(Default)]
pub struct MergeStyles;

impl Pass for MergeStyles {
    fn name(&self) -> &'static str {
        "merge_styles"
    }

    fn enter_root(&mut self, doc: &mut Document) {
        let styles: Vec<NodeId> = style_elements(doc)
            .into_iter()
            .filter(|&id| is_css_type(doc, id))
            .collect();
        if styles.len() <= 1 {
            return;
        }

        let mut combined = String::new();
        for &id in &styles {
            let text = doc.text_content(id);
            match doc.attr(id, "media") {
                Some(media) if !media.is_empty() => {
                    combined.push_str(&format!("@media {media}{{{text}}}"));
                }
                _ => combined.push_str(&text),
            }
        }

        let first = styles[0];
        doc.set_text_content(first, combined);
        doc.remove_attr(first, "media");
        for &id in &styles[1..] {
            doc.detach(id);
        }
    }
}

// ----------------------------------------------------------------------
// Unit 2: inline_styles
// ----------------------------------------------------------------------

/// Move stylesheet rules onto the elements they select.
///
/// A rule is applied when every selector in its list is in the supported
/// subset; matched selectors are removed from the sheet, fully-consumed
/// rules disappear, and a sheet left empty takes its `<style>` element
/// with it. Rules containing unsupported selectors stay untouched so their
/// semantics remain single-sourced. Inline `style` attributes keep
/// priority over inlined rule declarations.
#[derive(Default)]
pub struct InlineStyles;

impl Pass for InlineStyles {
    fn name(&self) -> &'static str {
        "inline_styles"
    }

    fn enter_root(&mut self, doc: &mut Document) {
        for style_el in style_elements(doc) {
            if !is_css_type(doc, style_el) {
                continue;
            }
            inline_sheet(doc, style_el);
        }
    }
}

fn inline_sheet(doc: &mut Document, style_el: NodeId) {
    let css = strip_css_comments(&doc.text_content(style_el));
    let mut items = parse_stylesheet(&css);

    let elements: Vec<NodeId> = doc
        .descendant_elements(doc.root())
        .into_iter()
        .filter(|&id| doc.element_name(id) != Some("style"))
        .collect();

    // (specificity, element, declarations) for every supported match,
    // applied lowest specificity first; stable sort keeps source order.
    let mut applications: Vec<((u32, u32, u32), NodeId, Vec<Declaration>)> = Vec::new();

    for item in &mut items {
        let SheetItem::Rule {
            selectors,
            declarations,
        } = item
        else {
            continue;
        };

        let compounds: Vec<Option<Compound>> =
            selectors.iter().map(|s| parse_compound(s)).collect();
        if compounds.iter().any(|c| c.is_none()) {
            continue;
        }
        let parsed = parse_declarations(declarations);

        let mut remaining = Vec::new();
        for (selector, compound) in selectors.iter().zip(compounds.iter()) {
            let Some(compound) = compound else { continue };
            let matched: Vec<NodeId> = elements
                .iter()
                .copied()
                .filter(|&id| compound.matches(doc, id))
                .collect();
            if matched.is_empty() {
                remaining.push(selector.clone());
                continue;
            }
            for id in matched {
                applications.push((compound.specificity(), id, parsed.clone()));
            }
        }
        *selectors = remaining;
    }

    items.retain(|item| !matches!(item, SheetItem::Rule { selectors, .. } if selectors.is_empty()));

    applications.sort_by_key(|(specificity, _, _)| *specificity);
    let mut pending: Vec<(NodeId, Vec<Declaration>)> = Vec::new();
    for (_, id, declarations) in applications {
        let index = match pending.iter().position(|(e, _)| *e == id) {
            Some(index) => index,
            None => {
                pending.push((id, Vec::new()));
                pending.len() - 1
            }
        };
        for declaration in declarations {
            upsert(&mut pending[index].1, declaration);
        }
    }

    for (id, mut declarations) in pending {
        // Existing inline declarations win over inlined rules.
        if let Some(inline) = doc.attr(id, "style") {
            for declaration in parse_declarations(inline) {
                upsert(&mut declarations, declaration);
            }
        }
        doc.set_attr(id, "style", serialize_declarations(&declarations));
    }

    let rewritten = serialize_stylesheet(&items);
    if rewritten.trim().is_empty() {
        doc.detach(style_el);
    } else {
        doc.set_text_content(style_el, rewritten);
    }
}

// ----------------------------------------------------------------------
// Unit 3: convert_style_to_attrs
// ----------------------------------------------------------------------

/// SVG presentation attributes that may be lifted out of `style`.
const PRESENTATION_ATTRS: &[&str] = &[
    "clip-path",
    "clip-rule",
    "color",
    "display",
    "fill",
    "fill-opacity",
    "fill-rule",
    "filter",
    "marker-end",
    "marker-mid",
    "marker-start",
    "mask",
    "opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "transform",
    "visibility",
];

/// Turn `style` declarations into plain presentation attributes.
///
/// Unknown properties and `!important` declarations stay behind in the
/// `style` attribute; an emptied attribute is removed.
#[derive(Default)]
pub struct ConvertStyleToAttrs;

impl Pass for ConvertStyleToAttrs {
    fn name(&self) -> &'static str {
        "convert_style_to_attrs"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        let Some(style) = doc.attr(node, "style") else {
            return;
        };
        let declarations = parse_declarations(style);
        if declarations.is_empty() {
            doc.remove_attr(node, "style");
            return;
        }

        let mut retained = Vec::new();
        for declaration in declarations {
            let liftable = PRESENTATION_ATTRS.contains(&declaration.property.as_str())
                && !declaration.value.contains("!important");
            if liftable {
                doc.set_attr(node, &declaration.property, declaration.value);
            } else {
                retained.push(declaration);
            }
        }

        if retained.is_empty() {
            doc.remove_attr(node, "style");
        } else {
            doc.set_attr(node, "style", serialize_declarations(&retained));
        }
    }
}

// ----------------------------------------------------------------------
// Unit 4: remove_style_element
// ----------------------------------------------------------------------

/// Delete every `<style>` element; by this point in the pipeline anything
/// worth keeping has been inlined.
#[derive(Default)]
pub struct RemoveStyleElement;

impl Pass for RemoveStyleElement {
    fn name(&self) -> &'static str {
        "remove_style_element"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        if doc.element_name(node) == Some("style") {
            doc.detach(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_svg;
    use crate::simplify::pass::run_unit;

    #[test]
    fn test_parse_declarations() {
        let declarations = parse_declarations("fill: red; stroke-width: 2; junk");
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].property, "fill");
        assert_eq!(declarations[0].value, "red");
        assert_eq!(declarations[1].value, "2");
    }

    #[test]
    fn test_parse_compound_selectors() {
        let c = parse_compound("path.icon#main").unwrap();
        assert_eq!(c.tag.as_deref(), Some("path"));
        assert_eq!(c.id.as_deref(), Some("main"));
        assert_eq!(c.classes, vec!["icon"]);
        assert_eq!(c.specificity(), (1, 1, 1));

        assert!(parse_compound("g > path").is_none());
        assert!(parse_compound("path:hover").is_none());
        assert!(parse_compound("[fill]").is_none());
    }

    #[test]
    fn test_merge_styles() {
        let mut doc = parse_svg(
            "<svg><style>.a{fill:red}</style><g/><style media=\"print\">.b{fill:blue}</style></svg>",
        )
        .unwrap();
        run_unit(&mut doc, &mut MergeStyles);

        let svg = doc.svg_root().unwrap();
        let styles: Vec<_> = doc
            .child_ids(svg)
            .into_iter()
            .filter(|&id| doc.element_name(id) == Some("style"))
            .collect();
        assert_eq!(styles.len(), 1);
        assert_eq!(
            doc.text_content(styles[0]),
            ".a{fill:red}@media print{.b{fill:blue}}"
        );
    }

    #[test]
    fn test_inline_styles_applies_and_consumes() {
        let mut doc = parse_svg(
            r#"<svg><style>.a{fill:red}</style><path class="a" d="M0 0"/></svg>"#,
        )
        .unwrap();
        run_unit(&mut doc, &mut InlineStyles);

        let svg = doc.svg_root().unwrap();
        let kids = doc.child_ids(svg);
        // Emptied sheet removes its style element.
        assert_eq!(kids.len(), 1);
        assert_eq!(doc.attr(kids[0], "style"), Some("fill:red"));
    }

    #[test]
    fn test_inline_styles_keeps_unsupported_rules() {
        let mut doc = parse_svg(
            r#"<svg><style>path:hover{fill:red}</style><path d="M0 0"/></svg>"#,
        )
        .unwrap();
        run_unit(&mut doc, &mut InlineStyles);

        let svg = doc.svg_root().unwrap();
        let kids = doc.child_ids(svg);
        assert_eq!(kids.len(), 2);
        assert_eq!(doc.text_content(kids[0]), "path:hover{fill:red}");
        assert!(!doc.has_attr(kids[1], "style"));
    }

    #[test]
    fn test_inline_styles_inline_attr_wins() {
        let mut doc = parse_svg(
            r#"<svg><style>path{fill:red;opacity:.5}</style><path style="fill:blue" d="M0 0"/></svg>"#,
        )
        .unwrap();
        run_unit(&mut doc, &mut InlineStyles);

        let svg = doc.svg_root().unwrap();
        let path = doc.child_ids(svg)[0];
        assert_eq!(doc.attr(path, "style"), Some("fill:blue;opacity:.5"));
    }

    #[test]
    fn test_convert_style_to_attrs() {
        let mut doc = parse_svg(
            r#"<svg><path style="fill:red;cursor:pointer;stroke-width:2" d="M0 0"/></svg>"#,
        )
        .unwrap();
        run_unit(&mut doc, &mut ConvertStyleToAttrs);

        let svg = doc.svg_root().unwrap();
        let path = doc.child_ids(svg)[0];
        assert_eq!(doc.attr(path, "fill"), Some("red"));
        assert_eq!(doc.attr(path, "stroke-width"), Some("2"));
        assert_eq!(doc.attr(path, "style"), Some("cursor:pointer"));
    }

    #[test]
    fn test_remove_style_element() {
        let mut doc = parse_svg("<svg><style>.a{}</style><path d=\"M0 0\"/></svg>").unwrap();
        run_unit(&mut doc, &mut RemoveStyleElement);
        let svg = doc.svg_root().unwrap();
        assert_eq!(doc.child_ids(svg).len(), 1);
    }
}
