//! Unit 5: numeric attribute cleanup.

use crate::dom::{Document, NodeId};
use crate::path::format_number;

use super::pass::Pass;

/// Attributes with their own syntax, handled by dedicated units.
const SKIPPED: &[&str] = &["d", "points", "transform", "style", "class", "id", "version"];

/// Round numeric attribute values, strip default `px` units, rewrite
/// `viewBox` number lists.
///
/// `width="24.0001px"` becomes `width="24"`; other units (`em`, `%`, ...)
/// keep their suffix. Non-numeric values pass through untouched.
pub struct CleanupNumericValues {
    pub precision: u32,
}

impl Default for CleanupNumericValues {
    fn default() -> Self {
        Self { precision: 3 }
    }
}

impl Pass for CleanupNumericValues {
    fn name(&self) -> &'static str {
        "cleanup_numeric_values"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        let names: Vec<String> = doc.attrs(node).iter().map(|a| a.name.clone()).collect();

        for name in names {
            if SKIPPED.contains(&name.as_str()) {
                continue;
            }
            let Some(value) = doc.attr(node, &name) else {
                continue;
            };

            if name == "viewBox" {
                if let Some(rewritten) = cleanup_number_list(value, self.precision) {
                    doc.set_attr(node, &name, rewritten);
                }
                continue;
            }

            if let Some((number, unit)) = split_number_unit(value) {
                let unit = if unit == "px" { "" } else { unit };
                let rewritten = format!("{}{}", format_number(number, self.precision), unit);
                doc.set_attr(node, &name, rewritten);
            }
        }
    }
}

/// Rewrite a whitespace/comma separated list of numbers, or `None` when
/// any token fails to parse.
fn cleanup_number_list(value: &str, precision: u32) -> Option<String> {
    let tokens: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    if tokens.is_empty() {
        return None;
    }
    Some(
        tokens
            .iter()
            .map(|&n| format_number(n, precision))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Split `"2.5em"` into `(2.5, "em")`. The unit must be alphabetic or `%`.
fn split_number_unit(value: &str) -> Option<(f64, &str)> {
    let value = value.trim();
    let unit_start = value
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(value.len());
    // An exponent's `e` must not be mistaken for a unit.
    let (number_text, unit) = value.split_at(unit_start);
    if !unit.is_empty() && !unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%') {
        return None;
    }
    let number = number_text.parse::<f64>().ok()?;
    Some((number, unit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_svg;
    use crate::simplify::pass::run_unit;

    fn cleanup(svg: &str) -> Document {
        let mut doc = parse_svg(svg).unwrap();
        run_unit(&mut doc, &mut CleanupNumericValues::default());
        doc
    }

    #[test]
    fn test_rounds_and_strips_px() {
        let doc = cleanup(r#"<svg width="24.0001px" height="0.50"/>"#);
        let svg = doc.svg_root().unwrap();
        assert_eq!(doc.attr(svg, "width"), Some("24"));
        assert_eq!(doc.attr(svg, "height"), Some(".5"));
    }

    #[test]
    fn test_keeps_other_units() {
        let doc = cleanup(r#"<svg width="2.50em"/>"#);
        let svg = doc.svg_root().unwrap();
        assert_eq!(doc.attr(svg, "width"), Some("2.5em"));
    }

    #[test]
    fn test_rewrites_viewbox() {
        let doc = cleanup(r#"<svg viewBox="0, 0, 512.0001, 512"/>"#);
        let svg = doc.svg_root().unwrap();
        assert_eq!(doc.attr(svg, "viewBox"), Some("0 0 512 512"));
    }

    #[test]
    fn test_leaves_non_numeric_and_skipped() {
        let doc = cleanup(r#"<svg fill="red"><path d="M0.50 0"/></svg>"#);
        let svg = doc.svg_root().unwrap();
        assert_eq!(doc.attr(svg, "fill"), Some("red"));
        let path = doc.child_ids(svg)[0];
        assert_eq!(doc.attr(path, "d"), Some("M0.50 0"));
    }
}
