//! Extraction: simplified tree to icon geometry and dimensions.

use crate::dom::Document;
use crate::error::{Error, Result};

/// Geometry pulled out of a simplified document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedIcon {
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Path data strings in document order, never empty.
    pub paths: Vec<String>,
}

/// Extract path data and dimensions from a simplified tree.
///
/// `file_path` is used for error messages only. Only direct `<path>`
/// children of the `<svg>` root are collected — the pipeline guarantees
/// nothing else drawable remains at that level, and paths pinned inside an
/// uncollapsible group stay where their transform context is.
///
/// Fails on a missing `<svg>` root or when no path contributes data; both
/// abort this file's build. Missing or malformed sizing never fails —
/// dimensions degrade to `None`.
pub fn extract_icon(doc: &Document, file_path: &str) -> Result<ExtractedIcon> {
    let svg = doc.svg_root().ok_or_else(|| Error::MissingSvgRoot {
        file: file_path.to_string(),
    })?;

    let paths: Vec<String> = doc
        .children(svg)
        .filter(|&id| doc.element_name(id) == Some("path"))
        .filter_map(|id| doc.attr(id, "d"))
        .map(str::to_string)
        .collect();
    if paths.is_empty() {
        return Err(Error::NoPathData {
            file: file_path.to_string(),
        });
    }

    let (width, height) = match doc.attr(svg, "viewBox").and_then(parse_view_box) {
        Some((_, _, width, height)) => (Some(width), Some(height)),
        None => (
            dimension_attr(doc.attr(svg, "width")),
            dimension_attr(doc.attr(svg, "height")),
        ),
    };

    Ok(ExtractedIcon {
        width,
        height,
        paths,
    })
}

/// Parse `minX minY width height`; any bad token invalidates the whole
/// attribute.
pub(crate) fn parse_view_box(value: &str) -> Option<(f64, f64, f64, f64)> {
    let mut tokens = Vec::with_capacity(4);
    for token in value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
    {
        tokens.push(token.parse::<f64>().ok()?);
    }
    match tokens[..] {
        [min_x, min_y, width, height] => Some((min_x, min_y, width, height)),
        _ => None,
    }
}

/// Parse a `width`/`height` attribute as a plain number, accepting a
/// trailing `px`. Anything else is no dimension.
fn dimension_attr(value: Option<&str>) -> Option<f64> {
    let value = value?.trim();
    let value = value.strip_suffix("px").unwrap_or(value).trim_end();
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_svg;

    fn extract(svg: &str) -> Result<ExtractedIcon> {
        let doc = parse_svg(svg).unwrap();
        extract_icon(&doc, "icons/test.svg")
    }

    #[test]
    fn test_viewbox_dimensions() {
        let icon = extract(r#"<svg viewBox="0 0 512 512"><path d="M0 0"/></svg>"#).unwrap();
        assert_eq!(icon.width, Some(512.0));
        assert_eq!(icon.height, Some(512.0));
        assert_eq!(icon.paths, vec!["M0 0"]);
    }

    #[test]
    fn test_malformed_viewbox_falls_back_to_attrs() {
        let icon = extract(
            r#"<svg viewBox="0 0 512" width="24px" height="24"><path d="M0 0"/></svg>"#,
        )
        .unwrap();
        assert_eq!(icon.width, Some(24.0));
        assert_eq!(icon.height, Some(24.0));
    }

    #[test]
    fn test_no_sizing_at_all() {
        let icon = extract(r#"<svg><path d="M0 0"/></svg>"#).unwrap();
        assert_eq!(icon.width, None);
        assert_eq!(icon.height, None);
    }

    #[test]
    fn test_non_pixel_units_degrade() {
        let icon = extract(r#"<svg width="2em" height="50%"><path d="M0 0"/></svg>"#).unwrap();
        assert_eq!(icon.width, None);
        assert_eq!(icon.height, None);
    }

    #[test]
    fn test_paths_in_document_order() {
        let icon = extract(r#"<svg><path d="M0 0"/><g/><path d="M1 1"/></svg>"#).unwrap();
        assert_eq!(icon.paths, vec!["M0 0", "M1 1"]);
    }

    #[test]
    fn test_nested_paths_not_collected() {
        let icon = extract(
            r#"<svg><g transform="scale(2)"><path d="M5 5"/></g><path d="M0 0"/></svg>"#,
        )
        .unwrap();
        assert_eq!(icon.paths, vec!["M0 0"]);
    }

    #[test]
    fn test_missing_root_error_names_file() {
        let err = extract("<div/>").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing svg root element"), "{message}");
        assert!(message.contains("icons/test.svg"), "{message}");
    }

    #[test]
    fn test_no_paths_error_names_file() {
        let err = extract("<svg><g/></svg>").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no path"), "{message}");
        assert!(message.contains("icons/test.svg"), "{message}");
    }

    #[test]
    fn test_path_without_d_does_not_count() {
        let err = extract("<svg><path/></svg>").unwrap_err();
        assert!(matches!(err, Error::NoPathData { .. }));
    }

    #[test]
    fn test_parse_view_box() {
        assert_eq!(parse_view_box("0 0 24 24"), Some((0.0, 0.0, 24.0, 24.0)));
        assert_eq!(parse_view_box("0,0,24,24"), Some((0.0, 0.0, 24.0, 24.0)));
        assert_eq!(parse_view_box("-8 -8 16 16"), Some((-8.0, -8.0, 16.0, 16.0)));
        assert_eq!(parse_view_box("0 0 24"), None);
        assert_eq!(parse_view_box("a b c d"), None);
        assert_eq!(parse_view_box(""), None);
    }
}
