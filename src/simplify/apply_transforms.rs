//! Unit 11: resolve `transform` attributes into raw path coordinates.

use crate::dom::{Document, NodeId};
use crate::path::{Command, Matrix, Segment, parse_path_data, parse_transform_list, write_path_data};

use super::pass::Pass;

/// Flatten a `<path>`'s `transform` into its `d` coordinates and drop the
/// attribute.
///
/// Bails out, leaving the attribute in place, when flattening cannot be
/// exact: unparsable transform lists, arcs under non-conformal (or
/// reflecting) maps, `url()` paint that may be position-dependent, or an
/// `id` some other node might reference. A present `stroke-width` is
/// rescaled along with the geometry.
pub struct ApplyTransforms {
    pub precision: u32,
}

impl Default for ApplyTransforms {
    fn default() -> Self {
        Self { precision: 3 }
    }
}

impl Pass for ApplyTransforms {
    fn name(&self) -> &'static str {
        "apply_transforms"
    }

    fn enter_element(&mut self, doc: &mut Document, node: NodeId) {
        if doc.element_name(node) != Some("path") || doc.has_attr(node, "id") {
            return;
        }
        let Some(transform) = doc.attr(node, "transform") else {
            return;
        };
        let Some(d) = doc.attr(node, "d") else {
            return;
        };
        for paint in ["fill", "stroke"] {
            if doc.attr(node, paint).is_some_and(|v| v.contains("url(")) {
                return;
            }
        }

        let Some(matrix) = parse_transform_list(transform) else {
            return;
        };
        let mut segments = parse_path_data(d);
        let has_arcs = segments.iter().any(|s| s.command == Command::Arc);
        if has_arcs && !(matrix.is_conformal() && matrix.determinant() > 0.0) {
            return;
        }

        transform_segments(&mut segments, &matrix);
        doc.set_attr(node, "d", write_path_data(&segments, self.precision));
        doc.remove_attr(node, "transform");

        let scale = matrix.scale_factor();
        if (scale - 1.0).abs() > 1e-9 {
            if let Some(width) = doc
                .attr(node, "stroke-width")
                .and_then(|w| w.trim().parse::<f64>().ok())
            {
                doc.set_attr(
                    node,
                    "stroke-width",
                    crate::path::format_number(width * scale, self.precision),
                );
            }
        }
    }
}

/// Apply `matrix` to every coordinate in the segment list.
///
/// The current point is tracked in source space so absolute H/V commands
/// can be rebuilt into full LineTo pairs when the matrix mixes axes.
fn transform_segments(segments: &mut [Segment], matrix: &Matrix) {
    let mut cur = (0.0f64, 0.0f64);
    let mut start = (0.0f64, 0.0f64);

    for (index, segment) in segments.iter_mut().enumerate() {
        // The initial moveto is absolute even in its relative spelling.
        let relative = segment.relative && !(index == 0 && segment.command == Command::Move);

        match segment.command {
            Command::Move | Command::Line | Command::SmoothQuadratic => {
                let (x, y) = (segment.args[0], segment.args[1]);
                advance(&mut cur, relative, x, y);
                if segment.command == Command::Move {
                    start = cur;
                }
                let (nx, ny) = map(matrix, relative, x, y);
                segment.args[0] = nx;
                segment.args[1] = ny;
            }
            Command::Cubic | Command::SmoothCubic | Command::Quadratic => {
                let args = segment.args.clone();
                for (pair, out) in args.chunks(2).zip(segment.args.chunks_mut(2)) {
                    let (nx, ny) = map(matrix, relative, pair[0], pair[1]);
                    out[0] = nx;
                    out[1] = ny;
                }
                let n = args.len();
                advance(&mut cur, relative, args[n - 2], args[n - 1]);
            }
            Command::Horizontal => {
                let x = segment.args[0];
                let source_y = cur.1;
                advance_x(&mut cur, relative, x);
                if matrix.is_axis_aligned() {
                    segment.args[0] = if relative {
                        matrix.a * x
                    } else {
                        matrix.a * x + matrix.e
                    };
                } else if relative {
                    let (nx, ny) = matrix.apply_vector(x, 0.0);
                    *segment = Segment::new(Command::Line, true, vec![nx, ny]);
                } else {
                    let (nx, ny) = matrix.apply(x, source_y);
                    *segment = Segment::new(Command::Line, false, vec![nx, ny]);
                }
            }
            Command::Vertical => {
                let y = segment.args[0];
                let source_x = cur.0;
                advance_y(&mut cur, relative, y);
                if matrix.is_axis_aligned() {
                    segment.args[0] = if relative {
                        matrix.d * y
                    } else {
                        matrix.d * y + matrix.f
                    };
                } else if relative {
                    let (nx, ny) = matrix.apply_vector(0.0, y);
                    *segment = Segment::new(Command::Line, true, vec![nx, ny]);
                } else {
                    let (nx, ny) = matrix.apply(source_x, y);
                    *segment = Segment::new(Command::Line, false, vec![nx, ny]);
                }
            }
            Command::Arc => {
                let scale = matrix.scale_factor();
                segment.args[0] *= scale;
                segment.args[1] *= scale;
                segment.args[2] = normalize_degrees(segment.args[2] + matrix.rotation_degrees());
                let (x, y) = (segment.args[5], segment.args[6]);
                advance(&mut cur, relative, x, y);
                let (nx, ny) = map(matrix, relative, x, y);
                segment.args[5] = nx;
                segment.args[6] = ny;
            }
            Command::Close => {
                cur = start;
            }
        }
    }
}

fn map(matrix: &Matrix, relative: bool, x: f64, y: f64) -> (f64, f64) {
    if relative {
        matrix.apply_vector(x, y)
    } else {
        matrix.apply(x, y)
    }
}

fn advance(cur: &mut (f64, f64), relative: bool, x: f64, y: f64) {
    *cur = if relative {
        (cur.0 + x, cur.1 + y)
    } else {
        (x, y)
    };
}

fn advance_x(cur: &mut (f64, f64), relative: bool, x: f64) {
    cur.0 = if relative { cur.0 + x } else { x };
}

fn advance_y(cur: &mut (f64, f64), relative: bool, y: f64) {
    cur.1 = if relative { cur.1 + y } else { y };
}

fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_svg;
    use crate::simplify::pass::run_unit;

    fn apply(svg: &str) -> (Document, NodeId) {
        let mut doc = parse_svg(svg).unwrap();
        run_unit(&mut doc, &mut ApplyTransforms::default());
        let svg_el = doc.svg_root().unwrap();
        let path = doc.child_ids(svg_el)[0];
        (doc, path)
    }

    #[test]
    fn test_translate_flattened() {
        let (doc, path) =
            apply(r#"<svg><path transform="translate(10 20)" d="M0 0L5 5"/></svg>"#);
        assert_eq!(doc.attr(path, "d"), Some("M10 20L15 25"));
        assert!(!doc.has_attr(path, "transform"));
    }

    #[test]
    fn test_scale_keeps_h_v_and_relatives() {
        let (doc, path) =
            apply(r#"<svg><path transform="scale(2)" d="M1 1h3v4l-1-1"/></svg>"#);
        assert_eq!(doc.attr(path, "d"), Some("M2 2h6v8l-2-2"));
    }

    #[test]
    fn test_rotation_degrades_h_to_l() {
        let (doc, path) = apply(r#"<svg><path transform="rotate(90)" d="M0 0H10"/></svg>"#);
        assert_eq!(doc.attr(path, "d"), Some("M0 0L0 10"));
    }

    #[test]
    fn test_arc_under_uniform_scale() {
        let (doc, path) = apply(
            r#"<svg><path transform="scale(2)" d="M0 0A5 5 0 1 0 10 0"/></svg>"#,
        );
        assert_eq!(doc.attr(path, "d"), Some("M0 0A10 10 0 1 0 20 0"));
    }

    #[test]
    fn test_arc_under_skew_bails_out() {
        let (doc, path) = apply(
            r#"<svg><path transform="skewX(10)" d="M0 0A5 5 0 1 0 10 0"/></svg>"#,
        );
        assert!(doc.has_attr(path, "transform"));
        assert_eq!(doc.attr(path, "d"), Some("M0 0A5 5 0 1 0 10 0"));
    }

    #[test]
    fn test_url_paint_bails_out() {
        let (doc, path) = apply(
            r#"<svg><path transform="translate(1)" fill="url(#grad)" d="M0 0L1 1"/></svg>"#,
        );
        assert!(doc.has_attr(path, "transform"));
    }

    #[test]
    fn test_stroke_width_rescaled() {
        let (doc, path) = apply(
            r#"<svg><path transform="scale(3)" stroke-width="2" d="M0 0L1 1"/></svg>"#,
        );
        assert_eq!(doc.attr(path, "stroke-width"), Some("6"));
    }

    #[test]
    fn test_initial_relative_move_is_absolute() {
        let (doc, path) =
            apply(r#"<svg><path transform="translate(10 10)" d="m5 5l1 1"/></svg>"#);
        assert_eq!(doc.attr(path, "d"), Some("m15 15l1 1"));
    }
}
