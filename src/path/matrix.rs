//! Affine transforms and `transform` attribute parsing.

const EPSILON: f64 = 1e-9;

/// 2D affine matrix in SVG column layout:
///
/// ```text
/// | a c e |
/// | b d f |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Matrix {
        Matrix {
            e: tx,
            f: ty,
            ..Matrix::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Matrix {
        Matrix {
            a: sx,
            d: sy,
            ..Matrix::IDENTITY
        }
    }

    pub fn rotate(degrees: f64) -> Matrix {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn rotate_around(degrees: f64, cx: f64, cy: f64) -> Matrix {
        Matrix::translate(cx, cy)
            .multiply(Matrix::rotate(degrees))
            .multiply(Matrix::translate(-cx, -cy))
    }

    pub fn skew_x(degrees: f64) -> Matrix {
        Matrix {
            c: degrees.to_radians().tan(),
            ..Matrix::IDENTITY
        }
    }

    pub fn skew_y(degrees: f64) -> Matrix {
        Matrix {
            b: degrees.to_radians().tan(),
            ..Matrix::IDENTITY
        }
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn multiply(self, other: Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Transform a vector (linear part only, no translation). Used for
    /// relative path coordinates.
    pub fn apply_vector(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y, self.b * x + self.d * y)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// No rotation or skew component.
    pub fn is_axis_aligned(&self) -> bool {
        self.b.abs() < EPSILON && self.c.abs() < EPSILON
    }

    /// Rotation plus uniform scale (angles and circles are preserved up to
    /// scaling). The only class of transforms arc radii survive intact.
    pub fn is_conformal(&self) -> bool {
        let columns_orthogonal = (self.a * self.c + self.b * self.d).abs() < EPSILON;
        let norms_equal = ((self.a * self.a + self.b * self.b)
            - (self.c * self.c + self.d * self.d))
            .abs()
            < EPSILON;
        columns_orthogonal && norms_equal
    }

    /// Uniform length scale factor, meaningful for conformal matrices.
    pub fn scale_factor(&self) -> f64 {
        self.determinant().abs().sqrt()
    }

    /// Rotation angle in degrees, meaningful for conformal matrices.
    pub fn rotation_degrees(&self) -> f64 {
        self.b.atan2(self.a).to_degrees()
    }
}

/// Parse a `transform` attribute value into a single composed matrix.
///
/// Handles `matrix`, `translate`, `scale`, `rotate`, `skewX`, `skewY` in
/// any sequence. Returns `None` on anything malformed so callers can leave
/// the attribute untouched.
pub fn parse_transform_list(value: &str) -> Option<Matrix> {
    let mut matrix = Matrix::IDENTITY;
    let mut rest = value.trim();

    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = rest[open..].find(')')? + open;
        let name = rest[..open].trim();
        let args: Vec<f64> = rest[open + 1..close]
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;

        let next = match (name, args.as_slice()) {
            ("matrix", [a, b, c, d, e, f]) => Matrix {
                a: *a,
                b: *b,
                c: *c,
                d: *d,
                e: *e,
                f: *f,
            },
            ("translate", [tx]) => Matrix::translate(*tx, 0.0),
            ("translate", [tx, ty]) => Matrix::translate(*tx, *ty),
            ("scale", [s]) => Matrix::scale(*s, *s),
            ("scale", [sx, sy]) => Matrix::scale(*sx, *sy),
            ("rotate", [deg]) => Matrix::rotate(*deg),
            ("rotate", [deg, cx, cy]) => Matrix::rotate_around(*deg, *cx, *cy),
            ("skewX", [deg]) => Matrix::skew_x(*deg),
            ("skewY", [deg]) => Matrix::skew_y(*deg),
            _ => return None,
        };
        matrix = matrix.multiply(next);

        rest = rest[close + 1..].trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }

    Some(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-6 && (actual.1 - expected.1).abs() < 1e-6,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_translate_then_scale_order() {
        // SVG semantics: scale applies to the point first, translate last.
        let m = parse_transform_list("translate(10 20) scale(2)").unwrap();
        assert_close(m.apply(1.0, 1.0), (12.0, 22.0));
    }

    #[test]
    fn test_rotate_around_pivot() {
        let m = parse_transform_list("rotate(90 10 10)").unwrap();
        assert_close(m.apply(20.0, 10.0), (10.0, 20.0));
    }

    #[test]
    fn test_matrix_function() {
        let m = parse_transform_list("matrix(1,0,0,1,5,-5)").unwrap();
        assert_close(m.apply(0.0, 0.0), (5.0, -5.0));
    }

    #[test]
    fn test_conformal_classification() {
        assert!(parse_transform_list("rotate(30) scale(2)").unwrap().is_conformal());
        assert!(!parse_transform_list("scale(2 1)").unwrap().is_conformal());
        assert!(!parse_transform_list("skewX(10)").unwrap().is_conformal());
    }

    #[test]
    fn test_malformed_is_none() {
        assert!(parse_transform_list("rotate(").is_none());
        assert!(parse_transform_list("frobnicate(1)").is_none());
        assert!(parse_transform_list("scale(1 2 3)").is_none());
    }

    #[test]
    fn test_scale_factor() {
        let m = parse_transform_list("rotate(45) scale(3)").unwrap();
        assert!((m.scale_factor() - 3.0).abs() < 1e-6);
        assert!((m.rotation_degrees() - 45.0).abs() < 1e-6);
    }
}
