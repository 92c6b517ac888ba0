//! SVG path data: segment model, tolerant parser, compact writer.
//!
//! Supports the full command set: M, L, H, V, C, S, Q, T, A, Z in absolute
//! and relative form. The parser accepts comma or whitespace separators,
//! implicit command repetition (including the implicit LineTo after a
//! MoveTo) and compressed arc flags. Trailing garbage truncates the path
//! instead of failing; the passes operate on whatever parsed.

mod matrix;

pub use matrix::{Matrix, parse_transform_list};

/// Path command kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move,
    Line,
    Horizontal,
    Vertical,
    Cubic,
    SmoothCubic,
    Quadratic,
    SmoothQuadratic,
    Arc,
    Close,
}

impl Command {
    /// Number of arguments one segment of this command consumes.
    pub fn arity(self) -> usize {
        match self {
            Command::Move | Command::Line | Command::SmoothQuadratic => 2,
            Command::Horizontal | Command::Vertical => 1,
            Command::Cubic => 6,
            Command::SmoothCubic | Command::Quadratic => 4,
            Command::Arc => 7,
            Command::Close => 0,
        }
    }

    fn from_letter(c: u8) -> Option<(Command, bool)> {
        let command = match c.to_ascii_uppercase() {
            b'M' => Command::Move,
            b'L' => Command::Line,
            b'H' => Command::Horizontal,
            b'V' => Command::Vertical,
            b'C' => Command::Cubic,
            b'S' => Command::SmoothCubic,
            b'Q' => Command::Quadratic,
            b'T' => Command::SmoothQuadratic,
            b'A' => Command::Arc,
            b'Z' => Command::Close,
            _ => return None,
        };
        Some((command, c.is_ascii_lowercase()))
    }

    fn letter(self, relative: bool) -> char {
        let upper = match self {
            Command::Move => 'M',
            Command::Line => 'L',
            Command::Horizontal => 'H',
            Command::Vertical => 'V',
            Command::Cubic => 'C',
            Command::SmoothCubic => 'S',
            Command::Quadratic => 'Q',
            Command::SmoothQuadratic => 'T',
            Command::Arc => 'A',
            Command::Close => 'Z',
        };
        if relative {
            upper.to_ascii_lowercase()
        } else {
            upper
        }
    }
}

/// One parsed path segment with canonical argument count.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub command: Command,
    pub relative: bool,
    pub args: Vec<f64>,
}

impl Segment {
    pub fn new(command: Command, relative: bool, args: Vec<f64>) -> Self {
        Self {
            command,
            relative,
            args,
        }
    }
}

// ----------------------------------------------------------------------
// Parser
// ----------------------------------------------------------------------

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            bytes: data.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Parse a number: sign, integer/fraction digits, optional exponent.
    fn next_number(&mut self) -> Option<f64> {
        self.skip_separators();
        let start = self.pos;
        let mut pos = self.pos;

        if matches!(self.bytes.get(pos), Some(b'+') | Some(b'-')) {
            pos += 1;
        }
        let mut digits = 0;
        while matches!(self.bytes.get(pos), Some(b) if b.is_ascii_digit()) {
            pos += 1;
            digits += 1;
        }
        if self.bytes.get(pos) == Some(&b'.') {
            pos += 1;
            while matches!(self.bytes.get(pos), Some(b) if b.is_ascii_digit()) {
                pos += 1;
                digits += 1;
            }
        }
        if digits == 0 {
            return None;
        }
        if matches!(self.bytes.get(pos), Some(b'e') | Some(b'E')) {
            let mut exp = pos + 1;
            if matches!(self.bytes.get(exp), Some(b'+') | Some(b'-')) {
                exp += 1;
            }
            if matches!(self.bytes.get(exp), Some(b) if b.is_ascii_digit()) {
                pos = exp;
                while matches!(self.bytes.get(pos), Some(b) if b.is_ascii_digit()) {
                    pos += 1;
                }
            }
        }

        let text = std::str::from_utf8(&self.bytes[start..pos]).ok()?;
        let value = text.parse().ok()?;
        self.pos = pos;
        Some(value)
    }

    /// Arc flags are a single `0` or `1`, possibly run together with the
    /// following number.
    fn next_flag(&mut self) -> Option<f64> {
        self.skip_separators();
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Some(0.0)
            }
            Some(b'1') => {
                self.pos += 1;
                Some(1.0)
            }
            _ => None,
        }
    }
}

/// Parse a `d` attribute into segments. Never fails; unparsable input
/// truncates the segment list at the last well-formed point.
pub fn parse_path_data(data: &str) -> Vec<Segment> {
    let mut lexer = Lexer::new(data);
    let mut segments = Vec::new();
    let mut current: Option<(Command, bool)> = None;

    loop {
        lexer.skip_separators();
        let Some(byte) = lexer.peek() else { break };

        if byte.is_ascii_alphabetic() {
            let Some(parsed) = Command::from_letter(byte) else {
                break;
            };
            lexer.pos += 1;
            current = Some(parsed);
            if parsed.0 == Command::Close {
                segments.push(Segment::new(Command::Close, parsed.1, Vec::new()));
                current = None;
                continue;
            }
        } else if current.is_none() {
            // Leading digits without a command; nothing sensible to do.
            break;
        }

        let Some((command, relative)) = current else {
            break;
        };

        let mut args = Vec::with_capacity(command.arity());
        let mut complete = true;
        for slot in 0..command.arity() {
            let value = if command == Command::Arc && (slot == 3 || slot == 4) {
                lexer.next_flag()
            } else {
                lexer.next_number()
            };
            match value {
                Some(v) => args.push(v),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            break;
        }
        segments.push(Segment::new(command, relative, args));

        // Implicit repetition: an argument group after MoveTo is a LineTo
        // of the same relativity.
        if command == Command::Move {
            current = Some((Command::Line, relative));
        }
    }

    segments
}

// ----------------------------------------------------------------------
// Writer
// ----------------------------------------------------------------------

/// Format a coordinate with the given decimal precision, SVG-compact:
/// trailing zeros trimmed, `0.5` as `.5`, `-0` as `0`.
pub fn format_number(value: f64, precision: u32) -> String {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };

    let mut text = format!("{:.*}", precision as usize, rounded);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if let Some(stripped) = text.strip_prefix("0.") {
        text = format!(".{stripped}");
    } else if let Some(stripped) = text.strip_prefix("-0.") {
        text = format!("-.{stripped}");
    }
    text
}

/// Serialize segments back to a compact `d` string.
///
/// Repeated commands other than MoveTo drop the redundant letter; numbers
/// are separated by a single space, omitted before a leading minus sign.
pub fn write_path_data(segments: &[Segment], precision: u32) -> String {
    let mut out = String::new();
    let mut previous: Option<char> = None;

    for segment in segments {
        let letter = segment.command.letter(segment.relative);
        let write_letter = previous != Some(letter) || segment.command == Command::Move;
        if write_letter {
            out.push(letter);
        }
        for (i, &arg) in segment.args.iter().enumerate() {
            let text = format_number(arg, precision);
            let need_separator = if i == 0 { !write_letter } else { true };
            if need_separator && !text.starts_with('-') {
                out.push(' ');
            }
            out.push_str(&text);
        }
        previous = Some(letter);
    }

    out
}

// ----------------------------------------------------------------------
// Geometry
// ----------------------------------------------------------------------

/// Coarse bounding box over every control and end point a path touches.
///
/// Curves may overshoot their control polygon slightly less than this box,
/// never more, which is the conservative direction for off-canvas removal.
/// Returns `None` for paths with no coordinates.
pub fn approximate_bbox(segments: &[Segment]) -> Option<(f64, f64, f64, f64)> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    let mut include = |x: f64, y: f64, b: &mut Option<(f64, f64, f64, f64)>| {
        *b = Some(match *b {
            None => (x, y, x, y),
            Some((minx, miny, maxx, maxy)) => {
                (minx.min(x), miny.min(y), maxx.max(x), maxy.max(y))
            }
        });
    };

    let mut cur = (0.0f64, 0.0f64);
    let mut start = (0.0f64, 0.0f64);

    for segment in segments {
        let rel = segment.relative;
        let base = if rel { cur } else { (0.0, 0.0) };
        match segment.command {
            Command::Move | Command::Line | Command::SmoothQuadratic => {
                cur = (base.0 + segment.args[0], base.1 + segment.args[1]);
                include(cur.0, cur.1, &mut bounds);
                if segment.command == Command::Move {
                    start = cur;
                }
            }
            Command::Horizontal => {
                cur.0 = base.0 + segment.args[0];
                include(cur.0, cur.1, &mut bounds);
            }
            Command::Vertical => {
                cur.1 = base.1 + segment.args[0];
                include(cur.0, cur.1, &mut bounds);
            }
            Command::Cubic | Command::SmoothCubic | Command::Quadratic => {
                for pair in segment.args.chunks(2) {
                    include(base.0 + pair[0], base.1 + pair[1], &mut bounds);
                }
                let n = segment.args.len();
                cur = (base.0 + segment.args[n - 2], base.1 + segment.args[n - 1]);
            }
            Command::Arc => {
                let (rx, ry) = (segment.args[0].abs(), segment.args[1].abs());
                let end = (base.0 + segment.args[5], base.1 + segment.args[6]);
                // Conservative: the arc stays within max radius of chord ends.
                for &(x, y) in &[cur, end] {
                    include(x - rx, y - ry, &mut bounds);
                    include(x + rx, y + ry, &mut bounds);
                }
                cur = end;
            }
            Command::Close => {
                cur = start;
            }
        }
    }

    bounds
}
