use crate::model::Vec2;
use std::fmt::Write;

/// Coordinate formatting for path data and attributes. `-0` prints as `0`
/// and non-finite values never reach the output.
pub fn num(v: f32) -> String {
    if !v.is_finite() || v == 0.0 {
        return "0".to_string();
    }
    format!("{}", v)
}

/// Builder for the `d` attribute of a `<path>`.
#[derive(Default)]
pub struct PathData {
    d: String,
}

impl PathData {
    pub fn new() -> Self {
        PathData { d: String::new() }
    }

    fn cmd(&mut self, c: char, pts: &[Vec2]) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push(c);
        for (i, p) in pts.iter().enumerate() {
            if i > 0 {
                self.d.push(' ');
            }
            let _ = write!(self.d, "{},{}", num(p.x), num(p.y));
        }
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.cmd('M', &[p]);
    }
    pub fn line_to(&mut self, p: Vec2) {
        self.cmd('L', &[p]);
    }
    pub fn quad_to(&mut self, c: Vec2, p: Vec2) {
        self.cmd('Q', &[c, p]);
    }
    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) {
        self.cmd('C', &[c1, c2, p]);
    }

    pub fn finish(self) -> String {
        self.d
    }
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Space-joined class attribute value; empty entries are dropped.
pub fn class_list<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for c in classes.into_iter().map(str::trim).filter(|c| !c.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(c);
    }
    escape_attr(&out)
}

/// Parse path data produced by [`PathData`] back into (command, numbers).
/// Used by tests and the bench to check outputs stay well-formed.
pub fn parse_path(d: &str) -> Option<Vec<(char, Vec<f32>)>> {
    let mut out: Vec<(char, Vec<f32>)> = Vec::new();
    for tok in d.split(|c: char| c == ' ' || c == ',').filter(|t| !t.is_empty()) {
        let first = tok.chars().next()?;
        if first.is_ascii_alphabetic() {
            out.push((first, Vec::new()));
            let rest = &tok[first.len_utf8()..];
            if !rest.is_empty() {
                out.last_mut()?.1.push(rest.parse().ok()?);
            }
        } else {
            out.last_mut()?.1.push(tok.parse().ok()?);
        }
    }
    let arity_ok = out.iter().all(|(c, n)| match c {
        'M' | 'L' => n.len() == 2,
        'Q' => n.len() == 4,
        'C' => n.len() == 6,
        _ => false,
    });
    if out.first().map(|(c, _)| *c) == Some('M') && arity_ok {
        Some(out)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_and_nan_print_as_zero() {
        assert_eq!(num(-0.0), "0");
        assert_eq!(num(f32::NAN), "0");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(100.0), "100");
    }

    #[test]
    fn path_data_roundtrips_through_parser() {
        let mut d = PathData::new();
        d.move_to(Vec2::new(0.0, 0.0));
        d.cubic_to(Vec2::new(50.0, 0.0), Vec2::new(150.0, 0.0), Vec2::new(200.0, -3.5));
        let s = d.finish();
        assert_eq!(s, "M0,0 C50,0 150,0 200,-3.5");
        let parsed = parse_path(&s).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].1, vec![50.0, 0.0, 150.0, 0.0, 200.0, -3.5]);
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_text("a<b & c"), "a&lt;b &amp; c");
        assert_eq!(escape_attr("\"x\""), "&quot;x&quot;");
        assert_eq!(class_list(["a", "", " b "]), "a b");
    }
}
