//! A small cairo-style drawing surface that writes SVG.
//!
//! Paths are built with `move_to`/`line_to`/`arc` and emitted on `stroke` or
//! `fill`. Transforms live on a save/restore stack and are written out as a
//! `transform` attribute on every element drawn while they are active, so a
//! path has to be finished under the transform it was started in.

use std::f32::consts::{PI, TAU};

use crate::layout::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    fn as_str(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TransformOp {
    Translate(f32, f32),
    Rotate(f32),
}

#[derive(Debug, Clone, PartialEq)]
struct GraphicsState {
    transform: Vec<TransformOp>,
    line_width: f32,
    line_cap: LineCap,
    source: (u8, u8, u8),
    font_face: String,
    font_size: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Vec::new(),
            line_width: 2.0,
            line_cap: LineCap::Butt,
            source: (0, 0, 0),
            font_face: "sans-serif".to_string(),
            font_size: 10.0,
        }
    }
}

pub struct SvgSurface {
    width: f32,
    height: f32,
    body: String,
    path: String,
    current: Option<Point>,
    subpath_start: Option<Point>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl SvgSurface {
    /// A surface `width` × `height` millimetres; one user unit is one millimetre.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            path: String::new(),
            current: None,
            subpath_start: None,
            state: GraphicsState::default(),
            saved: Vec::new(),
        }
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn set_source_rgb(&mut self, r: f32, g: f32, b: f32) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.state.source = (channel(r), channel(g), channel(b));
    }

    pub fn select_font_face(&mut self, face: &str) {
        self.state.font_face = face.to_string();
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.state.font_size = size;
    }

    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    /// Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transform.push(TransformOp::Translate(dx, dy));
    }

    /// Rotate by `angle` radians, clockwise on screen.
    pub fn rotate(&mut self, angle: f32) {
        self.state.transform.push(TransformOp::Rotate(angle));
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.path.push_str(&format!("M{} {} ", num(x), num(y)));
        let point = Point::new(x, y);
        self.current = Some(point);
        self.subpath_start = Some(point);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        self.path.push_str(&format!("L{} {} ", num(x), num(y)));
        self.current = Some(Point::new(x, y));
    }

    /// Clockwise arc from `angle1` to `angle2`. Like cairo, a line joins the
    /// current point to the start of the arc, and `angle2` is wrapped forward
    /// until it is not less than `angle1`.
    pub fn arc(&mut self, cx: f32, cy: f32, radius: f32, angle1: f32, mut angle2: f32) {
        while angle2 < angle1 {
            angle2 += TAU;
        }

        let point_at = |angle: f32| Point::new(cx + radius * angle.cos(), cy + radius * angle.sin());
        let start = point_at(angle1);
        if self.current.is_some() {
            self.line_to(start.x, start.y);
        } else {
            self.move_to(start.x, start.y);
        }

        // SVG arcs are ambiguous at half a turn or more, so split the sweep.
        let sweep = angle2 - angle1;
        let segments = (sweep / PI).ceil().max(1.0) as u32;
        let step = sweep / segments as f32;
        for segment in 1..=segments {
            let end = point_at(angle1 + step * segment as f32);
            self.path.push_str(&format!(
                "A{r} {r} 0 0 1 {} {} ",
                num(end.x),
                num(end.y),
                r = num(radius)
            ));
            self.current = Some(end);
        }
    }

    /// A full circle as its own closed subpath.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32) {
        self.current = None;
        self.arc(cx, cy, radius, 0.0, TAU);
        self.close_path();
    }

    pub fn close_path(&mut self) {
        if self.current.is_some() {
            self.path.push_str("Z ");
            self.current = self.subpath_start;
        }
    }

    pub fn stroke(&mut self) {
        if let Some(d) = self.take_path() {
            let (r, g, b) = self.state.source;
            self.body.push_str(&format!(
                r#"<path d="{}" fill="none" stroke="rgb({},{},{})" stroke-width="{}" stroke-linecap="{}"{} />"#,
                d,
                r,
                g,
                b,
                num(self.state.line_width),
                self.state.line_cap.as_str(),
                self.transform_attr(),
            ));
            self.body.push('\n');
        }
    }

    pub fn fill(&mut self) {
        if let Some(d) = self.take_path() {
            let (r, g, b) = self.state.source;
            self.body.push_str(&format!(
                r#"<path d="{}" fill="rgb({},{},{})" stroke="none"{} />"#,
                d,
                r,
                g,
                b,
                self.transform_attr(),
            ));
            self.body.push('\n');
        }
    }

    /// Draw `text` with its baseline starting at the current point.
    pub fn show_text(&mut self, text: &str) {
        let origin = self.current.unwrap_or(Point::new(0.0, 0.0));
        let (r, g, b) = self.state.source;
        self.body.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="rgb({},{},{})"{}>{}</text>"#,
            num(origin.x),
            num(origin.y),
            escape_xml(&font_family_list(&self.state.font_face)),
            num(self.state.font_size),
            r,
            g,
            b,
            self.transform_attr(),
            escape_xml(text),
        ));
        self.body.push('\n');
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }

    pub fn finish(self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">
{body}</svg>
"#,
            w = num(self.width),
            h = num(self.height),
            body = self.body,
        )
    }

    fn take_path(&mut self) -> Option<String> {
        self.current = None;
        self.subpath_start = None;
        let d = self.path.trim_end().to_string();
        self.path.clear();
        if d.is_empty() { None } else { Some(d) }
    }

    fn transform_attr(&self) -> String {
        if self.state.transform.is_empty() {
            return String::new();
        }
        let ops: Vec<String> = self
            .state
            .transform
            .iter()
            .map(|op| match op {
                TransformOp::Translate(dx, dy) => format!("translate({} {})", num(*dx), num(*dy)),
                TransformOp::Rotate(angle) => format!("rotate({})", num(angle.to_degrees())),
            })
            .collect();
        format!(r#" transform="{}""#, ops.join(" "))
    }
}

/// The requested face first, then a generic fallback for viewers that lack it.
///
/// Names that are not a plain identifier are written as a CSS string.
fn font_family_list(face: &str) -> String {
    let face = face.trim();
    let plain = !face.starts_with(|c: char| c.is_ascii_digit())
        && face
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if plain {
        format!("{}, sans-serif", face)
    } else {
        let quoted = face.replace('\\', "\\\\").replace('\'', "\\'");
        format!("'{}', sans-serif", quoted)
    }
}

/// Numbers with at most three decimals and no trailing zeros.
fn num(value: f32) -> String {
    let mut s = format!("{:.3}", value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// XML 1.0 valid char ranges:
/// - 0x09, 0x0A, 0x0D
/// - 0x20..=0xD7FF
/// - 0xE000..=0xFFFD
/// - 0x10000..=0x10FFFF
fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|&c| is_valid_xml_char(c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_family_quotes_awkward_names() {
        assert_eq!(font_family_list("Arial"), "Arial, sans-serif");
        assert_eq!(
            font_family_list("Microsoft YaHei"),
            "'Microsoft YaHei', sans-serif"
        );
        assert_eq!(font_family_list("O'Brien Sans"), r"'O\'Brien Sans', sans-serif");
        assert_eq!(font_family_list(r"Back\slash"), r"'Back\\slash', sans-serif");
        assert_eq!(font_family_list("8bit"), "'8bit', sans-serif");
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(11.0), "11");
        assert_eq!(num(7.3333335), "7.333");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.0001), "0");
    }

    #[test]
    fn document_uses_millimetres() {
        let svg = SvgSurface::new(198.0, 213.6).finish();
        assert!(svg.contains(r#"width="198mm""#));
        assert!(svg.contains(r#"height="213.6mm""#));
        assert!(svg.contains(r#"viewBox="0 0 198 213.6""#));
    }

    #[test]
    fn stroke_emits_path_and_clears_it() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.set_line_cap(LineCap::Round);
        surface.set_line_width(1.5);
        surface.move_to(1.0, 2.0);
        surface.line_to(1.0, 8.0);
        surface.stroke();
        surface.stroke();

        let svg = surface.finish();
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains(r#"d="M1 2 L1 8""#));
        assert!(svg.contains(r#"stroke-width="1.5""#));
        assert!(svg.contains(r#"stroke-linecap="round""#));
    }

    #[test]
    fn line_to_without_current_point_moves() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.line_to(3.0, 4.0);
        surface.stroke();
        assert!(surface.finish().contains(r#"d="M3 4""#));
    }

    #[test]
    fn arc_connects_from_current_point() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.move_to(0.0, 5.0);
        surface.arc(5.0, 5.0, 5.0, PI, 3.0 * PI / 2.0);
        surface.stroke();
        let svg = surface.finish();
        assert!(svg.contains("M0 5 L0 5 A5 5 0 0 1 5 0"));
    }

    #[test]
    fn full_circle_is_split_into_two_arcs() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.circle(5.0, 5.0, 2.0);
        surface.fill();
        let svg = surface.finish();
        assert!(svg.contains(r#"d="M7 5 A2 2 0 0 1 3 5 A2 2 0 0 1 7 5 Z""#));
        assert!(svg.contains(r#"fill="rgb(0,0,0)""#));
    }

    #[test]
    fn restore_drops_transforms() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.save();
        surface.translate(2.0, 3.0);
        surface.rotate(PI);
        surface.move_to(0.0, 0.0);
        surface.show_text("A");
        surface.restore();
        surface.move_to(1.0, 1.0);
        surface.show_text("B");

        let svg = surface.finish();
        assert!(svg.contains(r#"transform="translate(2 3) rotate(180)">A</text>"#));
        assert!(svg.contains(r#"fill="rgb(0,0,0)">B</text>"#));
    }

    #[test]
    fn text_is_escaped() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.select_font_face("Noto Sans");
        surface.move_to(0.0, 0.0);
        surface.show_text("<1&2>\u{0007}");
        let svg = surface.finish();
        assert!(svg.contains("&lt;1&amp;2&gt;</text>"));
        assert!(svg.contains(r#"font-family="'Noto Sans', sans-serif""#));
    }
}
