//! Immutable board configuration.
//!
//! A [`BoardConfig`] is built from defaults and changed through `with_*`
//! functions that consume the old value and return a validated new one, so a
//! config that exists is always a config that can be laid out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationStyle, parse_annotation};
use crate::error::{GobanError, Result, invalid};

pub const DEFAULT_SIZE: u32 = 9;
pub const DEFAULT_THIN_LINE: f32 = 1.0;
pub const DEFAULT_THICK_LINE: f32 = 2.0;
pub const DEFAULT_LINE_SPACING: (f32, f32) = (22.0, 23.7);
pub const DEFAULT_BORDER_SPACING: (f32, f32) = (11.0, 12.0);
pub const DEFAULT_STAR_POINT_DIAMETER: f32 = 4.0;
pub const DEFAULT_FONT_FACE: &str = "Microsoft YaHei";
pub const DEFAULT_FONT_SIZE: f32 = 8.0;

/// Corner distance used by [`StarPointPlacement::Auto`].
pub const AUTO_CORNER_DISTANCE: u32 = 3;

/// Number of vertical (`cols`) and horizontal (`rows`) grid lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSize {
    pub cols: u32,
    pub rows: u32,
}

impl GridSize {
    pub fn new(cols: u32, rows: u32) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(invalid(format!(
                "Board size must be at least 1x1, got {}x{}",
                cols, rows
            )));
        }
        Ok(Self { cols, rows })
    }

    pub fn square(size: u32) -> Result<Self> {
        Self::new(size, size)
    }

    /// Build from loosely typed components, as found in config files.
    pub fn from_components(components: &[i64]) -> Result<Self> {
        let to_u32 = |v: i64| {
            u32::try_from(v).map_err(|_| invalid(format!("Board size {} is out of range", v)))
        };
        match components {
            [size] => Self::square(to_u32(*size)?),
            [cols, rows] => Self::new(to_u32(*cols)?, to_u32(*rows)?),
            _ => Err(invalid(format!(
                "Board size must be two-dimensional, got {} values",
                components.len()
            ))),
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

impl FromStr for GridSize {
    type Err = GobanError;

    /// Accepts `9` for a square board or `13x9` / `13,9` for a rectangular one.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s
            .split(|c: char| c == 'x' || c == 'X' || c == ',')
            .map(str::trim)
            .collect();
        let mut components = Vec::with_capacity(parts.len());
        for part in parts {
            let value = part.parse::<i64>().map_err(|_| {
                invalid(format!("Board size must be an integer or a pair of integers, got '{}'", s))
            })?;
            components.push(value);
        }
        Self::from_components(&components)
    }
}

/// A pair of lengths in millimetres along x and y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spacing {
    pub x: f32,
    pub y: f32,
}

impl Spacing {
    pub fn new(x: f32, y: f32) -> Result<Self> {
        Ok(Self {
            x: positive("spacing", x)?,
            y: positive("spacing", y)?,
        })
    }

    pub fn uniform(value: f32) -> Result<Self> {
        Self::new(value, value)
    }

    pub fn from_components(components: &[f32]) -> Result<Self> {
        match components {
            [value] => Self::uniform(*value),
            [x, y] => Self::new(*x, *y),
            _ => Err(invalid(format!(
                "Spacing must be a number or a pair of numbers, got {} values",
                components.len()
            ))),
        }
    }
}

impl FromStr for Spacing {
    type Err = GobanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_components(&parse_floats(s)?)
    }
}

/// Stroke widths of the inner grid lines and of the outermost lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineWidths {
    pub thin: f32,
    pub thick: f32,
}

impl LineWidths {
    /// Order doesn't matter, the smaller value becomes the thin width.
    pub fn new(a: f32, b: f32) -> Result<Self> {
        let a = positive("line width", a)?;
        let b = positive("line width", b)?;
        Ok(Self {
            thin: a.min(b),
            thick: a.max(b),
        })
    }
}

impl FromStr for LineWidths {
    type Err = GobanError;

    fn from_str(s: &str) -> Result<Self> {
        match parse_floats(s)?.as_slice() {
            [width] => Self::new(*width, *width),
            [a, b] => Self::new(*a, *b),
            other => Err(invalid(format!(
                "Line widths must be a pair of numbers, got {} values",
                other.len()
            ))),
        }
    }
}

/// A 1-indexed grid intersection, counted from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct GridPoint {
    pub x: u32,
    pub y: u32,
}

impl GridPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for GridPoint {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl From<GridPoint> for (u32, u32) {
    fn from(point: GridPoint) -> Self {
        (point.x, point.y)
    }
}

/// Where star points go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StarPointPlacement {
    /// Corner points on the 3-lines, plus centre and side centres where the grid allows.
    #[default]
    Auto,
    /// Like `Auto` but with the corner points on the given line instead of the 3-line.
    Corner(u32),
    /// Exactly these intersections, in this order.
    Explicit(Vec<GridPoint>),
}

impl FromStr for StarPointPlacement {
    type Err = GobanError;

    /// `auto`, `none`, a corner distance like `4`, or a list like `3,3;7,7`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(StarPointPlacement::Auto);
        }
        if trimmed.eq_ignore_ascii_case("none") || trimmed.is_empty() {
            return Ok(StarPointPlacement::Explicit(Vec::new()));
        }
        if let Ok(distance) = trimmed.parse::<u32>() {
            return Ok(StarPointPlacement::Corner(distance));
        }

        let mut points = Vec::new();
        for item in trimmed.split(';').map(str::trim).filter(|i| !i.is_empty()) {
            let coords: Vec<&str> = item.split(',').map(str::trim).collect();
            let [x, y] = coords.as_slice() else {
                return Err(invalid(format!(
                    "Star point '{}' must be written as x,y",
                    item
                )));
            };
            let parse = |v: &str| {
                v.parse::<u32>()
                    .map_err(|_| invalid(format!("Star point coordinate '{}' is not an integer", v)))
            };
            points.push(GridPoint::new(parse(*x)?, parse(*y)?));
        }
        Ok(StarPointPlacement::Explicit(points))
    }
}

/// Everything needed to lay out one board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardConfig {
    size: GridSize,
    line_widths: LineWidths,
    line_spacing: Spacing,
    border_spacing: Spacing,
    star_point_diameter: f32,
    star_points: StarPointPlacement,
    x_annotation: Option<AnnotationStyle>,
    y_annotation: Option<AnnotationStyle>,
    font_face: String,
    font_size: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: GridSize {
                cols: DEFAULT_SIZE,
                rows: DEFAULT_SIZE,
            },
            line_widths: LineWidths {
                thin: DEFAULT_THIN_LINE,
                thick: DEFAULT_THICK_LINE,
            },
            line_spacing: Spacing {
                x: DEFAULT_LINE_SPACING.0,
                y: DEFAULT_LINE_SPACING.1,
            },
            border_spacing: Spacing {
                x: DEFAULT_BORDER_SPACING.0,
                y: DEFAULT_BORDER_SPACING.1,
            },
            star_point_diameter: DEFAULT_STAR_POINT_DIAMETER,
            star_points: StarPointPlacement::Auto,
            x_annotation: None,
            y_annotation: None,
            font_face: DEFAULT_FONT_FACE.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl BoardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn line_widths(&self) -> LineWidths {
        self.line_widths
    }

    pub fn line_spacing(&self) -> Spacing {
        self.line_spacing
    }

    pub fn border_spacing(&self) -> Spacing {
        self.border_spacing
    }

    pub fn star_point_diameter(&self) -> f32 {
        self.star_point_diameter
    }

    pub fn star_points(&self) -> &StarPointPlacement {
        &self.star_points
    }

    pub fn x_annotation(&self) -> Option<AnnotationStyle> {
        self.x_annotation
    }

    pub fn y_annotation(&self) -> Option<AnnotationStyle> {
        self.y_annotation
    }

    pub fn font_face(&self) -> &str {
        &self.font_face
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn with_size(self, size: GridSize) -> Result<Self> {
        Self { size, ..self }.validated()
    }

    pub fn with_line_widths(self, line_widths: LineWidths) -> Result<Self> {
        Self {
            line_widths,
            ..self
        }
        .validated()
    }

    pub fn with_line_spacing(self, line_spacing: Spacing) -> Result<Self> {
        Self {
            line_spacing,
            ..self
        }
        .validated()
    }

    pub fn with_border_spacing(self, border_spacing: Spacing) -> Result<Self> {
        Self {
            border_spacing,
            ..self
        }
        .validated()
    }

    pub fn with_star_point_diameter(self, diameter: f32) -> Result<Self> {
        Self {
            star_point_diameter: diameter,
            ..self
        }
        .validated()
    }

    pub fn with_star_points(self, star_points: StarPointPlacement) -> Result<Self> {
        Self {
            star_points,
            ..self
        }
        .validated()
    }

    pub fn with_annotations(
        self,
        x_annotation: Option<AnnotationStyle>,
        y_annotation: Option<AnnotationStyle>,
    ) -> Result<Self> {
        Self {
            x_annotation,
            y_annotation,
            ..self
        }
        .validated()
    }

    /// Change annotations by style name (`latin_letters`, `none`, ...). An axis
    /// given as `None` keeps its current style.
    pub fn with_annotation_names(self, x: Option<&str>, y: Option<&str>) -> Result<Self> {
        let x_annotation = match x {
            Some(name) => parse_annotation(name)?,
            None => self.x_annotation,
        };
        let y_annotation = match y {
            Some(name) => parse_annotation(name)?,
            None => self.y_annotation,
        };
        self.with_annotations(x_annotation, y_annotation)
    }

    pub fn with_font_face(self, font_face: impl Into<String>) -> Result<Self> {
        Self {
            font_face: font_face.into(),
            ..self
        }
        .validated()
    }

    pub fn with_font_size(self, font_size: f32) -> Result<Self> {
        Self { font_size, ..self }.validated()
    }

    /// Board width and height in millimetres.
    pub fn canvas_size(&self) -> (f32, f32) {
        (
            (self.size.cols - 1) as f32 * self.line_spacing.x + 2.0 * self.border_spacing.x,
            (self.size.rows - 1) as f32 * self.line_spacing.y + 2.0 * self.border_spacing.y,
        )
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        GridSize::new(self.size.cols, self.size.rows)?;
        LineWidths::new(self.line_widths.thin, self.line_widths.thick)?;
        Spacing::new(self.line_spacing.x, self.line_spacing.y)?;
        Spacing::new(self.border_spacing.x, self.border_spacing.y)?;
        positive("star point diameter", self.star_point_diameter)?;
        positive("font size", self.font_size)?;

        if self.font_face.trim().is_empty() {
            return Err(invalid("Font face must not be empty"));
        }

        match &self.star_points {
            StarPointPlacement::Corner(0) => {
                return Err(invalid("Star point corner distance must be at least 1"));
            }
            StarPointPlacement::Explicit(points) => {
                if let Some(point) = points.iter().find(|p| p.x == 0 || p.y == 0) {
                    return Err(invalid(format!(
                        "Star point ({}, {}) is outside the grid, coordinates start at 1",
                        point.x, point.y
                    )));
                }
            }
            _ => {}
        }

        for (axis, style, lines) in [
            ("x", self.x_annotation, self.size.cols),
            ("y", self.y_annotation, self.size.rows),
        ] {
            let Some(style) = style else { continue };
            match style.max_lines() {
                Some(max) if lines > max => {
                    return Err(invalid(format!(
                        "{} annotation {} supports at most {} lines, board has {}",
                        axis, style, max, lines
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid(format!("{} must be a positive number, got {}", name, value)))
    }
}

fn parse_floats(s: &str) -> Result<Vec<f32>> {
    s.split(|c: char| c == ',' || c == 'x' || c == 'X')
        .map(str::trim)
        .map(|part| {
            part.parse::<f32>()
                .map_err(|_| invalid(format!("Expected a number or a pair of numbers, got '{}'", s)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_invalid<T: fmt::Debug>(result: Result<T>) -> bool {
        matches!(result, Err(GobanError::InvalidConfiguration(_)))
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = BoardConfig::default();
        assert_eq!(config.size(), GridSize { cols: 9, rows: 9 });
        assert_eq!(config.line_widths(), LineWidths { thin: 1.0, thick: 2.0 });
        assert_eq!(config.line_spacing(), Spacing { x: 22.0, y: 23.7 });
        assert_eq!(config.border_spacing(), Spacing { x: 11.0, y: 12.0 });
        assert_eq!(config.star_point_diameter(), 4.0);
        assert_eq!(config.star_points(), &StarPointPlacement::Auto);
        assert_eq!(config.x_annotation(), None);
        assert_eq!(config.y_annotation(), None);
        assert_eq!(config.font_size(), 8.0);
    }

    #[test]
    fn size_parses_square_and_rectangular() {
        assert_eq!("13".parse::<GridSize>().unwrap(), GridSize { cols: 13, rows: 13 });
        assert_eq!("13x9".parse::<GridSize>().unwrap(), GridSize { cols: 13, rows: 9 });
        assert_eq!(" 8 , 5 ".parse::<GridSize>().unwrap(), GridSize { cols: 8, rows: 5 });
    }

    #[test]
    fn size_rejects_bad_input() {
        assert!(is_invalid("9.5".parse::<GridSize>()));
        assert!(is_invalid("nine".parse::<GridSize>()));
        assert!(is_invalid("9x9x9".parse::<GridSize>()));
        assert!(is_invalid("0".parse::<GridSize>()));
        assert!(is_invalid("9x0".parse::<GridSize>()));
        assert!(is_invalid("-3".parse::<GridSize>()));
        assert!(is_invalid(GridSize::from_components(&[])));
    }

    #[test]
    fn line_widths_are_order_normalized() {
        let widths = LineWidths::new(2.5, 0.5).unwrap();
        assert_eq!(widths, LineWidths { thin: 0.5, thick: 2.5 });
        assert!(is_invalid(LineWidths::new(0.0, 1.0)));
    }

    #[test]
    fn spacing_accepts_single_value_or_pair() {
        assert_eq!("22".parse::<Spacing>().unwrap(), Spacing { x: 22.0, y: 22.0 });
        assert_eq!("22,23.7".parse::<Spacing>().unwrap(), Spacing { x: 22.0, y: 23.7 });
        assert!(is_invalid("22,23,24".parse::<Spacing>()));
        assert!(is_invalid("-1".parse::<Spacing>()));
        assert!(is_invalid(Spacing::new(f32::NAN, 1.0)));
    }

    #[test]
    fn with_functions_leave_other_fields_untouched() {
        let base = BoardConfig::default();
        let changed = base
            .clone()
            .with_size(GridSize::new(13, 13).unwrap())
            .unwrap();
        assert_eq!(changed.size(), GridSize { cols: 13, rows: 13 });
        assert_eq!(changed.line_spacing(), base.line_spacing());
        assert_eq!(base.size(), GridSize { cols: 9, rows: 9 });
    }

    #[test]
    fn explicit_star_points_round_trip() {
        let points = vec![GridPoint::new(2, 2), GridPoint::new(3, 4), GridPoint::new(2, 2)];
        let config = BoardConfig::default()
            .with_star_points(StarPointPlacement::Explicit(points.clone()))
            .unwrap();
        assert_eq!(config.star_points(), &StarPointPlacement::Explicit(points));
    }

    #[test]
    fn star_points_parse_from_text() {
        assert_eq!("auto".parse::<StarPointPlacement>().unwrap(), StarPointPlacement::Auto);
        assert_eq!("4".parse::<StarPointPlacement>().unwrap(), StarPointPlacement::Corner(4));
        assert_eq!(
            "2,2; 3,4".parse::<StarPointPlacement>().unwrap(),
            StarPointPlacement::Explicit(vec![GridPoint::new(2, 2), GridPoint::new(3, 4)])
        );
        assert_eq!(
            "none".parse::<StarPointPlacement>().unwrap(),
            StarPointPlacement::Explicit(Vec::new())
        );
        assert!(is_invalid("2,2,2".parse::<StarPointPlacement>()));
    }

    #[test]
    fn zero_star_point_coordinates_are_rejected() {
        let result = BoardConfig::default()
            .with_star_points(StarPointPlacement::Explicit(vec![GridPoint::new(0, 3)]));
        assert!(is_invalid(result));
        assert!(is_invalid(
            BoardConfig::default().with_star_points(StarPointPlacement::Corner(0))
        ));
    }

    #[test]
    fn letters_are_rejected_on_boards_longer_than_the_alphabet() {
        let config = BoardConfig::default()
            .with_size(GridSize::new(26, 9).unwrap())
            .unwrap();
        assert!(is_invalid(
            config
                .clone()
                .with_annotations(Some(AnnotationStyle::LatinLetters), None)
        ));
        assert!(
            config
                .with_annotations(None, Some(AnnotationStyle::LatinLetters))
                .is_ok()
        );
    }

    #[test]
    fn unknown_annotation_name_is_invalid() {
        let result = BoardConfig::default().with_annotation_names(Some("klingon"), None);
        assert!(is_invalid(result));
    }

    #[test]
    fn canvas_size_follows_grid_and_border() {
        let (width, height) = BoardConfig::default().canvas_size();
        assert_eq!(width, 8.0 * 22.0 + 2.0 * 11.0);
        assert_eq!(height, 8.0 * 23.7 + 2.0 * 12.0);
    }
}
