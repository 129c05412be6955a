//! Board geometry.
//!
//! Everything here is a pure function of [`BoardConfig`]. Coordinates are in
//! millimetres with the origin at the top-left corner of the board and y
//! pointing down, the same space the SVG surface draws in.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::Serialize;

use crate::config::{AUTO_CORNER_DISTANCE, BoardConfig, GridPoint, GridSize, StarPointPlacement};
use crate::error::Result;

/// Fraction of the border spacing between the board edge and the centre of an annotation.
pub const CENTER_FACTOR: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub orientation: Orientation,
    /// 0-based position along the axis the line is stacked on.
    pub index: u32,
    pub start: Point,
    pub end: Point,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarPoint {
    pub grid: GridPoint,
    pub center: Point,
    pub diameter: f32,
}

/// Which grid lines an annotation labels: `X` for the vertical lines, `Y` for the horizontal ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub anchor: Point,
    /// Radians, clockwise on screen.
    pub rotation: f32,
    pub axis: Axis,
}

/// Circular arc, angles in radians measured clockwise on screen from the +x axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arc {
    pub center: Point,
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl Arc {
    pub fn point_at(&self, angle: f32) -> Point {
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    pub fn start(&self) -> Point {
        self.point_at(self.start_angle)
    }

    pub fn end(&self) -> Point {
        self.point_at(self.end_angle)
    }
}

/// Rounded rectangle around the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorderPath {
    /// Top-left corner of the (unrounded) rectangle.
    pub origin: Point,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub line_width: f32,
}

impl BorderPath {
    /// Corner arcs in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub fn arcs(&self) -> [Arc; 4] {
        let Point { x, y } = self.origin;
        let (w, h, r) = (self.width, self.height, self.radius);
        [
            Arc {
                center: Point::new(x + r, y + r),
                radius: r,
                start_angle: PI,
                end_angle: 3.0 * FRAC_PI_2,
            },
            Arc {
                center: Point::new(x + w - r, y + r),
                radius: r,
                start_angle: 3.0 * FRAC_PI_2,
                end_angle: TAU,
            },
            Arc {
                center: Point::new(x + w - r, y + h - r),
                radius: r,
                start_angle: 0.0,
                end_angle: FRAC_PI_2,
            },
            Arc {
                center: Point::new(x + r, y + h - r),
                radius: r,
                start_angle: FRAC_PI_2,
                end_angle: PI,
            },
        ]
    }

    /// Where the path starts: the top of the left edge.
    pub fn start(&self) -> Point {
        Point::new(self.origin.x, self.origin.y + self.radius)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardLayout {
    pub width: f32,
    pub height: f32,
    pub grid_lines: Vec<GridLine>,
    pub star_points: Vec<StarPoint>,
    pub annotations: Vec<Annotation>,
    pub border: BorderPath,
}

pub fn compute_layout(config: &BoardConfig) -> Result<BoardLayout> {
    let (width, height) = config.canvas_size();
    let layout = BoardLayout {
        width,
        height,
        grid_lines: grid_lines(config),
        star_points: star_points(config),
        annotations: annotations(config)?,
        border: border_path(config),
    };

    tracing::debug!(
        size = %config.size(),
        width,
        height,
        lines = layout.grid_lines.len(),
        star_points = layout.star_points.len(),
        annotations = layout.annotations.len(),
        "computed board layout"
    );

    Ok(layout)
}

/// Physical position of the 0-based grid intersection `(col, row)`.
fn grid_position(config: &BoardConfig, col: f32, row: f32) -> Point {
    let spacing = config.line_spacing();
    let border = config.border_spacing();
    Point::new(border.x + col * spacing.x, border.y + row * spacing.y)
}

pub fn grid_lines(config: &BoardConfig) -> Vec<GridLine> {
    let GridSize { cols, rows } = config.size();
    let widths = config.line_widths();
    let width_for = |index: u32, count: u32| {
        if index == 0 || index == count - 1 {
            widths.thick
        } else {
            widths.thin
        }
    };

    let last_col = (cols - 1) as f32;
    let last_row = (rows - 1) as f32;
    let mut lines = Vec::with_capacity(line_count(config.size()));

    for index in 0..cols {
        let x = index as f32;
        lines.push(GridLine {
            orientation: Orientation::Vertical,
            index,
            start: grid_position(config, x, 0.0),
            end: grid_position(config, x, last_row),
            width: width_for(index, cols),
        });
    }

    for index in 0..rows {
        let y = index as f32;
        lines.push(GridLine {
            orientation: Orientation::Horizontal,
            index,
            start: grid_position(config, 0.0, y),
            end: grid_position(config, last_col, y),
            width: width_for(index, rows),
        });
    }

    lines
}

/// Vertical plus horizontal lines, counted without `u32` overflow.
fn line_count(size: GridSize) -> usize {
    size.cols as usize + size.rows as usize
}

pub fn star_points(config: &BoardConfig) -> Vec<StarPoint> {
    let diameter = config.star_point_diameter();
    star_point_positions(config.size(), config.star_points())
        .into_iter()
        .map(|grid| StarPoint {
            grid,
            center: grid_position(config, (grid.x as f32) - 1.0, (grid.y as f32) - 1.0),
            diameter,
        })
        .collect()
}

/// Grid intersections that get a star point, before conversion to millimetres.
pub fn star_point_positions(size: GridSize, placement: &StarPointPlacement) -> Vec<GridPoint> {
    match placement {
        StarPointPlacement::Auto => auto_star_points(size, AUTO_CORNER_DISTANCE),
        StarPointPlacement::Corner(distance) => auto_star_points(size, *distance),
        StarPointPlacement::Explicit(points) => points.clone(),
    }
}

/// Corner points `distance` lines in from each edge, plus the centre and the
/// side centres on odd dimensions.
///
/// The side centres added for an odd row count put the right-hand point on
/// column `rows - distance + 1`. On square boards that is the usual point; on
/// rectangular ones it is kept as is so existing board files stay identical.
pub fn auto_star_points(size: GridSize, distance: u32) -> Vec<GridPoint> {
    let GridSize { cols, rows } = size;
    if distance == 0 || cols < distance || rows < distance {
        return Vec::new();
    }

    let near = distance;
    let far_col = cols - distance + 1;
    let far_row = rows - distance + 1;
    let mid_col = (cols - 1) / 2 + 1;
    let mid_row = (rows - 1) / 2 + 1;

    let mut points = vec![
        GridPoint::new(near, near),
        GridPoint::new(near, far_row),
        GridPoint::new(far_col, near),
        GridPoint::new(far_col, far_row),
    ];

    if cols % 2 != 0 && rows % 2 != 0 {
        points.push(GridPoint::new(mid_col, mid_row));
    }
    if cols % 2 != 0 {
        points.push(GridPoint::new(mid_col, near));
        points.push(GridPoint::new(mid_col, far_row));
    }
    if rows % 2 != 0 {
        points.push(GridPoint::new(near, mid_row));
        points.push(GridPoint::new(far_row, mid_row));
    }

    points
}

pub fn annotations(config: &BoardConfig) -> Result<Vec<Annotation>> {
    let GridSize { cols, rows } = config.size();
    let spacing = config.line_spacing();
    let border = config.border_spacing();
    let mut out = Vec::new();

    if let Some(style) = config.x_annotation() {
        let top = border.y * CENTER_FACTOR;
        let bottom = border.y * (2.0 - CENTER_FACTOR) + (rows - 1) as f32 * spacing.y;

        for col in 0..cols {
            let text = style.label(col)?;
            let x = border.x + col as f32 * spacing.x;
            // The top copy is upside down so it reads from the far side of the board.
            push_pair(
                &mut out,
                Axis::X,
                text,
                (Point::new(x, top), PI),
                (Point::new(x, bottom), 0.0),
            );
        }
    }

    if let Some(style) = config.y_annotation() {
        let left = border.x * CENTER_FACTOR;
        let right = border.x * (2.0 - CENTER_FACTOR) + (cols - 1) as f32 * spacing.x;

        for row in 0..rows {
            // Rows are numbered from the bottom edge up.
            let text = style.label(rows - row - 1)?;
            let y = border.y + row as f32 * spacing.y;
            push_pair(
                &mut out,
                Axis::Y,
                text,
                (Point::new(left, y), 0.0),
                (Point::new(right, y), PI),
            );
        }
    }

    Ok(out)
}

fn push_pair(
    out: &mut Vec<Annotation>,
    axis: Axis,
    text: String,
    first: (Point, f32),
    second: (Point, f32),
) {
    out.push(Annotation {
        text: text.clone(),
        anchor: first.0,
        rotation: first.1,
        axis,
    });
    out.push(Annotation {
        text,
        anchor: second.0,
        rotation: second.1,
        axis,
    });
}

pub fn border_path(config: &BoardConfig) -> BorderPath {
    let line_width = config.line_widths().thick;
    let (width, height) = config.canvas_size();
    BorderPath {
        origin: Point::new(line_width / 2.0, line_width / 2.0),
        width: width - line_width,
        height: height - line_width,
        radius: config.line_spacing().x / 3.0,
        line_width,
    }
}
