//! Placement of rotated labels so their visual centre sits on an anchor point.

use crate::fonts::{FontExtents, TextExtents, TextMeasure};
use crate::layout::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub anchor: Point,
    /// Radians, clockwise on screen.
    pub rotation: f32,
    /// Translation from the anchor to the text origin, applied after the rotation.
    pub offset: Point,
}

impl TextPlacement {
    pub fn new(anchor: Point, rotation: f32, text: TextExtents, font: FontExtents) -> Self {
        Self {
            anchor,
            rotation,
            offset: centering_offset(text, font),
        }
    }

    pub fn measure(
        measure: &mut dyn TextMeasure,
        text: &str,
        font_face: &str,
        font_size: f32,
        anchor: Point,
        rotation: f32,
    ) -> Self {
        let text_extents = measure.text_extents(text, font_face, font_size);
        let font_extents = measure.font_extents(font_face, font_size);
        Self::new(anchor, rotation, text_extents, font_extents)
    }

    /// Board position of the text origin (left end of the baseline).
    pub fn origin(&self) -> Point {
        let (sin, cos) = self.rotation.sin_cos();
        Point::new(
            self.anchor.x + self.offset.x * cos - self.offset.y * sin,
            self.anchor.y + self.offset.x * sin + self.offset.y * cos,
        )
    }
}

/// Offset that centres the ink horizontally and puts the baseline a third of
/// the font height below the anchor.
pub fn centering_offset(text: TextExtents, font: FontExtents) -> Point {
    Point::new(-(text.width / 2.0 + text.x_bearing), font.height / 3.0)
}
