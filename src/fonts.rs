use std::collections::HashMap;

use cosmic_text::skrifa::prelude::{FontRef, GlyphId, LocationRef, MetadataProvider, Size};
use cosmic_text::{Attrs, Buffer, Family, FontSystem, LayoutGlyph, Metrics, Shaping};

/// Ascent and descent used when the requested face has no usable glyphs.
const FALLBACK_ASCENT: f32 = 0.8;
const FALLBACK_DESCENT: f32 = 0.2;
const LINE_HEIGHT: f32 = 1.2;

/// Horizontal ink extents of a shaped string, in the same units as the font size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    /// Offset from the drawing origin to the left edge of the visible glyphs.
    pub x_bearing: f32,
    /// Width of the visible glyphs, not the advance.
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontExtents {
    pub ascent: f32,
    pub descent: f32,
    /// Distance from the top of the tallest glyph to the bottom of the deepest one.
    pub height: f32,
}

pub trait TextMeasure {
    fn text_extents(&mut self, text: &str, font_face: &str, font_size: f32) -> TextExtents;

    fn font_extents(&mut self, font_face: &str, font_size: f32) -> FontExtents;
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font_face: String,
    font_size_bits: u32,
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct FontKey {
    font_face: String,
    font_size_bits: u32,
}

pub struct CosmicTextMeasure {
    font_system: FontSystem,
    text_cache: HashMap<MeasureKey, TextExtents>,
    font_cache: HashMap<FontKey, FontExtents>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            text_cache: HashMap::new(),
            font_cache: HashMap::new(),
        }
    }

    fn shape(&mut self, text: &str, font_face: &str, font_size: f32) -> Buffer {
        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size,
                line_height: font_size * LINE_HEIGHT,
            },
        );
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new().family(Family::Name(font_face));
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer
    }

    /// Horizontal ink span of one glyph relative to the line origin, `None` for blank glyphs.
    fn glyph_span(&mut self, glyph: &LayoutGlyph) -> Option<(f32, f32)> {
        let index = self
            .font_system
            .db()
            .face(glyph.font_id)
            .map_or(0, |face| face.index);
        let font = self.font_system.get_font(glyph.font_id, glyph.font_weight)?;
        let font_ref = FontRef::from_index(font.data(), index).ok()?;
        let bounds = font_ref
            .glyph_metrics(Size::new(glyph.font_size), LocationRef::default())
            .bounds(GlyphId::from(glyph.glyph_id))?;
        if bounds.x_max <= bounds.x_min {
            return None;
        }

        let origin = glyph.x + glyph.x_offset * glyph.font_size;
        Some((origin + bounds.x_min, origin + bounds.x_max))
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn text_extents(&mut self, text: &str, font_face: &str, font_size: f32) -> TextExtents {
        let key = MeasureKey {
            text: text.to_string(),
            font_face: font_face.to_string(),
            font_size_bits: font_size.to_bits(),
        };

        if let Some(cached) = self.text_cache.get(&key) {
            return *cached;
        }

        let buffer = self.shape(text, font_face, font_size);
        let mut advance = 0.0f32;
        let mut span: Option<(f32, f32)> = None;
        for run in buffer.layout_runs() {
            advance = advance.max(run.line_w);
            for glyph in run.glyphs {
                if let Some((left, right)) = self.glyph_span(glyph) {
                    span = Some(match span {
                        Some((l, r)) => (l.min(left), r.max(right)),
                        None => (left, right),
                    });
                }
            }
        }

        // No outlines to measure: fall back to the advance box.
        let extents = match span {
            Some((left, right)) => TextExtents {
                x_bearing: left,
                width: right - left,
            },
            None => TextExtents {
                x_bearing: 0.0,
                width: advance,
            },
        };

        self.text_cache.insert(key, extents);
        extents
    }

    fn font_extents(&mut self, font_face: &str, font_size: f32) -> FontExtents {
        let key = FontKey {
            font_face: font_face.to_string(),
            font_size_bits: font_size.to_bits(),
        };

        if let Some(cached) = self.font_cache.get(&key) {
            return *cached;
        }

        // Digits and a descender give the same vertical metrics the labels end up using.
        let mut buffer = self.shape("0Ag", font_face, font_size);
        let (mut ascent, mut descent) = buffer
            .line_layout(&mut self.font_system, 0)
            .and_then(|lines| lines.first())
            .map(|line| (line.max_ascent, line.max_descent))
            .unwrap_or_default();

        if ascent + descent <= 0.0 {
            tracing::warn!(font_face, "no glyph metrics for font, using fallback extents");
            ascent = font_size * FALLBACK_ASCENT;
            descent = font_size * FALLBACK_DESCENT;
        }

        let extents = FontExtents {
            ascent,
            descent,
            height: ascent + descent,
        };
        self.font_cache.insert(key, extents);
        extents
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic metrics: every character is `advance × font_size` wide.
///
/// Used where real font data would make output depend on the fonts installed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMetrics {
    pub advance: f32,
    pub x_bearing: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            advance: 0.6,
            x_bearing: 0.0,
            ascent: FALLBACK_ASCENT,
            descent: FALLBACK_DESCENT,
        }
    }
}

impl TextMeasure for FixedMetrics {
    fn text_extents(&mut self, text: &str, _font_face: &str, font_size: f32) -> TextExtents {
        TextExtents {
            x_bearing: self.x_bearing * font_size,
            width: text.chars().count() as f32 * self.advance * font_size,
        }
    }

    fn font_extents(&mut self, _font_face: &str, font_size: f32) -> FontExtents {
        let ascent = self.ascent * font_size;
        let descent = self.descent * font_size;
        FontExtents {
            ascent,
            descent,
            height: ascent + descent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_metrics_scale_with_font_size() {
        let mut measure = FixedMetrics::default();
        let small = measure.text_extents("19", "sans-serif", 8.0);
        let large = measure.text_extents("19", "sans-serif", 16.0);
        assert_eq!(large.width, small.width * 2.0);

        let font = measure.font_extents("sans-serif", 10.0);
        assert_eq!(font.height, font.ascent + font.descent);
        assert!((font.height - 10.0).abs() < 1e-4);
    }

    #[test]
    fn cosmic_text_measures_ink_not_advance() {
        let mut measure = CosmicTextMeasure::new();
        let installed: Vec<String> = measure
            .font_system
            .db()
            .faces()
            .flat_map(|f| f.families.iter().map(|(name, _)| name.clone()))
            .collect();
        let face = ["DejaVu Sans", "Liberation Sans", "Noto Sans", "Arial"]
            .into_iter()
            .find(|name| installed.iter().any(|n| n == name));
        // Nothing to shape with on a machine without a common sans face.
        let Some(face) = face else { return };

        let one = measure.text_extents("1", face, 8.0);
        assert!(one.x_bearing > 0.0, "{face}: {one:?}");
        assert!(one.width > 0.0);

        let buffer = measure.shape("1", face, 8.0);
        let advance = buffer.layout_runs().map(|run| run.line_w).fold(0.0, f32::max);
        assert!(one.x_bearing + one.width < advance, "{face}: {one:?} vs {advance}");

        let blank = measure.text_extents(" ", face, 8.0);
        assert_eq!(blank.x_bearing, 0.0);
    }

    #[test]
    fn fixed_metrics_count_chars_not_bytes() {
        let mut measure = FixedMetrics::default();
        let latin = measure.text_extents("AB", "sans-serif", 10.0);
        let chinese = measure.text_extents("十一", "sans-serif", 10.0);
        assert_eq!(latin.width, chinese.width);
    }
}
