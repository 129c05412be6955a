use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::BoardConfig;
use crate::error::Result;
use crate::fonts::TextMeasure;
use crate::layout::{Annotation, BoardLayout, BorderPath, GridLine, StarPoint, compute_layout};
use crate::svg::{LineCap, SvgSurface};
use crate::text::TextPlacement;

/// Lay out `config` and draw it as an SVG document.
pub fn render_svg(config: &BoardConfig, measure: &mut dyn TextMeasure) -> Result<String> {
    let layout = compute_layout(config)?;
    Ok(draw_layout(&layout, config.font_face(), config.font_size(), measure))
}

pub fn draw_layout(
    layout: &BoardLayout,
    font_face: &str,
    font_size: f32,
    measure: &mut dyn TextMeasure,
) -> String {
    let mut surface = SvgSurface::new(layout.width, layout.height);
    surface.set_source_rgb(0.0, 0.0, 0.0);

    draw_grid(&mut surface, &layout.grid_lines);
    draw_star_points(&mut surface, &layout.star_points);
    draw_annotations(&mut surface, &layout.annotations, font_face, font_size, measure);
    draw_border(&mut surface, &layout.border);

    surface.finish()
}

/// Render and write to `path`. The file is flushed before returning and
/// closed on every exit path.
pub fn create_svg_file(
    config: &BoardConfig,
    measure: &mut dyn TextMeasure,
    path: impl AsRef<Path>,
) -> Result<()> {
    let svg = render_svg(config, measure)?;
    write_file(path.as_ref(), svg.as_bytes())
}

pub(crate) fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(data)?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "wrote board file");
    Ok(())
}

fn draw_grid(surface: &mut SvgSurface, lines: &[GridLine]) {
    surface.set_line_cap(LineCap::Round);
    for line in lines {
        surface.set_line_width(line.width);
        surface.move_to(line.start.x, line.start.y);
        surface.line_to(line.end.x, line.end.y);
        surface.stroke();
    }
}

fn draw_star_points(surface: &mut SvgSurface, points: &[StarPoint]) {
    for point in points {
        surface.circle(point.center.x, point.center.y, point.diameter / 2.0);
        surface.fill();
    }
}

fn draw_annotations(
    surface: &mut SvgSurface,
    annotations: &[Annotation],
    font_face: &str,
    font_size: f32,
    measure: &mut dyn TextMeasure,
) {
    surface.select_font_face(font_face);
    surface.set_font_size(font_size);

    for annotation in annotations {
        let placement = TextPlacement::measure(
            measure,
            &annotation.text,
            font_face,
            font_size,
            annotation.anchor,
            annotation.rotation,
        );

        surface.save();
        surface.translate(placement.anchor.x, placement.anchor.y);
        surface.rotate(placement.rotation);
        surface.translate(placement.offset.x, placement.offset.y);
        surface.move_to(0.0, 0.0);
        surface.show_text(&annotation.text);
        surface.restore();
    }
}

fn draw_border(surface: &mut SvgSurface, border: &BorderPath) {
    surface.set_line_width(border.line_width);
    surface.set_source_rgb(0.0, 0.0, 0.0);

    let start = border.start();
    surface.move_to(start.x, start.y);
    for arc in border.arcs() {
        surface.arc(
            arc.center.x,
            arc.center.y,
            arc.radius,
            arc.start_angle,
            arc.end_angle,
        );
    }
    surface.close_path();
    surface.stroke();
}
