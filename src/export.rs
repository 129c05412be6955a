//! PNG and PDF conversion of rendered boards.

use std::path::Path;
use std::sync::Arc;

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

use crate::error::{GobanError, Result};

/// Directory searched for extra fonts next to the working directory.
const LOCAL_FONT_DIR: &str = "fonts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| GobanError::Export("Output file has no extension".to_string()))?
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(GobanError::Export(format!(
                "Unsupported output format: .{} (use .svg, .png or .pdf)",
                ext
            ))),
        }
    }
}

/// Rasterise at `scale` device pixels per SVG pixel.
pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(GobanError::Export(format!("Invalid PNG scale: {}", scale)));
    }

    let mut opts = usvg::Options::default();
    load_fonts(opts.fontdb_mut());

    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| GobanError::Export(format!("Failed to parse SVG: {}", e)))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| GobanError::Export("Failed to create pixmap".to_string()))?;

    // Boards are usually cut or printed on a light background.
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    tracing::debug!(width, height, scale, "rasterised board");
    pixmap
        .encode_png()
        .map_err(|e| GobanError::Export(format!("Failed to encode PNG: {}", e)))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    use svg2pdf::usvg::fontdb;

    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let local = Path::new(LOCAL_FONT_DIR);
    if local.is_dir() {
        db.load_fonts_dir(local);
    }
    let family = pick_sans_family(
        db.faces()
            .flat_map(|f| f.families.iter().map(|(n, _)| n.as_str())),
    )
    .map(str::to_string);
    if let Some(family) = family {
        db.set_sans_serif_family(family);
    }

    let opts = svg2pdf::usvg::Options {
        fontdb: Arc::new(db),
        ..Default::default()
    };
    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| GobanError::Export(format!("Failed to parse SVG: {}", e)))?;

    // Text as paths, so the PDF doesn't depend on font embedding.
    let options = svg2pdf::ConversionOptions {
        embed_text: false,
        ..Default::default()
    };

    svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| GobanError::Export(format!("Failed to convert SVG to PDF: {}", e)))
}

fn load_fonts(db: &mut usvg::fontdb::Database) {
    db.load_system_fonts();
    let local = Path::new(LOCAL_FONT_DIR);
    if local.is_dir() {
        db.load_fonts_dir(local);
    }

    let family = pick_sans_family(
        db.faces()
            .flat_map(|f| f.families.iter().map(|(n, _)| n.as_str())),
    )
    .map(str::to_string);
    match family {
        Some(family) => db.set_sans_serif_family(family),
        None => tracing::warn!("no fonts found, annotations will not be rasterised"),
    }
}

/// First family with "sans" in its name, else the first family at all.
fn pick_sans_family<'a>(families: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut first = None;
    for family in families {
        if family.to_ascii_lowercase().contains("sans") {
            return Some(family);
        }
        first.get_or_insert(family);
    }
    first
}
