use clap::Parser;
use goban::export::{OutputFormat, svg_to_pdf, svg_to_png};
use goban::{
    BoardConfig, BoardFile, CosmicTextMeasure, GridSize, LineWidths, Spacing, StarPointPlacement,
    compute_layout, render_svg,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Go board diagram generator
#[derive(Parser, Debug)]
#[command(name = "goban")]
#[command(version)]
#[command(about = "Render Go boards to SVG, PNG or PDF for printing or laser cutting", long_about = None)]
struct Args {
    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT", required_unless_present_any = ["dump_layout", "list_presets"])]
    output: Option<PathBuf>,

    /// Built-in preset to start from
    #[arg(short, long, value_name = "NAME", conflicts_with = "config")]
    preset: Option<String>,

    /// Board config file (TOML or YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid lines, e.g. 19 or 13x9
    #[arg(short, long)]
    size: Option<GridSize>,

    /// Thin and thick line widths in mm, e.g. 1,2
    #[arg(long, value_name = "THIN,THICK")]
    line_widths: Option<LineWidths>,

    /// Distance between grid lines in mm, e.g. 22 or 22,23.7
    #[arg(long, value_name = "X[,Y]")]
    line_spacing: Option<Spacing>,

    /// Margin outside the grid in mm, e.g. 11 or 11,12
    #[arg(long, value_name = "X[,Y]")]
    border_spacing: Option<Spacing>,

    /// auto, none, a corner distance like 4, or points like 3,3;7,7
    #[arg(long, value_name = "PLACEMENT")]
    star_points: Option<StarPointPlacement>,

    /// Star point diameter in mm
    #[arg(long, value_name = "MM")]
    star_point_diameter: Option<f32>,

    /// Labels for the vertical lines: none, arabic_numerals, chinese_numerals, latin_letters
    #[arg(long, value_name = "STYLE")]
    x_annotation: Option<String>,

    /// Labels for the horizontal lines: none, arabic_numerals, chinese_numerals, latin_letters
    #[arg(long, value_name = "STYLE")]
    y_annotation: Option<String>,

    /// Font used for the labels
    #[arg(long, value_name = "FACE")]
    font_face: Option<String>,

    /// Label font size in document units (mm)
    #[arg(long, value_name = "SIZE")]
    font_size: Option<f32>,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Print the computed layout as JSON to stdout
    #[arg(long)]
    dump_layout: bool,

    /// List built-in presets and exit
    #[arg(long)]
    list_presets: bool,
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if args.list_presets {
        for name in BoardFile::list_builtins() {
            println!("{}", name);
        }
        return Ok(());
    }

    let config = build_config(&args).map_err(|e| e.to_string())?;

    if args.dump_layout {
        let layout = compute_layout(&config).map_err(|e| e.to_string())?;
        let json = serde_json::to_string_pretty(&layout)
            .map_err(|e| format!("Failed to serialize layout: {}", e))?;
        println!("{}", json);
    }

    let Some(output) = args.output else {
        return Ok(());
    };

    let format = OutputFormat::from_path(&output).map_err(|e| e.to_string())?;
    let mut measure = CosmicTextMeasure::new();
    let svg = render_svg(&config, &mut measure).map_err(|e| e.to_string())?;

    let (data, label) = match format {
        OutputFormat::Svg => (svg.into_bytes(), "SVG"),
        OutputFormat::Png => (
            svg_to_png(&svg, args.png_scale).map_err(|e| e.to_string())?,
            "PNG",
        ),
        OutputFormat::Pdf => (svg_to_pdf(&svg).map_err(|e| e.to_string())?, "PDF"),
    };

    std::fs::write(&output, data).map_err(|e| format!("Failed to write {}: {}", label, e))?;
    eprintln!("{} saved to: {}", label, output.display());

    Ok(())
}

/// Preset or config file first, then individual flags on top.
fn build_config(args: &Args) -> goban::Result<BoardConfig> {
    let mut config = BoardConfig::default();

    if let Some(name) = &args.preset {
        config = BoardFile::builtin(name)?.apply(config)?;
    }
    if let Some(path) = &args.config {
        config = BoardFile::load(path)?.apply(config)?;
    }

    if let Some(size) = args.size {
        config = config.with_size(size)?;
    }
    if let Some(widths) = args.line_widths {
        config = config.with_line_widths(widths)?;
    }
    if let Some(spacing) = args.line_spacing {
        config = config.with_line_spacing(spacing)?;
    }
    if let Some(spacing) = args.border_spacing {
        config = config.with_border_spacing(spacing)?;
    }
    if let Some(placement) = &args.star_points {
        config = config.with_star_points(placement.clone())?;
    }
    if let Some(diameter) = args.star_point_diameter {
        config = config.with_star_point_diameter(diameter)?;
    }
    config = config
        .with_annotation_names(args.x_annotation.as_deref(), args.y_annotation.as_deref())?;
    if let Some(face) = &args.font_face {
        config = config.with_font_face(face.clone())?;
    }
    if let Some(size) = args.font_size {
        config = config.with_font_size(size)?;
    }

    tracing::debug!(?config, "board config");
    Ok(config)
}
