//! Go board diagrams as SVG, PNG or PDF.
//!
//! ```no_run
//! use goban::{BoardConfig, CosmicTextMeasure, GridSize, create_svg_file};
//!
//! let config = BoardConfig::default().with_size(GridSize::square(13)?)?;
//! let mut measure = CosmicTextMeasure::new();
//! create_svg_file(&config, &mut measure, "goban_13x13.svg")?;
//! # Ok::<(), goban::GobanError>(())
//! ```

pub mod annotation;
pub mod config;
pub mod error;
pub mod export;
pub mod fonts;
pub mod layout;
pub mod preset;
pub mod render;
pub mod svg;
pub mod text;

pub use annotation::AnnotationStyle;
pub use config::{BoardConfig, GridPoint, GridSize, LineWidths, Spacing, StarPointPlacement};
pub use error::{GobanError, Result};
pub use fonts::{CosmicTextMeasure, FixedMetrics, TextMeasure};
pub use layout::{BoardLayout, compute_layout};
pub use preset::BoardFile;
pub use render::{create_svg_file, render_svg};
