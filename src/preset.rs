//! Board config files and the built-in presets.
//!
//! Files are TOML or YAML with every field optional; whatever is missing keeps
//! the value of the config the file is applied to.

use std::path::Path;

use serde::Deserialize;

use crate::config::{BoardConfig, GridPoint, GridSize, LineWidths, Spacing, StarPointPlacement};
use crate::error::{GobanError, Result, invalid};

const BUILTIN_PRESETS: &[(&str, &str)] = &[
    ("13x13", include_str!("../presets/13x13.toml")),
    ("19x19", include_str!("../presets/19x19.toml")),
    ("8x5", include_str!("../presets/8x5.toml")),
    ("9x9", include_str!("../presets/9x9.toml")),
    ("9x9_annotated", include_str!("../presets/9x9_annotated.toml")),
];

/// Any value at all, so a wrongly typed field surfaces as invalid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Field<T> {
    Valid(T),
    Invalid(serde_json::Value),
}

impl<T> Field<T> {
    fn get(self, name: &str, expected: &str) -> Result<T> {
        match self {
            Field::Valid(value) => Ok(value),
            Field::Invalid(value) => Err(invalid(format!(
                "{} must be {}, got {}",
                name, expected, value
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StarPointsValue {
    Corner(u32),
    Name(String),
    Points(Vec<GridPoint>),
}

const NUMBERS: &str = "a number or a pair of numbers";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardFile {
    size: Option<Field<OneOrMany<f64>>>,
    line_widths: Option<Field<OneOrMany<f32>>>,
    line_spacing: Option<Field<OneOrMany<f32>>>,
    border_spacing: Option<Field<OneOrMany<f32>>>,
    star_point_diameter: Option<Field<f32>>,
    star_points: Option<Field<StarPointsValue>>,
    x_annotation: Option<Field<String>>,
    y_annotation: Option<Field<String>>,
    font_face: Option<Field<String>>,
    font_size: Option<Field<f32>>,
}

impl BoardFile {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| GobanError::Parse(format!("Failed to parse board TOML: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| GobanError::Parse(format!("Failed to parse board YAML: {}", e)))
    }

    /// Try TOML first, then YAML.
    pub fn parse(content: &str) -> Result<Self> {
        match Self::from_toml(content) {
            Ok(file) => Ok(file),
            Err(toml_err) => Self::from_yaml(content).map_err(|yaml_err| {
                GobanError::Parse(format!(
                    "Board config is neither TOML nor YAML ({}; {})",
                    toml_err, yaml_err
                ))
            }),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(GobanError::Parse(format!(
                "Board config not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::parse(&content)
        }
    }

    pub fn builtin(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_PRESETS
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| {
                invalid(format!(
                    "Unknown preset '{}'. Available: {}",
                    name,
                    Self::list_builtins().join(", ")
                ))
            })?;
        Self::from_toml(content)
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_PRESETS.iter().map(|(n, _)| *n).collect()
    }

    /// Overlay the fields present in this file onto `config`.
    pub fn apply(self, mut config: BoardConfig) -> Result<BoardConfig> {
        if let Some(size) = self.size {
            let size = size.get("size", "an integer or a pair of integers")?;
            config = config.with_size(size_from_numbers(&size.into_vec())?)?;
        }
        if let Some(widths) = self.line_widths {
            let widths = match widths.get("line_widths", NUMBERS)?.into_vec().as_slice() {
                [width] => LineWidths::new(*width, *width)?,
                [a, b] => LineWidths::new(*a, *b)?,
                other => {
                    return Err(invalid(format!(
                        "Line widths must be a pair of numbers, got {} values",
                        other.len()
                    )));
                }
            };
            config = config.with_line_widths(widths)?;
        }
        if let Some(spacing) = self.line_spacing {
            let spacing = spacing.get("line_spacing", NUMBERS)?.into_vec();
            config = config.with_line_spacing(Spacing::from_components(&spacing)?)?;
        }
        if let Some(spacing) = self.border_spacing {
            let spacing = spacing.get("border_spacing", NUMBERS)?.into_vec();
            config = config.with_border_spacing(Spacing::from_components(&spacing)?)?;
        }
        if let Some(diameter) = self.star_point_diameter {
            let diameter = diameter.get("star_point_diameter", "a number")?;
            config = config.with_star_point_diameter(diameter)?;
        }
        if let Some(star_points) = self.star_points {
            let star_points = star_points.get(
                "star_points",
                "\"auto\", \"none\", a corner distance or a list of [x, y] points",
            )?;
            let placement = match star_points {
                StarPointsValue::Corner(distance) => StarPointPlacement::Corner(distance),
                StarPointsValue::Name(name) => name.parse()?,
                StarPointsValue::Points(points) => StarPointPlacement::Explicit(points),
            };
            config = config.with_star_points(placement)?;
        }
        let x_annotation = self
            .x_annotation
            .map(|style| style.get("x_annotation", "a style name"))
            .transpose()?;
        let y_annotation = self
            .y_annotation
            .map(|style| style.get("y_annotation", "a style name"))
            .transpose()?;
        config = config.with_annotation_names(x_annotation.as_deref(), y_annotation.as_deref())?;
        if let Some(face) = self.font_face {
            config = config.with_font_face(face.get("font_face", "a font name")?)?;
        }
        if let Some(size) = self.font_size {
            config = config.with_font_size(size.get("font_size", "a number")?)?;
        }
        Ok(config)
    }
}

/// Config formats hand sizes over as plain numbers; only whole ones are board sizes.
fn size_from_numbers(values: &[f64]) -> Result<GridSize> {
    let mut components = Vec::with_capacity(values.len());
    for &value in values {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(invalid(format!(
                "Board size must be an integer or a pair of integers, got {}",
                value
            )));
        }
        components.push(value as i64);
    }
    GridSize::from_components(&components)
}
