use serde::Deserialize;
use thiserror::Error;

use crate::color::{decode_hex, Color, ColorError};
use crate::stroke::DrawingAttributes;

pub const PRESSURE_MULTIPLIER: f64 = 15.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid ink config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid initial color {value:?}: {source}")]
    InvalidColor { value: String, source: ColorError },
}

/// Canvas and ink settings. Every field has a default, so `{}` is a valid
/// config.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InkConfig {
    pub line_width: f64,
    pub line_cap: String,
    pub line_join: String,
    pub initial_color: String,
    pub pressure_multiplier: f64,
    /// Narrowest stroke the fallback engine will draw.
    pub min_width: f64,
    /// Fallback engine drops points closer than this to the previous one.
    pub min_distance: f64,
    pub fit_to_curve: bool,
    /// Recolor the most recent stroke to the current color on each full
    /// redraw.
    pub recolor_last_stroke: bool,
    pub debug: bool,
}

impl Default for InkConfig {
    fn default() -> Self {
        Self {
            line_width: 5.0,
            line_cap: "round".to_string(),
            line_join: "round".to_string(),
            initial_color: "#000000".to_string(),
            pressure_multiplier: PRESSURE_MULTIPLIER,
            min_width: 0.5,
            min_distance: 0.0,
            fit_to_curve: true,
            recolor_last_stroke: false,
            debug: false,
        }
    }
}

impl InkConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: InkConfig = serde_json::from_str(text)?;
        config.initial_color()?;
        Ok(config)
    }

    pub fn initial_color(&self) -> Result<Color, ConfigError> {
        decode_hex(&self.initial_color).map_err(|source| ConfigError::InvalidColor {
            value: self.initial_color.clone(),
            source,
        })
    }

    /// Attributes for the first stroke. Fails when `initial_color` does
    /// not decode.
    pub fn drawing_attributes(&self) -> Result<DrawingAttributes, ConfigError> {
        Ok(DrawingAttributes {
            color: self.initial_color()?,
            stroke_width: self.line_width,
            fit_to_curve: self.fit_to_curve,
        })
    }
}
