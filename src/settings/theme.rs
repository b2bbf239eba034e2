//! Theme preferences

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tierwise_resolver::ResolvedConfiguration;

use super::ViewError;
use crate::config::keys;

/// How the hub lays out widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Tiles,
    Grid,
    List,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Tiles => write!(f, "tiles"),
            DisplayMode::Grid => write!(f, "grid"),
            DisplayMode::List => write!(f, "list"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tiles" => Ok(DisplayMode::Tiles),
            "grid" => Ok(DisplayMode::Grid),
            "list" => Ok(DisplayMode::List),
            other => Err(ViewError::InvalidValue {
                field: keys::DISPLAY_MODE,
                value: other.to_string(),
            }),
        }
    }
}

/// Resolved theme settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub display_mode: DisplayMode,
    pub dark_mode: bool,
    pub accent_color: String,
    pub font_scale: f64,
}

impl ThemeSettings {
    pub fn from_resolved(config: &ResolvedConfiguration) -> Result<Self, ViewError> {
        let display_mode = config
            .get_str(keys::DISPLAY_MODE)
            .ok_or(ViewError::Missing(keys::DISPLAY_MODE))?
            .parse()?;
        let dark_mode = config
            .get_bool(keys::DARK_MODE)
            .ok_or(ViewError::Missing(keys::DARK_MODE))?;
        let accent_color = config
            .get_str(keys::ACCENT_COLOR)
            .ok_or(ViewError::Missing(keys::ACCENT_COLOR))?;
        if !is_hex_color(accent_color) {
            return Err(ViewError::InvalidValue {
                field: keys::ACCENT_COLOR,
                value: accent_color.to_string(),
            });
        }
        let font_scale = config
            .get_f64(keys::FONT_SCALE)
            .ok_or(ViewError::Missing(keys::FONT_SCALE))?;
        if !(0.5..=3.0).contains(&font_scale) {
            return Err(ViewError::InvalidValue {
                field: keys::FONT_SCALE,
                value: font_scale.to_string(),
            });
        }

        Ok(Self {
            display_mode,
            dark_mode,
            accent_color: accent_color.to_string(),
            font_scale,
        })
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
