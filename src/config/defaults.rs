//! Built-in service defaults (the base tier)
//!
//! Hardcoded defaults for the portal settings schema, used as the Service
//! layer when no service document is supplied.

use serde::{Deserialize, Serialize};
use tierwise_resolver::{ConfigurationLayer, LayerError, ListItem, Tier};

/// Field and list names of the portal schema
pub mod keys {
    pub const DISPLAY_MODE: &str = "display_mode";
    pub const DARK_MODE: &str = "dark_mode";
    pub const ACCENT_COLOR: &str = "accent_color";
    pub const FONT_SCALE: &str = "font_scale";
    pub const WIDGETS: &str = "widgets";
}

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Hub display mode (default: "tiles")
    pub display_mode: String,

    /// Dark theme (default: false)
    pub dark_mode: bool,

    /// Accent color as a hex string (default: "#3b82f6")
    pub accent_color: String,

    /// Font scale factor (default: 1.0)
    pub font_scale: f64,

    /// Hub widgets in default order, all visible
    pub widgets: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            display_mode: "tiles".to_string(),
            dark_mode: false,
            accent_color: "#3b82f6".to_string(),
            font_scale: 1.0,
            widgets: ["announcements", "tasks", "calendar", "reports", "support"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to the Service layer used as the resolution base
    pub fn to_layer(&self) -> Result<ConfigurationLayer, LayerError> {
        ConfigurationLayer::builder(Tier::Service)
            .field(keys::DISPLAY_MODE, self.display_mode.as_str())
            .field(keys::DARK_MODE, self.dark_mode)
            .field(keys::ACCENT_COLOR, self.accent_color.as_str())
            .field(keys::FONT_SCALE, self.font_scale)
            .list(
                keys::WIDGETS,
                self.widgets.iter().map(|id| ListItem::new(id.as_str())),
            )
            .build()
    }
}
