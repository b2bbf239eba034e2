//! Reading and writing tier layer documents
//!
//! A layer document is the serialized form of one tier's partial settings:
//!
//! ```toml
//! [fields]
//! display_mode = "grid"
//!
//! [[lists.widgets]]
//! id = "tasks"
//! visible = false
//!
//! [locked]
//! fields = ["display_mode"]
//! items = { widgets = ["tasks"] }
//! ```
//!
//! JSON documents with the same shape are accepted as well.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tierwise_resolver::{ConfigurationLayer, LayerBody, LayerError, Tier};
use tracing::debug;

/// Document format of a layer file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerFormat {
    Toml,
    Json,
}

impl LayerFormat {
    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(LayerFormat::Toml),
            Some("json") => Ok(LayerFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A layer read from disk with the digest of its raw bytes
#[derive(Debug, Clone)]
pub struct LoadedLayer {
    pub layer: ConfigurationLayer,

    /// SHA-256 of the raw file bytes
    pub digest: String,
}

/// Load and validate a layer document for `tier`
pub fn load_layer(path: &Path, tier: Tier) -> Result<LoadedLayer, ConfigError> {
    let format = LayerFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let body = parse_body(&bytes, format)
        .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
    let layer = ConfigurationLayer::new(tier, body)?;

    debug!(
        path = %path.display(),
        %tier,
        fields = layer.fields().len(),
        lists = layer.lists().len(),
        "loaded layer"
    );

    Ok(LoadedLayer { layer, digest })
}

/// Parse a layer body from raw bytes
pub fn parse_body(bytes: &[u8], format: LayerFormat) -> Result<LayerBody, String> {
    match format {
        LayerFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
        LayerFormat::Toml => {
            let contents =
                std::str::from_utf8(bytes).map_err(|e| format!("Invalid UTF-8: {}", e))?;
            toml::from_str(contents).map_err(|e| format!("TOML parse error: {}", e))
        }
    }
}

/// Write a layer's document to `path` in the format implied by its extension
pub fn write_layer(path: &Path, layer: &ConfigurationLayer) -> Result<(), ConfigError> {
    let body = layer.to_body();
    let contents = match LayerFormat::from_path(path)? {
        LayerFormat::Json => serde_json::to_string_pretty(&body)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        LayerFormat::Toml => {
            toml::to_string_pretty(&body).map_err(|e| ConfigError::Serialize(e.to_string()))?
        }
    };
    fs::write(path, contents).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported layer format (expected .toml or .json): {0}")]
    UnsupportedFormat(String),

    #[error("Invalid layer: {0}")]
    InvalidLayer(#[from] LayerError),

    #[error("{found} layer supplied for the {expected} slot")]
    TierMismatch { expected: Tier, found: Tier },

    #[error("Serialization error: {0}")]
    Serialize(String),
}
