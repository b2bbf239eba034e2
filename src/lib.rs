//! Tierwise - tiered settings resolution
//!
//! Loads the Service, Account and User layers of a setting, resolves them
//! with `tierwise-resolver` (field, list and item locks included) and
//! exposes the result as an effective settings record and typed views.

pub mod config;
pub mod logging;
pub mod settings;

pub use config::{ConfigError, EffectiveSettings, TierPaths, TierStack};
pub use settings::{DisplayMode, HubLayout, ThemeSettings, ViewError};
pub use tierwise_resolver::{
    derive_override, resolve, resolve_detailed, ConfigurationLayer, Diagnostic, LayerError,
    ListItem, LockSet, OverrideDraft, Resolution, ResolvedConfiguration, ScalarValue, Tier,
};
