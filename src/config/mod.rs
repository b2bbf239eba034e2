//! Tier layer stores and the effective settings record
//!
//! Loads the three tiers in precedence order:
//! 1. Service defaults (file, or built-in defaults)
//! 2. Account overrides
//! 3. User overrides
//!
//! and hands them to the resolver. Loading happens here; merging does not.

mod defaults;
mod effective;
mod load;

pub use defaults::{keys, BuiltinDefaults};
pub use effective::{
    digest_settings, ConfigSource, EffectiveSettings, TierPaths, TierStack, SCHEMA_ID,
    SCHEMA_VERSION,
};
pub use load::{load_layer, parse_body, write_layer, ConfigError, LayerFormat, LoadedLayer};
