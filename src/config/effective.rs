//! Effective settings with full provenance
//!
//! The effective settings record captures the resolved configuration plus
//! where each tier's layer came from, which tier won each value, and every
//! lock in force.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tierwise_resolver::{
    resolve_detailed, ConfigurationLayer, Diagnostic, ListItem, LockSet, Provenance, Resolution,
    ResolvedConfiguration, ScalarValue, Tier,
};
use tracing::{debug, info, warn};

use super::defaults::BuiltinDefaults;
use super::load::{load_layer, ConfigError};

/// Schema version for effective_settings
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "tierwise/effective_settings@1";

/// Where each tier's layer document lives
#[derive(Debug, Clone, Default)]
pub struct TierPaths {
    pub service: Option<PathBuf>,
    pub account: Option<PathBuf>,
    pub user: Option<PathBuf>,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigSource {
    /// Tier of this source
    pub tier: Tier,

    /// File path (None for builtin defaults)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin defaults)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// The loaded layers of one resolution chain, lowest precedence first
#[derive(Debug, Clone)]
pub struct TierStack {
    service: ConfigurationLayer,
    account: Option<ConfigurationLayer>,
    user: Option<ConfigurationLayer>,
    sources: Vec<ConfigSource>,
}

impl TierStack {
    /// Load every tier that has a document on disk
    ///
    /// Missing account or user documents mean the tier has no opinion. A
    /// missing service document falls back to the built-in defaults.
    pub fn load(paths: &TierPaths) -> Result<Self, ConfigError> {
        let mut sources = Vec::new();

        let service = match existing(paths.service.as_deref()) {
            Some(path) => {
                let loaded = load_layer(path, Tier::Service)?;
                sources.push(file_source(Tier::Service, path, loaded.digest));
                loaded.layer
            }
            None => {
                if let Some(path) = &paths.service {
                    warn!(path = %path.display(), "service layer not found, using built-in defaults");
                }
                sources.push(ConfigSource {
                    tier: Tier::Service,
                    path: None,
                    digest: None,
                });
                BuiltinDefaults::default().to_layer()?
            }
        };

        let mut overrides = [None, None];
        for (slot, (tier, path)) in overrides
            .iter_mut()
            .zip([(Tier::Account, &paths.account), (Tier::User, &paths.user)])
        {
            match existing(path.as_deref()) {
                Some(path) => {
                    let loaded = load_layer(path, tier)?;
                    sources.push(file_source(tier, path, loaded.digest));
                    *slot = Some(loaded.layer);
                }
                None => debug!(%tier, "no layer document, tier has no opinion"),
            }
        }
        let [account, user] = overrides;

        Ok(Self {
            service,
            account,
            user,
            sources,
        })
    }

    /// Build a stack from already-loaded layers
    ///
    /// Each layer must belong to the tier of its slot; the service layer is
    /// required.
    pub fn from_layers(
        service: ConfigurationLayer,
        account: Option<ConfigurationLayer>,
        user: Option<ConfigurationLayer>,
    ) -> Result<Self, ConfigError> {
        let slots = [
            (Tier::Service, Some(&service)),
            (Tier::Account, account.as_ref()),
            (Tier::User, user.as_ref()),
        ];
        let mut sources = Vec::new();
        for (expected, layer) in slots {
            let Some(layer) = layer else { continue };
            if layer.tier() != expected {
                return Err(ConfigError::TierMismatch {
                    expected,
                    found: layer.tier(),
                });
            }
            sources.push(ConfigSource {
                tier: expected,
                path: None,
                digest: None,
            });
        }
        Ok(Self {
            service,
            account,
            user,
            sources,
        })
    }

    pub fn service(&self) -> &ConfigurationLayer {
        &self.service
    }

    /// Overrides in ascending precedence
    pub fn overrides(&self) -> Vec<ConfigurationLayer> {
        self.account.iter().chain(self.user.iter()).cloned().collect()
    }

    /// The layer for `tier`, or an empty layer when the tier has no document
    pub fn layer(&self, tier: Tier) -> ConfigurationLayer {
        let layer = match tier {
            Tier::Service => Some(&self.service),
            Tier::Account => self.account.as_ref(),
            Tier::User => self.user.as_ref(),
        };
        layer
            .cloned()
            .unwrap_or_else(|| ConfigurationLayer::empty(tier))
    }

    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    pub fn resolve(&self) -> Resolution {
        resolve_detailed(&self.service, &self.overrides())
    }
}

fn existing(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.exists())
}

fn file_source(tier: Tier, path: &Path, digest: String) -> ConfigSource {
    ConfigSource {
        tier,
        path: Some(path.to_string_lossy().to_string()),
        digest: Some(digest),
    }
}

/// Effective settings with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveSettings {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When these settings were computed
    pub created_at: DateTime<Utc>,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,

    /// The resolved settings
    pub settings: ResolvedConfiguration,

    /// Every lock in force after the last tier
    pub locks: LockSet,

    /// Winning tier per field and list, and lock owners
    pub provenance: Provenance,

    /// Ignored or blocked overrides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,

    /// SHA-256 of the canonical (RFC 8785) JSON of `settings`
    pub resolution_digest: String,
}

impl EffectiveSettings {
    /// Load the tiers found at `paths` and resolve them
    pub fn build(paths: &TierPaths) -> Result<Self, ConfigError> {
        let stack = TierStack::load(paths)?;
        Self::from_stack(&stack)
    }

    /// Resolve an already-loaded stack
    pub fn from_stack(stack: &TierStack) -> Result<Self, ConfigError> {
        let resolution = stack.resolve();
        for diagnostic in &resolution.diagnostics {
            debug!(%diagnostic, "resolution diagnostic");
        }

        let resolution_digest = digest_settings(&resolution.config)?;
        info!(
            sources = stack.sources().len(),
            diagnostics = resolution.diagnostics.len(),
            digest = %resolution_digest,
            "resolved effective settings"
        );

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            sources: stack.sources().to_vec(),
            settings: resolution.config,
            locks: resolution.locks,
            provenance: resolution.provenance,
            diagnostics: resolution.diagnostics,
            resolution_digest,
        })
    }

    /// The resolution this record was built from
    pub fn resolution(&self) -> Resolution {
        Resolution {
            config: self.settings.clone(),
            locks: self.locks.clone(),
            provenance: self.provenance.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Get a resolved field value
    pub fn get(&self, field: &str) -> Option<&ScalarValue> {
        self.settings.get(field)
    }

    /// Get a resolved field as string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.settings.get_str(field)
    }

    /// Get a resolved field as bool
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.settings.get_bool(field)
    }

    /// Get a resolved list
    pub fn list(&self, name: &str) -> Option<&[ListItem]> {
        self.settings.list(name)
    }
}

/// SHA-256 hex digest of the RFC 8785 canonical JSON of `settings`
pub fn digest_settings(settings: &ResolvedConfiguration) -> Result<String, ConfigError> {
    let jcs_bytes = serde_json_canonicalizer::to_vec(settings)
        .map_err(|e| ConfigError::Serialize(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&jcs_bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{}", contents).unwrap();
        path
    }

    #[test]
    fn test_build_with_defaults_only() {
        let settings = EffectiveSettings::build(&TierPaths::default()).unwrap();

        assert_eq!(settings.schema_version, SCHEMA_VERSION);
        assert_eq!(settings.schema_id, SCHEMA_ID);
        assert_eq!(settings.get_str(keys::DISPLAY_MODE), Some("tiles"));
        assert_eq!(settings.sources.len(), 1);
        assert_eq!(settings.sources[0].tier, Tier::Service);
        assert!(settings.sources[0].path.is_none());
        assert!(settings.locks.is_empty());
    }

    #[test]
    fn test_missing_override_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let paths = TierPaths {
            service: None,
            account: Some(dir.path().join("account.toml")),
            user: Some(dir.path().join("user.toml")),
        };
        let settings = EffectiveSettings::build(&paths).unwrap();
        assert_eq!(settings.sources.len(), 1);
    }

    #[test]
    fn test_build_with_account_and_user_files() {
        let dir = tempfile::tempdir().unwrap();
        let account = write_temp(
            dir.path(),
            "account.toml",
            "[fields]\ndisplay_mode = \"grid\"\n\n[locked]\nfields = [\"display_mode\"]\n",
        );
        let user = write_temp(
            dir.path(),
            "user.json",
            r#"{"fields": {"display_mode": "list", "dark_mode": true}}"#,
        );

        let settings = EffectiveSettings::build(&TierPaths {
            service: None,
            account: Some(account),
            user: Some(user),
        })
        .unwrap();

        assert_eq!(settings.get_str(keys::DISPLAY_MODE), Some("grid"));
        assert_eq!(settings.get_bool(keys::DARK_MODE), Some(true));
        assert_eq!(settings.provenance.fields[keys::DARK_MODE], Tier::User);
        assert_eq!(settings.sources.len(), 3);
        assert!(settings.sources.iter().skip(1).all(|s| s.digest.is_some()));
        assert_eq!(settings.diagnostics.len(), 1);
    }

    #[test]
    fn test_digest_is_stable_across_builds() {
        let first = EffectiveSettings::build(&TierPaths::default()).unwrap();
        let second = EffectiveSettings::build(&TierPaths::default()).unwrap();
        assert_eq!(first.resolution_digest, second.resolution_digest);
        assert_eq!(first.resolution_digest.len(), 64);
    }

    #[test]
    fn test_invalid_file_fails_build() {
        let mut temp = Builder::new().suffix(".json").tempfile().unwrap();
        write!(temp, "{{\"lists\": {{\"widgets\": [{{\"id\": \"\"}}]}}}}").unwrap();

        let result = EffectiveSettings::build(&TierPaths {
            user: Some(temp.path().to_path_buf()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidLayer(_))));
    }

    #[test]
    fn test_stack_layer_falls_back_to_empty() {
        let stack = TierStack::load(&TierPaths::default()).unwrap();
        assert!(stack.layer(Tier::User).is_empty());
        assert_eq!(stack.layer(Tier::User).tier(), Tier::User);
        assert!(stack.overrides().is_empty());
    }

    #[test]
    fn test_from_layers_without_files() {
        let service = BuiltinDefaults::default().to_layer().unwrap();
        let user = ConfigurationLayer::builder(Tier::User)
            .field(keys::DARK_MODE, true)
            .build()
            .unwrap();
        let stack = TierStack::from_layers(service, None, Some(user)).unwrap();

        assert_eq!(stack.overrides().len(), 1);
        assert!(stack.layer(Tier::Account).is_empty());
        assert!(stack.sources().iter().all(|s| s.path.is_none()));

        let settings = EffectiveSettings::from_stack(&stack).unwrap();
        assert_eq!(settings.get_bool(keys::DARK_MODE), Some(true));
        assert_eq!(settings.sources[1].tier, Tier::User);
        assert_eq!(settings.resolution().config, settings.settings);
    }

    #[test]
    fn test_from_layers_rejects_layer_in_wrong_slot() {
        let service = BuiltinDefaults::default().to_layer().unwrap();
        let user = ConfigurationLayer::builder(Tier::User)
            .field(keys::DARK_MODE, true)
            .build()
            .unwrap();

        let result = TierStack::from_layers(service, Some(user), None);
        assert!(matches!(
            result,
            Err(ConfigError::TierMismatch {
                expected: Tier::Account,
                found: Tier::User,
            })
        ));
    }

    #[test]
    fn test_write_to_file_round_trips_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effective_settings.json");
        let settings = EffectiveSettings::build(&TierPaths::default()).unwrap();
        settings.write_to_file(&path).unwrap();

        let parsed: EffectiveSettings =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.settings, settings.settings);
        assert_eq!(parsed.resolution_digest, settings.resolution_digest);
    }
}
