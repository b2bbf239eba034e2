//! Resolution output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::diagnostic::Diagnostic;
use crate::error::LayerError;
use crate::item::{ItemId, ListItem};
use crate::layer::{ConfigurationLayer, LayerBody};
use crate::locks::LockSet;
use crate::tier::Tier;
use crate::value::ScalarValue;

/// The effective configuration: every base field and list, fully populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfiguration {
    #[serde(default)]
    pub fields: BTreeMap<String, ScalarValue>,

    #[serde(default)]
    pub lists: BTreeMap<String, Vec<ListItem>>,
}

impl ResolvedConfiguration {
    pub fn get(&self, field: &str) -> Option<&ScalarValue> {
        self.fields.get(field)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(ScalarValue::as_bool)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(ScalarValue::as_i64)
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(ScalarValue::as_f64)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(ScalarValue::as_str)
    }

    pub fn list(&self, name: &str) -> Option<&[ListItem]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    /// Ids of the visible items of `name`, in order.
    pub fn visible_items(&self, name: &str) -> Vec<&ItemId> {
        self.list(name)
            .unwrap_or_default()
            .iter()
            .filter(|item| item.visible)
            .map(|item| &item.id)
            .collect()
    }

    /// Re-express this configuration as a lock-free layer owned by `tier`.
    ///
    /// Fails only when the configuration was deserialized from an invalid
    /// document (duplicate ids, non-finite numbers).
    pub fn to_layer(&self, tier: Tier) -> Result<ConfigurationLayer, LayerError> {
        ConfigurationLayer::new(
            tier,
            LayerBody {
                fields: self.fields.clone(),
                lists: self.lists.clone(),
                locked: LockSet::default(),
            },
        )
    }
}

/// Which tier produced each part of a resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Tier whose value each field ended up with.
    pub fields: BTreeMap<String, Tier>,

    /// Tier whose ordering each list ended up with.
    pub lists: BTreeMap<String, Tier>,

    /// Tier that first locked each field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_locks: BTreeMap<String, Tier>,

    /// Tier that first locked each whole list.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub list_locks: BTreeMap<String, Tier>,

    /// Tier that first locked each item, keyed by list.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub item_locks: BTreeMap<String, BTreeMap<ItemId, Tier>>,
}

impl Provenance {
    pub fn field_lock(&self, field: &str) -> Option<Tier> {
        self.field_locks.get(field).copied()
    }

    pub fn list_lock(&self, list: &str) -> Option<Tier> {
        self.list_locks.get(list).copied()
    }

    pub fn item_lock(&self, list: &str, id: &ItemId) -> Option<Tier> {
        self.item_locks.get(list).and_then(|ids| ids.get(id)).copied()
    }
}

/// Resolved configuration plus everything learned while resolving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub config: ResolvedConfiguration,

    /// Union of every lock declared along the chain.
    pub locks: LockSet,

    pub provenance: Provenance,

    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// Diagnostics reporting overrides blocked by locks.
    pub fn blocked(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_blocked())
    }
}
