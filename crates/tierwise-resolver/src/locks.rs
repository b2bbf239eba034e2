//! Lock declarations and their accumulation.
//!
//! A lock freezes a field, a whole list, or a single list item as of the
//! layer that declares it. Lock sets only ever grow while layers are applied.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::item::ItemId;

/// Locks declared by one layer, or accumulated across several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSet {
    /// Scalar fields that later layers may not override.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub fields: BTreeSet<String>,

    /// Lists whose order, membership and visibility are frozen.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub lists: BTreeSet<String>,

    /// Individual items frozen within a list, keyed by list name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub items: BTreeMap<String, BTreeSet<ItemId>>,
}

impl LockSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.lists.is_empty()
            && self.items.values().all(BTreeSet::is_empty)
    }

    pub fn lock_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.fields.insert(field.into());
        self
    }

    pub fn lock_list(&mut self, list: impl Into<String>) -> &mut Self {
        self.lists.insert(list.into());
        self
    }

    pub fn lock_item(&mut self, list: impl Into<String>, id: impl Into<ItemId>) -> &mut Self {
        self.items.entry(list.into()).or_default().insert(id.into());
        self
    }

    pub fn is_field_locked(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn is_list_locked(&self, list: &str) -> bool {
        self.lists.contains(list)
    }

    pub fn is_item_locked(&self, list: &str, id: &ItemId) -> bool {
        self.items.get(list).is_some_and(|ids| ids.contains(id))
    }

    /// Item ids locked within `list`.
    pub fn locked_items(&self, list: &str) -> impl Iterator<Item = &ItemId> {
        self.items.get(list).into_iter().flatten()
    }

    /// Union `other` into `self`. Nothing is ever removed.
    pub fn absorb(&mut self, other: &LockSet) {
        self.fields.extend(other.fields.iter().cloned());
        self.lists.extend(other.lists.iter().cloned());
        for (list, ids) in &other.items {
            if ids.is_empty() {
                continue;
            }
            self.items
                .entry(list.clone())
                .or_default()
                .extend(ids.iter().cloned());
        }
    }
}
