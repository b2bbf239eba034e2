//! Configuration layers: one tier's partial opinion plus its locks.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::LayerError;
use crate::item::{ItemId, ListItem};
use crate::locks::LockSet;
use crate::tier::Tier;
use crate::value::ScalarValue;

/// Unvalidated document shape of a layer, as produced by a tier store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerBody {
    /// Scalar fields this tier has an opinion on.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, ScalarValue>,

    /// Ordered item lists this tier supplies.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub lists: BTreeMap<String, Vec<ListItem>>,

    /// Locks binding every later tier.
    #[serde(default, skip_serializing_if = "LockSet::is_empty")]
    pub locked: LockSet,
}

/// A validated, immutable configuration layer.
///
/// Item ids are unique within each list, names are non-empty and every
/// number is finite. Build one with [`ConfigurationLayer::new`] or
/// [`ConfigurationLayer::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationLayer {
    tier: Tier,
    body: LayerBody,
}

impl ConfigurationLayer {
    /// Validate `body` and wrap it as a layer owned by `tier`.
    pub fn new(tier: Tier, body: LayerBody) -> Result<Self, LayerError> {
        validate(tier, &body)?;
        Ok(Self { tier, body })
    }

    /// A layer with no opinions and no locks.
    pub fn empty(tier: Tier) -> Self {
        Self {
            tier,
            body: LayerBody::default(),
        }
    }

    pub fn builder(tier: Tier) -> LayerBuilder {
        LayerBuilder {
            tier,
            body: LayerBody::default(),
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn fields(&self) -> &BTreeMap<String, ScalarValue> {
        &self.body.fields
    }

    pub fn field(&self, name: &str) -> Option<&ScalarValue> {
        self.body.fields.get(name)
    }

    pub fn lists(&self) -> &BTreeMap<String, Vec<ListItem>> {
        &self.body.lists
    }

    pub fn list(&self, name: &str) -> Option<&[ListItem]> {
        self.body.lists.get(name).map(Vec::as_slice)
    }

    pub fn locks(&self) -> &LockSet {
        &self.body.locked
    }

    pub fn is_empty(&self) -> bool {
        self.body.fields.is_empty() && self.body.lists.is_empty() && self.body.locked.is_empty()
    }

    /// The serializable document for this layer.
    pub fn to_body(&self) -> LayerBody {
        self.body.clone()
    }

    pub fn into_body(self) -> LayerBody {
        self.body
    }
}

/// Incremental construction of a [`ConfigurationLayer`].
#[derive(Debug, Clone)]
pub struct LayerBuilder {
    tier: Tier,
    body: LayerBody,
}

impl LayerBuilder {
    pub fn field(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.body.fields.insert(name.into(), value.into());
        self
    }

    pub fn list(mut self, name: impl Into<String>, items: impl IntoIterator<Item = ListItem>) -> Self {
        self.body.lists.insert(name.into(), items.into_iter().collect());
        self
    }

    pub fn lock_field(mut self, name: impl Into<String>) -> Self {
        self.body.locked.lock_field(name);
        self
    }

    pub fn lock_list(mut self, name: impl Into<String>) -> Self {
        self.body.locked.lock_list(name);
        self
    }

    pub fn lock_item(mut self, list: impl Into<String>, id: impl Into<ItemId>) -> Self {
        self.body.locked.lock_item(list, id);
        self
    }

    pub fn build(self) -> Result<ConfigurationLayer, LayerError> {
        ConfigurationLayer::new(self.tier, self.body)
    }
}

fn validate(tier: Tier, body: &LayerBody) -> Result<(), LayerError> {
    for (name, value) in &body.fields {
        if name.is_empty() {
            return Err(LayerError::EmptyName { tier, what: "field" });
        }
        if !value.is_finite() {
            return Err(LayerError::NonFiniteValue {
                tier,
                path: name.clone(),
            });
        }
    }

    for (list, items) in &body.lists {
        if list.is_empty() {
            return Err(LayerError::EmptyName { tier, what: "list" });
        }
        let mut seen: HashSet<&ItemId> = HashSet::with_capacity(items.len());
        for item in items {
            if item.id.as_str().is_empty() {
                return Err(LayerError::EmptyItemId {
                    tier,
                    list: list.clone(),
                });
            }
            if !seen.insert(&item.id) {
                return Err(LayerError::DuplicateItem {
                    tier,
                    list: list.clone(),
                    id: item.id.to_string(),
                });
            }
            for (attr, value) in &item.attributes {
                if !value.is_finite() {
                    return Err(LayerError::NonFiniteValue {
                        tier,
                        path: format!("{}.{}.{}", list, item.id, attr),
                    });
                }
            }
        }
    }

    let locks = &body.locked;
    if locks.fields.iter().any(String::is_empty) {
        return Err(LayerError::EmptyName { tier, what: "locked field" });
    }
    if locks.lists.iter().any(String::is_empty) || locks.items.keys().any(String::is_empty) {
        return Err(LayerError::EmptyName { tier, what: "locked list" });
    }
    for (list, ids) in &locks.items {
        if ids.iter().any(|id| id.as_str().is_empty()) {
            return Err(LayerError::EmptyItemId {
                tier,
                list: list.clone(),
            });
        }
    }

    Ok(())
}
