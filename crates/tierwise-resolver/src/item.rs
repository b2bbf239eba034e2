//! Ordered list items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::value::ScalarValue;

/// Stable identity of a list item (e.g. a widget id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

fn default_visible() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// One entry of an ordered item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: ItemId,

    /// Whether the item is shown. Hidden items keep their slot in the order.
    #[serde(default = "default_visible", skip_serializing_if = "is_true")]
    pub visible: bool,

    /// Additional per-item attributes (size, column, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, ScalarValue>,
}

impl ListItem {
    /// A visible item with no attributes.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            visible: true,
            attributes: BTreeMap::new(),
        }
    }

    /// A hidden item with no attributes.
    pub fn hidden(id: impl Into<ItemId>) -> Self {
        Self {
            visible: false,
            ..Self::new(id)
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_defaults_to_true() {
        let item: ListItem = serde_json::from_str(r#"{"id": "news"}"#).unwrap();
        assert_eq!(item.id.as_str(), "news");
        assert!(item.visible);
        assert!(item.attributes.is_empty());
    }

    #[test]
    fn test_serialization_skips_defaults() {
        let json = serde_json::to_string(&ListItem::new("news")).unwrap();
        assert_eq!(json, r#"{"id":"news"}"#);

        let json = serde_json::to_string(&ListItem::hidden("news").with_attribute("size", 2i64))
            .unwrap();
        assert_eq!(json, r#"{"id":"news","visible":false,"attributes":{"size":2}}"#);
    }
}
