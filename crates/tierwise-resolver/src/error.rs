//! Layer construction errors.

use crate::tier::Tier;

/// A structural problem that prevents a layer from being built.
///
/// These are the only failures in the crate; resolution itself is total
/// over validated layers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    #[error("{tier} layer: list '{list}' contains item '{id}' more than once")]
    DuplicateItem { tier: Tier, list: String, id: String },

    #[error("{tier} layer: list '{list}' contains an item with an empty id")]
    EmptyItemId { tier: Tier, list: String },

    #[error("{tier} layer: empty {what} name")]
    EmptyName { tier: Tier, what: &'static str },

    #[error("{tier} layer: value at '{path}' is not a finite number")]
    NonFiniteValue { tier: Tier, path: String },
}
