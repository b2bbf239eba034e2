//! Deriving a tier's override layer from an edited configuration.
//!
//! A settings screen shows the resolved configuration, the user edits it,
//! and the edit is turned back into a partial layer for one tier. The draft
//! starts from that tier's current layer so existing opinions survive, then
//! records every edit that differs from the resolution and is not locked by
//! a lower tier. Under a whole-list lock only attribute edits survive,
//! matching what the resolver lets through.

use tracing::debug;

use crate::diagnostic::Diagnostic;
use crate::error::LayerError;
use crate::item::ListItem;
use crate::layer::ConfigurationLayer;
use crate::resolved::{Provenance, Resolution, ResolvedConfiguration};
use crate::tier::Tier;

/// A candidate layer for one tier, plus edits that could not be kept.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideDraft {
    pub layer: ConfigurationLayer,

    /// Edits left out of the draft, with the reason.
    pub skipped: Vec<Diagnostic>,
}

impl OverrideDraft {
    /// Whether any edit was dropped because of a lock.
    pub fn has_blocked(&self) -> bool {
        self.skipped.iter().any(Diagnostic::is_blocked)
    }
}

/// Build a new layer for `current.tier()` from `edited`.
///
/// `resolution` must come from resolving the chain that `current` belongs
/// to. Locks owned by `current`'s own tier or above do not block edits.
pub fn derive_override(
    resolution: &Resolution,
    current: &ConfigurationLayer,
    edited: &ResolvedConfiguration,
) -> Result<OverrideDraft, LayerError> {
    let tier = current.tier();
    let resolved = &resolution.config;
    let provenance = &resolution.provenance;
    let binds = |owner: Option<Tier>| owner.filter(|owner| *owner < tier);

    let mut body = current.to_body();
    let mut skipped = Vec::new();

    for (name, value) in &edited.fields {
        let Some(resolved_value) = resolved.get(name) else {
            skipped.push(Diagnostic::UnknownField {
                tier,
                field: name.clone(),
            });
            continue;
        };
        if value == resolved_value {
            continue;
        }
        if let Some(locked_by) = binds(provenance.field_lock(name)) {
            skipped.push(Diagnostic::FieldLocked {
                tier,
                field: name.clone(),
                locked_by,
            });
            continue;
        }
        if !value.fits(resolved_value.kind()) {
            skipped.push(Diagnostic::KindMismatch {
                tier,
                field: name.clone(),
                expected: resolved_value.kind(),
                found: value.kind(),
            });
            continue;
        }
        body.fields.insert(name.clone(), value.clone());
    }

    for (name, items) in &edited.lists {
        let Some(resolved_items) = resolved.list(name) else {
            skipped.push(Diagnostic::UnknownList {
                tier,
                list: name.clone(),
            });
            continue;
        };
        if items.as_slice() == resolved_items {
            continue;
        }
        if let Some(locked_by) = binds(provenance.list_lock(name)) {
            let drafted = draft_frozen_list(
                tier,
                name,
                locked_by,
                provenance,
                resolved_items,
                items,
                &mut skipped,
            );
            if drafted.as_slice() != resolved_items {
                body.lists.insert(name.clone(), drafted);
            }
            continue;
        }

        // Locked entries stay in the draft so the resolver substitutes them
        // where the edit placed them.
        let mut drafted: Vec<ListItem> = Vec::with_capacity(items.len());
        for item in items {
            let Some(locked_by) = binds(provenance.item_lock(name, &item.id)) else {
                drafted.push(item.clone());
                continue;
            };
            let locked = resolved_items.iter().find(|r| r.id == item.id);
            if locked != Some(item) {
                skipped.push(Diagnostic::ItemLocked {
                    tier,
                    list: name.clone(),
                    id: item.id.clone(),
                    locked_by,
                });
            }
            if let Some(locked) = locked {
                drafted.push(locked.clone());
            }
        }
        body.lists.insert(name.clone(), drafted);
    }

    let layer = ConfigurationLayer::new(tier, body)?;
    debug!(
        %tier,
        fields = layer.fields().len(),
        lists = layer.lists().len(),
        skipped = skipped.len(),
        "drafted override layer"
    );

    Ok(OverrideDraft { layer, skipped })
}

/// Draft a list whose order, membership and visibility a lower tier froze.
///
/// The draft keeps the resolved shape and carries only attribute edits on
/// items that are not item-locked. Attributes can be set but not removed.
fn draft_frozen_list(
    tier: Tier,
    name: &str,
    locked_by: Tier,
    provenance: &Provenance,
    resolved_items: &[ListItem],
    items: &[ListItem],
    skipped: &mut Vec<Diagnostic>,
) -> Vec<ListItem> {
    let reshaped = items.len() != resolved_items.len()
        || items
            .iter()
            .zip(resolved_items)
            .any(|(edit, current)| edit.id != current.id || edit.visible != current.visible);
    let mut blocked = reshaped;

    let mut drafted = Vec::with_capacity(resolved_items.len());
    for current in resolved_items {
        let Some(edit) = items.iter().find(|item| item.id == current.id) else {
            drafted.push(current.clone());
            continue;
        };
        if edit.attributes == current.attributes {
            drafted.push(current.clone());
            continue;
        }
        let item_owner = provenance
            .item_lock(name, &current.id)
            .filter(|owner| *owner < tier);
        if let Some(item_owner) = item_owner {
            skipped.push(Diagnostic::ItemLocked {
                tier,
                list: name.to_string(),
                id: current.id.clone(),
                locked_by: item_owner,
            });
            drafted.push(current.clone());
            continue;
        }
        blocked |= current
            .attributes
            .keys()
            .any(|key| !edit.attributes.contains_key(key));
        drafted.push(ListItem {
            attributes: edit.attributes.clone(),
            ..current.clone()
        });
    }

    if blocked {
        skipped.push(Diagnostic::ListLocked {
            tier,
            list: name.to_string(),
            locked_by,
        });
    }
    drafted
}
