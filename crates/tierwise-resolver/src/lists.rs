//! Ordered list merge.
//!
//! Lists merge by item id. The latest layer that supplies a list provides
//! the candidate order, and items it leaves out are appended in their
//! running order so nothing silently disappears.
//!
//! Two lock levels apply:
//!
//! - a whole-list lock freezes order, membership and visibility; later
//!   layers may only change other attributes of items that are not
//!   item-locked.
//! - an item lock pins one entry as it was when the lock was declared. If a
//!   later candidate names the item, the pinned entry is substituted in
//!   place. If it leaves the item out, the pinned entry follows the
//!   candidate's items, ahead of the unnamed items.
//!
//! Every open merge is a stable partition of the running list (named items,
//! then omitted pins, then the rest), so re-resolving a resolved list
//! against the same layers reproduces it.

use std::collections::{BTreeMap, HashSet};
use tracing::trace;

use crate::diagnostic::Diagnostic;
use crate::item::{ItemId, ListItem};
use crate::tier::Tier;

/// A pinned item. `entry` is `None` when the id was absent at lock time,
/// which freezes the absence.
#[derive(Debug, Clone)]
struct Pin {
    entry: Option<ListItem>,
    locked_by: Tier,
}

/// Running state of one list.
#[derive(Debug, Clone)]
pub(crate) struct ListMerge {
    name: String,
    items: Vec<ListItem>,
    origin: Tier,
    frozen_by: Option<Tier>,
    pins: BTreeMap<ItemId, Pin>,
}

impl ListMerge {
    pub(crate) fn new(name: impl Into<String>, items: &[ListItem], origin: Tier) -> Self {
        Self {
            name: name.into(),
            items: items.to_vec(),
            origin,
            frozen_by: None,
            pins: BTreeMap::new(),
        }
    }

    /// Merge one layer's candidate list into the running list.
    pub(crate) fn apply(&mut self, tier: Tier, candidate: &[ListItem], diagnostics: &mut Vec<Diagnostic>) {
        match self.frozen_by {
            Some(locked_by) => self.apply_frozen(tier, locked_by, candidate, diagnostics),
            None => self.apply_open(tier, candidate, diagnostics),
        }
    }

    fn apply_open(&mut self, tier: Tier, candidate: &[ListItem], diagnostics: &mut Vec<Diagnostic>) {
        let mut merged: Vec<ListItem> = Vec::with_capacity(self.items.len().max(candidate.len()));
        let mut named: HashSet<&ItemId> = HashSet::with_capacity(candidate.len());

        for item in candidate {
            named.insert(&item.id);
            match self.pins.get(&item.id) {
                Some(pin) => {
                    let locked = pin.entry.as_ref();
                    if locked != Some(item) {
                        trace!(list = %self.name, id = %item.id, %tier, "item override blocked");
                        diagnostics.push(Diagnostic::ItemLocked {
                            tier,
                            list: self.name.clone(),
                            id: item.id.clone(),
                            locked_by: pin.locked_by,
                        });
                    }
                    if let Some(entry) = locked {
                        merged.push(entry.clone());
                    }
                }
                None => merged.push(item.clone()),
            }
        }

        // Pinned items the candidate left out come next, then everything
        // else it left out, both in running order.
        let omitted: Vec<&ListItem> = self
            .items
            .iter()
            .filter(|item| !named.contains(&item.id))
            .collect();
        for item in &omitted {
            if let Some(entry) = self.pins.get(&item.id).and_then(|pin| pin.entry.as_ref()) {
                merged.push(entry.clone());
            }
        }
        for item in omitted {
            if !self.pins.contains_key(&item.id) {
                merged.push(item.clone());
            }
        }

        self.items = merged;
        self.origin = tier;
    }

    fn apply_frozen(
        &mut self,
        tier: Tier,
        locked_by: Tier,
        candidate: &[ListItem],
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let same_shape = candidate.len() == self.items.len()
            && candidate
                .iter()
                .zip(&self.items)
                .all(|(c, r)| c.id == r.id && c.visible == r.visible);
        if !same_shape {
            trace!(list = %self.name, %tier, %locked_by, "list override blocked");
            diagnostics.push(Diagnostic::ListLocked {
                tier,
                list: self.name.clone(),
                locked_by,
            });
        }

        for item in candidate {
            if item.attributes.is_empty() {
                continue;
            }
            if let Some(pin) = self.pins.get(&item.id) {
                let unchanged = pin
                    .entry
                    .as_ref()
                    .is_some_and(|entry| entry.attributes == item.attributes);
                if !unchanged {
                    diagnostics.push(Diagnostic::ItemLocked {
                        tier,
                        list: self.name.clone(),
                        id: item.id.clone(),
                        locked_by: pin.locked_by,
                    });
                }
                continue;
            }
            if let Some(current) = self.items.iter_mut().find(|r| r.id == item.id) {
                current
                    .attributes
                    .extend(item.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
    }

    /// Record the list-level and item-level locks `tier` declares.
    pub(crate) fn seal<'a>(
        &mut self,
        tier: Tier,
        freeze: bool,
        pinned: impl IntoIterator<Item = &'a ItemId>,
    ) {
        if freeze {
            self.frozen_by.get_or_insert(tier);
        }
        for id in pinned {
            if self.pins.contains_key(id) {
                continue;
            }
            let entry = self.items.iter().find(|item| &item.id == id).cloned();
            self.pins.insert(
                id.clone(),
                Pin {
                    entry,
                    locked_by: tier,
                },
            );
        }
    }

    pub(crate) fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub(crate) fn origin(&self) -> Tier {
        self.origin
    }

    pub(crate) fn frozen_by(&self) -> Option<Tier> {
        self.frozen_by
    }

    pub(crate) fn pin_owners(&self) -> BTreeMap<ItemId, Tier> {
        self.pins
            .iter()
            .map(|(id, pin)| (id.clone(), pin.locked_by))
            .collect()
    }
}
