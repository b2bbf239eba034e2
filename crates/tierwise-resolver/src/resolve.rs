//! Public resolution entry points.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::diagnostic::Diagnostic;
use crate::fields::FieldMerge;
use crate::layer::ConfigurationLayer;
use crate::lists::ListMerge;
use crate::locks::LockSet;
use crate::resolved::{Provenance, Resolution, ResolvedConfiguration};

/// Resolve `base` and `overrides` (ascending precedence) into one
/// configuration.
///
/// Pure and total: unknown names, ill-typed values and blocked overrides are
/// skipped. Use [`resolve_detailed`] to see what was skipped.
pub fn resolve(base: &ConfigurationLayer, overrides: &[ConfigurationLayer]) -> ResolvedConfiguration {
    resolve_detailed(base, overrides).config
}

/// Like [`resolve`], also returning provenance, effective locks and
/// diagnostics.
pub fn resolve_detailed(base: &ConfigurationLayer, overrides: &[ConfigurationLayer]) -> Resolution {
    let mut diagnostics = Vec::new();
    let mut fields = FieldMerge::from_base(base);
    let mut lists: BTreeMap<String, ListMerge> = base
        .lists()
        .iter()
        .map(|(name, items)| (name.clone(), ListMerge::new(name.clone(), items, base.tier())))
        .collect();
    let mut locks = LockSet::new();

    seal(base, &mut fields, &mut lists, &mut locks, &mut diagnostics);

    let mut previous = base.tier();
    for layer in overrides {
        let tier = layer.tier();
        if tier <= previous {
            warn!(%previous, %tier, "override layers out of tier order");
            diagnostics.push(Diagnostic::TierOrder { previous, tier });
        }
        previous = tier;

        debug!(
            %tier,
            fields = layer.fields().len(),
            lists = layer.lists().len(),
            "applying layer"
        );

        fields.apply(layer, &mut diagnostics);
        for (name, candidate) in layer.lists() {
            match lists.get_mut(name) {
                Some(list) => list.apply(tier, candidate, &mut diagnostics),
                None => diagnostics.push(Diagnostic::UnknownList {
                    tier,
                    list: name.clone(),
                }),
            }
        }

        seal(layer, &mut fields, &mut lists, &mut locks, &mut diagnostics);
    }

    let provenance = Provenance {
        fields: fields.origins(),
        lists: lists
            .iter()
            .map(|(name, list)| (name.clone(), list.origin()))
            .collect(),
        field_locks: fields.lock_owners(),
        list_locks: lists
            .iter()
            .filter_map(|(name, list)| list.frozen_by().map(|tier| (name.clone(), tier)))
            .collect(),
        item_locks: lists
            .iter()
            .map(|(name, list)| (name.clone(), list.pin_owners()))
            .filter(|(_, owners)| !owners.is_empty())
            .collect(),
    };

    let config = ResolvedConfiguration {
        fields: fields.values(),
        lists: lists
            .into_iter()
            .map(|(name, list)| (name, list.items().to_vec()))
            .collect(),
    };

    debug!(
        layers = overrides.len() + 1,
        diagnostics = diagnostics.len(),
        "resolution complete"
    );

    Resolution {
        config,
        locks,
        provenance,
        diagnostics,
    }
}

/// Fold the locks `layer` declares into the running state. They bind only
/// layers applied after this one.
fn seal(
    layer: &ConfigurationLayer,
    fields: &mut FieldMerge,
    lists: &mut BTreeMap<String, ListMerge>,
    locks: &mut LockSet,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let declared = layer.locks();
    if declared.is_empty() {
        return;
    }
    let tier = layer.tier();

    for field in &declared.fields {
        if !fields.is_defined(field) {
            diagnostics.push(Diagnostic::LockTargetMissing {
                tier,
                target: field.clone(),
            });
        }
    }
    fields.seal(layer);

    let mut targets: Vec<&String> = declared.lists.iter().collect();
    targets.extend(declared.items.keys().filter(|name| !declared.lists.contains(*name)));
    for name in targets {
        match lists.get_mut(name) {
            Some(list) => list.seal(
                tier,
                declared.is_list_locked(name),
                declared.locked_items(name),
            ),
            None => diagnostics.push(Diagnostic::LockTargetMissing {
                tier,
                target: name.clone(),
            }),
        }
    }

    locks.absorb(declared);
}
