//! Scalar field merge.
//!
//! Each field walks the layers in precedence order. A layer's value is
//! adopted unless an earlier layer locked the field; a lock declared by a
//! layer applies from the next layer on.

use std::collections::BTreeMap;
use tracing::trace;

use crate::diagnostic::Diagnostic;
use crate::layer::ConfigurationLayer;
use crate::tier::Tier;
use crate::value::{ScalarValue, ValueKind};

#[derive(Debug)]
struct FieldState {
    value: ScalarValue,
    kind: ValueKind,
    origin: Tier,
    locked_by: Option<Tier>,
}

/// Running state of every scalar field defined by the base layer.
#[derive(Debug)]
pub(crate) struct FieldMerge {
    fields: BTreeMap<String, FieldState>,
}

impl FieldMerge {
    pub(crate) fn from_base(base: &ConfigurationLayer) -> Self {
        let fields = base
            .fields()
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    FieldState {
                        kind: value.kind(),
                        value: value.clone(),
                        origin: base.tier(),
                        locked_by: None,
                    },
                )
            })
            .collect();
        Self { fields }
    }

    pub(crate) fn is_defined(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Adopt the layer's values for every field that is still open.
    pub(crate) fn apply(&mut self, layer: &ConfigurationLayer, diagnostics: &mut Vec<Diagnostic>) {
        let tier = layer.tier();
        for (name, value) in layer.fields() {
            let Some(state) = self.fields.get_mut(name) else {
                diagnostics.push(Diagnostic::UnknownField {
                    tier,
                    field: name.clone(),
                });
                continue;
            };

            if let Some(locked_by) = state.locked_by {
                if *value != state.value {
                    trace!(field = %name, %tier, %locked_by, "override blocked by field lock");
                    diagnostics.push(Diagnostic::FieldLocked {
                        tier,
                        field: name.clone(),
                        locked_by,
                    });
                }
                continue;
            }

            if !value.fits(state.kind) {
                diagnostics.push(Diagnostic::KindMismatch {
                    tier,
                    field: name.clone(),
                    expected: state.kind,
                    found: value.kind(),
                });
                continue;
            }

            // `fits` only admits integers that convert exactly.
            state.value = match (state.kind, value) {
                (ValueKind::Number, ScalarValue::Integer(i)) => ScalarValue::Number(*i as f64),
                _ => value.clone(),
            };
            state.origin = tier;
        }
    }

    /// Record the field locks declared by `layer`. Earlier locks are kept.
    pub(crate) fn seal(&mut self, layer: &ConfigurationLayer) {
        for name in &layer.locks().fields {
            if let Some(state) = self.fields.get_mut(name) {
                state.locked_by.get_or_insert(layer.tier());
            }
        }
    }

    pub(crate) fn values(&self) -> BTreeMap<String, ScalarValue> {
        self.fields
            .iter()
            .map(|(name, state)| (name.clone(), state.value.clone()))
            .collect()
    }

    pub(crate) fn origins(&self) -> BTreeMap<String, Tier> {
        self.fields
            .iter()
            .map(|(name, state)| (name.clone(), state.origin))
            .collect()
    }

    pub(crate) fn lock_owners(&self) -> BTreeMap<String, Tier> {
        self.fields
            .iter()
            .filter_map(|(name, state)| state.locked_by.map(|tier| (name.clone(), tier)))
            .collect()
    }
}
