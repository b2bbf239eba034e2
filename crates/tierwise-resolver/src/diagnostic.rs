//! Non-fatal observations made while resolving.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::item::ItemId;
use crate::tier::Tier;
use crate::value::ValueKind;

/// Something the resolver ignored or blocked. Never aborts resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The layer sets a field the base does not define.
    UnknownField { tier: Tier, field: String },

    /// The layer supplies a list the base does not define.
    UnknownList { tier: Tier, list: String },

    /// The layer's value has a different kind than the base value.
    KindMismatch {
        tier: Tier,
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// The layer tried to override a field locked by an earlier tier.
    FieldLocked {
        tier: Tier,
        field: String,
        locked_by: Tier,
    },

    /// The layer tried to reorder or change membership of a locked list.
    ListLocked {
        tier: Tier,
        list: String,
        locked_by: Tier,
    },

    /// The layer's entry for a locked item was replaced by the locked entry.
    ItemLocked {
        tier: Tier,
        list: String,
        id: ItemId,
        locked_by: Tier,
    },

    /// The layer declares a lock on a field or list the base does not define.
    LockTargetMissing { tier: Tier, target: String },

    /// Override layers were not supplied in ascending tier order.
    TierOrder { previous: Tier, tier: Tier },
}

impl Diagnostic {
    /// Tier of the layer that triggered the diagnostic.
    pub fn tier(&self) -> Tier {
        match self {
            Diagnostic::UnknownField { tier, .. }
            | Diagnostic::UnknownList { tier, .. }
            | Diagnostic::KindMismatch { tier, .. }
            | Diagnostic::FieldLocked { tier, .. }
            | Diagnostic::ListLocked { tier, .. }
            | Diagnostic::ItemLocked { tier, .. }
            | Diagnostic::LockTargetMissing { tier, .. }
            | Diagnostic::TierOrder { tier, .. } => *tier,
        }
    }

    /// Whether the diagnostic reports an override blocked by a lock.
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            Diagnostic::FieldLocked { .. }
                | Diagnostic::ListLocked { .. }
                | Diagnostic::ItemLocked { .. }
        )
    }

    /// Field or list name the diagnostic concerns, if any.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Diagnostic::UnknownField { field, .. }
            | Diagnostic::KindMismatch { field, .. }
            | Diagnostic::FieldLocked { field, .. } => Some(field),
            Diagnostic::UnknownList { list, .. }
            | Diagnostic::ListLocked { list, .. }
            | Diagnostic::ItemLocked { list, .. } => Some(list),
            Diagnostic::LockTargetMissing { target, .. } => Some(target),
            Diagnostic::TierOrder { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownField { tier, field } => {
                write!(f, "{}: unknown field '{}' ignored", tier, field)
            }
            Diagnostic::UnknownList { tier, list } => {
                write!(f, "{}: unknown list '{}' ignored", tier, list)
            }
            Diagnostic::KindMismatch {
                tier,
                field,
                expected,
                found,
            } => write!(
                f,
                "{}: field '{}' expects {}, got {}; ignored",
                tier, field, expected, found
            ),
            Diagnostic::FieldLocked {
                tier,
                field,
                locked_by,
            } => write!(f, "{}: field '{}' is locked by {}", tier, field, locked_by),
            Diagnostic::ListLocked {
                tier,
                list,
                locked_by,
            } => write!(f, "{}: list '{}' is locked by {}", tier, list, locked_by),
            Diagnostic::ItemLocked {
                tier,
                list,
                id,
                locked_by,
            } => write!(
                f,
                "{}: item '{}' in list '{}' is locked by {}",
                tier, id, list, locked_by
            ),
            Diagnostic::LockTargetMissing { tier, target } => {
                write!(f, "{}: lock on undefined '{}'", tier, target)
            }
            Diagnostic::TierOrder { previous, tier } => {
                write!(f, "{} layer applied after {} layer", tier, previous)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_classification() {
        let blocked = Diagnostic::FieldLocked {
            tier: Tier::User,
            field: "display_mode".to_string(),
            locked_by: Tier::Account,
        };
        assert!(blocked.is_blocked());
        assert_eq!(blocked.tier(), Tier::User);
        assert_eq!(blocked.subject(), Some("display_mode"));
        assert_eq!(
            blocked.to_string(),
            "user: field 'display_mode' is locked by account"
        );

        let unknown = Diagnostic::UnknownField {
            tier: Tier::Account,
            field: "legacy".to_string(),
        };
        assert!(!unknown.is_blocked());
    }

    #[test]
    fn test_tagged_serialization() {
        let diag = Diagnostic::UnknownList {
            tier: Tier::User,
            list: "shortcuts".to_string(),
        };
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "unknown_list");
        assert_eq!(json["tier"], "user");
    }
}
