//! End-to-end resolution scenarios across service, account and user tiers.

use tierwise_resolver::{
    resolve, resolve_detailed, ConfigurationLayer, Diagnostic, ItemId, ListItem, ScalarValue, Tier,
};

fn ids(items: &[ListItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

fn hub_base() -> ConfigurationLayer {
    ConfigurationLayer::builder(Tier::Service)
        .field("display_mode", "tiles")
        .list("widgets", [ListItem::new("a"), ListItem::new("b")])
        .build()
        .unwrap()
}

// =============================================================================
// Scalar fields
// =============================================================================

#[test]
fn test_account_lock_blocks_user_display_mode() {
    let account = ConfigurationLayer::builder(Tier::Account)
        .field("display_mode", "grid")
        .lock_field("display_mode")
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .field("display_mode", "list")
        .build()
        .unwrap();

    let resolution = resolve_detailed(&hub_base(), &[account, user]);
    assert_eq!(resolution.config.get_str("display_mode"), Some("grid"));
    assert_eq!(resolution.provenance.fields["display_mode"], Tier::Account);
    assert_eq!(
        resolution.blocked().collect::<Vec<_>>(),
        vec![&Diagnostic::FieldLocked {
            tier: Tier::User,
            field: "display_mode".to_string(),
            locked_by: Tier::Account,
        }]
    );
}

#[test]
fn test_user_wins_without_locks() {
    let account = ConfigurationLayer::builder(Tier::Account)
        .field("display_mode", "grid")
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .field("display_mode", "list")
        .build()
        .unwrap();

    let resolved = resolve(&hub_base(), &[account, user]);
    assert_eq!(resolved.get_str("display_mode"), Some("list"));
}

#[test]
fn test_service_pin_ignores_both_overrides() {
    let service = ConfigurationLayer::builder(Tier::Service)
        .field("dark_mode", true)
        .field("accent_color", "#0055aa")
        .lock_field("dark_mode")
        .build()
        .unwrap();
    let account = ConfigurationLayer::builder(Tier::Account)
        .field("dark_mode", false)
        .field("accent_color", "#aa0000")
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .field("dark_mode", false)
        .build()
        .unwrap();

    let resolved = resolve(&service, &[account, user]);
    assert_eq!(resolved.get_bool("dark_mode"), Some(true));
    assert_eq!(resolved.get_str("accent_color"), Some("#aa0000"));
}

#[test]
fn test_explicit_false_is_distinct_from_absent() {
    let service = ConfigurationLayer::builder(Tier::Service)
        .field("dark_mode", true)
        .field("compact", true)
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .field("dark_mode", false)
        .build()
        .unwrap();

    let resolved = resolve(&service, &[user]);
    assert_eq!(resolved.get("dark_mode"), Some(&ScalarValue::Bool(false)));
    assert_eq!(resolved.get("compact"), Some(&ScalarValue::Bool(true)));
}

#[test]
fn test_later_lock_cannot_release_earlier_lock() {
    let service = ConfigurationLayer::builder(Tier::Service)
        .field("display_mode", "tiles")
        .lock_field("display_mode")
        .build()
        .unwrap();
    let account = ConfigurationLayer::builder(Tier::Account)
        .field("display_mode", "grid")
        .lock_field("display_mode")
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .field("display_mode", "list")
        .build()
        .unwrap();

    let resolution = resolve_detailed(&service, &[account, user]);
    assert_eq!(resolution.config.get_str("display_mode"), Some("tiles"));
    assert_eq!(resolution.provenance.field_lock("display_mode"), Some(Tier::Service));
    assert_eq!(resolution.blocked().count(), 2);
}

// =============================================================================
// Ordered lists
// =============================================================================

#[test]
fn test_account_item_lock_survives_user_edit() {
    let account = ConfigurationLayer::builder(Tier::Account)
        .list("widgets", [ListItem::hidden("b")])
        .lock_item("widgets", "b")
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .list("widgets", [ListItem::hidden("a"), ListItem::new("b")])
        .build()
        .unwrap();

    let resolved = resolve(&hub_base(), &[account, user]);
    let widgets = resolved.list("widgets").unwrap();
    assert_eq!(ids(widgets), vec!["a", "b"]);
    assert!(!widgets[0].visible, "user hides unlocked a");
    assert!(!widgets[1].visible, "b keeps the account's locked entry");
}

#[test]
fn test_item_lock_isolated_from_user_reordering() {
    let base = ConfigurationLayer::builder(Tier::Service)
        .list(
            "widgets",
            ["a", "x", "b", "c"].map(ListItem::new),
        )
        .build()
        .unwrap();
    let account = ConfigurationLayer::builder(Tier::Account)
        .list(
            "widgets",
            [
                ListItem::new("c"),
                ListItem::hidden("x"),
                ListItem::new("a"),
                ListItem::new("b"),
            ],
        )
        .lock_item("widgets", "x")
        .build()
        .unwrap();
    // User reorders and hides everything else, and does not mention x.
    let user = ConfigurationLayer::builder(Tier::User)
        .list(
            "widgets",
            [ListItem::hidden("b"), ListItem::hidden("a"), ListItem::hidden("c")],
        )
        .build()
        .unwrap();

    let resolved = resolve(&base, &[account, user]);
    let widgets = resolved.list("widgets").unwrap();
    assert_eq!(ids(widgets), vec!["b", "a", "c", "x"]);
    assert_eq!(widgets[3], ListItem::hidden("x"));
    assert!(widgets.iter().all(|item| !item.visible));
}

#[test]
fn test_service_list_lock_freezes_order_and_membership() {
    let service = ConfigurationLayer::builder(Tier::Service)
        .list("widgets", [ListItem::new("a"), ListItem::new("b")])
        .lock_list("widgets")
        .build()
        .unwrap();
    let account = ConfigurationLayer::builder(Tier::Account)
        .list("widgets", [ListItem::new("b"), ListItem::new("a")])
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .list("widgets", [ListItem::new("z"), ListItem::hidden("a")])
        .build()
        .unwrap();

    let resolution = resolve_detailed(&service, &[account, user]);
    let widgets = resolution.config.list("widgets").unwrap();
    assert_eq!(widgets, &[ListItem::new("a"), ListItem::new("b")]);
    assert_eq!(resolution.provenance.lists["widgets"], Tier::Service);
    assert_eq!(resolution.blocked().count(), 2);
}

#[test]
fn test_list_lock_declared_by_account_applies_to_user_only() {
    let account = ConfigurationLayer::builder(Tier::Account)
        .list("widgets", [ListItem::new("b"), ListItem::new("a")])
        .lock_list("widgets")
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .list("widgets", [ListItem::new("a"), ListItem::new("b")])
        .build()
        .unwrap();

    let resolved = resolve(&hub_base(), &[account, user]);
    assert_eq!(ids(resolved.list("widgets").unwrap()), vec!["b", "a"]);
}

#[test]
fn test_items_missing_from_every_override_are_kept() {
    let account = ConfigurationLayer::builder(Tier::Account)
        .list("widgets", [ListItem::new("b")])
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .list("widgets", Vec::new())
        .build()
        .unwrap();

    let resolved = resolve(&hub_base(), &[account, user]);
    assert_eq!(ids(resolved.list("widgets").unwrap()), vec!["b", "a"]);
}

#[test]
fn test_account_can_add_catalog_item() {
    let account = ConfigurationLayer::builder(Tier::Account)
        .list("widgets", [ListItem::new("a"), ListItem::new("news"), ListItem::new("b")])
        .build()
        .unwrap();

    let resolved = resolve(&hub_base(), &[account]);
    assert_eq!(ids(resolved.list("widgets").unwrap()), vec!["a", "news", "b"]);
}

// =============================================================================
// Whole-chain properties on fixed fixtures
// =============================================================================

#[test]
fn test_identity_without_overrides() {
    let base = hub_base();
    let resolved = resolve(&base, &[]);
    assert_eq!(resolved.to_layer(Tier::Service).unwrap(), base);
}

#[test]
fn test_reresolving_resolved_output_is_stable() {
    let account = ConfigurationLayer::builder(Tier::Account)
        .field("display_mode", "grid")
        .list("widgets", [ListItem::hidden("b")])
        .lock_item("widgets", "b")
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .list("widgets", [ListItem::hidden("a"), ListItem::new("b")])
        .build()
        .unwrap();
    let overrides = [account, user];

    let first = resolve(&hub_base(), &overrides);
    let rebased = first.to_layer(Tier::Service).unwrap();
    let second = resolve(&rebased, &overrides);
    assert_eq!(first, second);
}

#[test]
fn test_reresolving_with_omitted_locked_item_is_stable() {
    let base = ConfigurationLayer::builder(Tier::Service)
        .list("widgets", ["w0", "w1", "w2", "w3"].map(ListItem::new))
        .build()
        .unwrap();
    let account = ConfigurationLayer::builder(Tier::Account)
        .list("widgets", [ListItem::new("w1")])
        .lock_item("widgets", "w0")
        .build()
        .unwrap();
    let user = ConfigurationLayer::builder(Tier::User)
        .list("widgets", [ListItem::new("w3")])
        .build()
        .unwrap();
    let overrides = [account, user];

    let first = resolve(&base, &overrides);
    assert_eq!(ids(first.list("widgets").unwrap()), vec!["w3", "w0", "w1", "w2"]);

    let rebased = first.to_layer(Tier::Service).unwrap();
    let second = resolve(&rebased, &overrides);
    assert_eq!(second, first);
}

#[test]
fn test_unknown_names_do_not_leak_into_result() {
    let user = ConfigurationLayer::builder(Tier::User)
        .field("beta_feature", true)
        .list("shortcuts", [ListItem::new("home")])
        .build()
        .unwrap();

    let resolution = resolve_detailed(&hub_base(), &[user]);
    assert!(resolution.config.get("beta_feature").is_none());
    assert!(resolution.config.list("shortcuts").is_none());
    assert_eq!(resolution.diagnostics.len(), 2);
    assert!(resolution.blocked().next().is_none());
}

#[test]
fn test_item_lock_owner_is_exposed() {
    let account = ConfigurationLayer::builder(Tier::Account)
        .lock_item("widgets", "a")
        .build()
        .unwrap();
    let resolution = resolve_detailed(&hub_base(), &[account]);
    assert_eq!(
        resolution.provenance.item_lock("widgets", &ItemId::new("a")),
        Some(Tier::Account)
    );
    assert!(resolution.locks.is_item_locked("widgets", &ItemId::new("a")));
}
