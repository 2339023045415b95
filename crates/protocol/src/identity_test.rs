//! Tests for ProcessIdentity

use crate::identity::ProcessIdentity;
use std::collections::HashMap;

// =============================================================================
// Construction tests
// =============================================================================

#[test]
fn test_new_is_ready() {
    let identity = ProcessIdentity::new("app", 1234);
    assert_eq!(identity.name(), "app");
    assert_eq!(identity.id(), 1234);
    assert!(identity.is_ready());
}

#[test]
fn test_default_is_not_ready() {
    let identity = ProcessIdentity::default();
    assert_eq!(identity.name(), "");
    assert_eq!(identity.id(), 0);
    assert!(!identity.is_ready());
}

#[test]
fn test_set_name_keeps_identity_incomplete() {
    let mut identity = ProcessIdentity::default();
    identity.set_name("app");
    assert_eq!(identity.name(), "app");
    assert!(!identity.is_ready());
}

#[test]
fn test_complete_sets_all_fields() {
    let mut identity = ProcessIdentity::default();
    identity.set_name("early-name");
    identity.complete("app", 77);
    assert_eq!(identity.name(), "app");
    assert_eq!(identity.id(), 77);
    assert!(identity.is_ready());
}

// =============================================================================
// Equality / hashing tests
// =============================================================================

#[test]
fn test_equality_ignores_ready_flag() {
    let mut incomplete = ProcessIdentity::default();
    incomplete.complete("app", 5);
    let key = ProcessIdentity::new("app", 5);
    assert_eq!(incomplete, key);
}

#[test]
fn test_equality_considers_name_and_id() {
    assert_ne!(ProcessIdentity::new("app", 1), ProcessIdentity::new("app", 2));
    assert_ne!(ProcessIdentity::new("a", 1), ProcessIdentity::new("b", 1));
}

#[test]
fn test_usable_as_map_key() {
    let mut map = HashMap::new();
    let mut stored = ProcessIdentity::default();
    stored.complete("app", 9);
    map.insert(stored, "history");

    assert_eq!(map.get(&ProcessIdentity::new("app", 9)), Some(&"history"));
    assert_eq!(map.get(&ProcessIdentity::new("app", 10)), None);
}

#[test]
fn test_display_format() {
    let identity = ProcessIdentity::new("worker", 42);
    assert_eq!(identity.to_string(), "worker#42");
}
