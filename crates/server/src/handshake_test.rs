//! Tests for per-chunk handshake absorption

use crate::handshake::{absorb, Progress};
use spool_protocol::ProcessIdentity;

// =============================================================================
// absorb tests
// =============================================================================

#[test]
fn test_garbage_chunk_is_rejected() {
    let mut identity = ProcessIdentity::default();
    assert_eq!(absorb(&mut identity, b"hello there"), Progress::Rejected);
    assert!(!identity.is_ready());
    assert_eq!(identity.name(), "");
}

#[test]
fn test_empty_chunk_is_rejected() {
    let mut identity = ProcessIdentity::default();
    assert_eq!(absorb(&mut identity, b""), Progress::Rejected);
    assert!(!identity.is_ready());
}

#[test]
fn test_id_without_name_is_rejected() {
    let mut identity = ProcessIdentity::default();
    assert_eq!(absorb(&mut identity, br#"{"processId":9}"#), Progress::Rejected);
    assert!(!identity.is_ready());
    assert_eq!(identity.id(), 0);
}

#[test]
fn test_name_only_records_name_but_stays_incomplete() {
    let mut identity = ProcessIdentity::default();
    assert_eq!(
        absorb(&mut identity, br#"{"processName":"app"}"#),
        Progress::NameOnly
    );
    assert_eq!(identity.name(), "app");
    assert!(!identity.is_ready());
}

#[test]
fn test_both_fields_complete_the_identity() {
    let mut identity = ProcessIdentity::default();
    assert_eq!(
        absorb(&mut identity, br#"{"processName":"app","processId":1234}"#),
        Progress::Completed
    );
    assert!(identity.is_ready());
    assert_eq!(identity.name(), "app");
    assert_eq!(identity.id(), 1234);
}

#[test]
fn test_completing_payload_overrides_earlier_name() {
    let mut identity = ProcessIdentity::default();
    absorb(&mut identity, br#"{"processName":"early"}"#);
    assert_eq!(
        absorb(&mut identity, br#"{"processName":"final","processId":2}"#),
        Progress::Completed
    );
    assert_eq!(identity.name(), "final");
    assert_eq!(identity.id(), 2);
}

#[test]
fn test_fragmented_payload_never_completes() {
    let mut identity = ProcessIdentity::default();
    let payload: &[u8] = br#"{"processName":"app","processId":7}"#;
    let (head, tail) = payload.split_at(12);
    assert_eq!(absorb(&mut identity, head), Progress::Rejected);
    assert_eq!(absorb(&mut identity, tail), Progress::Rejected);
    assert!(!identity.is_ready());
}
