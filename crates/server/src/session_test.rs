//! Tests for session state and frame extraction

use crate::session::{ConnId, Session};

fn session_with(bytes: &[u8]) -> Session {
    let mut session = Session::new();
    session.pending.extend_from_slice(bytes);
    session
}

// =============================================================================
// Session defaults
// =============================================================================

#[test]
fn test_new_session_is_empty_and_unidentified() {
    let session = Session::new();
    assert!(!session.identity.is_ready());
    assert!(session.records.is_empty());
    assert!(session.known_threads.is_empty());
    assert_eq!(session.pending_len(), 0);
}

// =============================================================================
// Session::next_frame tests
// =============================================================================

#[test]
fn test_next_frame_none_without_separator() {
    let mut session = session_with(b"incomplete");
    assert!(session.next_frame().is_none());
    // The tail stays buffered for the next chunk.
    assert_eq!(session.pending_len(), 10);
}

#[test]
fn test_next_frame_extracts_prefix_and_consumes_separator() {
    let mut session = session_with(b"abc,def");
    let frame = session.next_frame().expect("one complete frame");
    assert_eq!(&frame[..], b"abc");
    assert_eq!(session.pending_len(), 3);
    assert!(session.next_frame().is_none());
}

#[test]
fn test_next_frame_drains_multiple_frames_in_order() {
    let mut session = session_with(b"one,two,three,");
    let mut frames = Vec::new();
    while let Some(frame) = session.next_frame() {
        frames.push(frame.to_vec());
    }
    assert_eq!(frames, vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]);
    assert_eq!(session.pending_len(), 0);
}

#[test]
fn test_next_frame_yields_empty_frames_between_separators() {
    let mut session = session_with(b",x,");
    assert_eq!(&session.next_frame().expect("empty frame")[..], b"");
    assert_eq!(&session.next_frame().expect("x frame")[..], b"x");
    assert!(session.next_frame().is_none());
}

#[test]
fn test_next_frame_resumes_after_more_data() {
    let mut session = session_with(b"par");
    assert!(session.next_frame().is_none());
    session.pending.extend_from_slice(b"tial,");
    assert_eq!(&session.next_frame().expect("joined frame")[..], b"partial");
}

// =============================================================================
// ConnId tests
// =============================================================================

#[test]
fn test_conn_id_equality_and_display() {
    let a = ConnId::new(3);
    let b = ConnId::new(3);
    let c = ConnId::new(4);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.to_string(), "3");
}
