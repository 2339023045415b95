//! Injected collaborators: record filter and thread discovery
//!
//! Both are supplied to [`Receiver::new`](crate::Receiver::new) and run on
//! the event-loop task, so they may keep mutable state without locking.
//! Plain closures work through the blanket impls.

use spool_protocol::LogRecord;

use crate::session::Session;

/// Decides whether a record is forwarded to the output events.
///
/// Called once per parsed, synthesized or replayed record. Rejected records
/// stay in the session's history; they are only withheld from the output.
pub trait RecordFilter: Send {
    fn accept(&mut self, session: &Session, record: &LogRecord) -> bool;
}

impl<F> RecordFilter for F
where
    F: FnMut(&Session, &LogRecord) -> bool + Send,
{
    fn accept(&mut self, session: &Session, record: &LogRecord) -> bool {
        self(session, record)
    }
}

/// Filter that forwards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl RecordFilter for AcceptAll {
    fn accept(&mut self, _session: &Session, _record: &LogRecord) -> bool {
        true
    }
}

/// Learns of each distinct thread name the first time it appears in a
/// session, and again for every known name when a session is reselected.
pub trait ThreadObserver: Send {
    fn on_thread(&mut self, session: &Session, thread_name: &str);
}

impl<F> ThreadObserver for F
where
    F: FnMut(&Session, &str) + Send,
{
    fn on_thread(&mut self, session: &Session, thread_name: &str) {
        self(session, thread_name)
    }
}
