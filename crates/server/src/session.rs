//! Per-connection session state

use std::fmt;

use bytes::{Buf, BytesMut};
use spool_protocol::{LogRecord, ProcessIdentity, RECORD_SEPARATOR};

/// Handle for one live connection, unique per accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

impl ConnId {
    pub(crate) fn new(value: u64) -> Self {
        ConnId(value)
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable state tracked for one client process.
///
/// Owned exclusively by whichever table currently holds it: the live
/// session table while the connection is open, the retired table after it
/// closed. `records` only grows or is explicitly cleared, never reordered.
#[derive(Debug, Default)]
pub struct Session {
    /// Who the client says it is; ready once the handshake completed
    pub identity: ProcessIdentity,
    /// Bytes received but not yet terminated by a record separator
    pub(crate) pending: BytesMut,
    /// Every record parsed or synthesized for this client, in order
    pub records: Vec<LogRecord>,
    /// Distinct non-empty thread names, in first-appearance order
    pub known_threads: Vec<String>,
}

impl Session {
    pub(crate) fn new() -> Self {
        Session::default()
    }

    /// Split off the next complete record segment, consuming its
    /// separator. Returns None once no separator remains; the unterminated
    /// tail stays buffered for the next chunk.
    pub(crate) fn next_frame(&mut self) -> Option<BytesMut> {
        let pos = self.pending.iter().position(|&b| b == RECORD_SEPARATOR)?;
        let frame = self.pending.split_to(pos);
        self.pending.advance(1);
        Some(frame)
    }

    /// Number of buffered bytes not yet parseable into a record
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
