//! Per-chunk handshake absorption
//!
//! Every chunk that arrives before a session is ready must independently
//! decode as a complete hello payload; fragments are discarded rather than
//! buffered. The record stream, by contrast, does reassemble across chunk
//! boundaries (see [`Session::next_frame`](crate::session::Session)).

use spool_protocol::{ProcessHello, ProcessIdentity};
use tracing::trace;

/// Outcome of absorbing one handshake chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Progress {
    /// Chunk did not decode to a usable payload; keep waiting
    Rejected,
    /// Name recorded, id still missing; keep waiting
    NameOnly,
    /// Identity complete; the session may start streaming
    Completed,
}

/// Feed one chunk into an incomplete identity.
pub(crate) fn absorb(identity: &mut ProcessIdentity, chunk: &[u8]) -> Progress {
    let hello = match ProcessHello::from_chunk(chunk) {
        Ok(hello) => hello,
        Err(error) => {
            trace!(%error, "discarded handshake chunk");
            return Progress::Rejected;
        }
    };
    match hello.process_id {
        Some(id) => {
            identity.complete(hello.process_name, id);
            Progress::Completed
        }
        None => {
            identity.set_name(hello.process_name);
            Progress::NameOnly
        }
    }
}

#[cfg(test)]
#[path = "handshake_test.rs"]
mod tests;
