//! Spool Protocol - Wire contract for the spool log receiver
//!
//! This crate defines the types exchanged between a log-producing process and
//! the receiver:
//! - `LogRecord` - One parsed (or locally synthesized) log entry
//! - `LogLevel` - Severity attached to a record
//! - `ProcessIdentity` - The (name, numeric id) pair naming a client process
//! - `ProcessHello` - The handshake payload a client sends to identify itself
//!
//! # Wire Protocol
//!
//! A session has two phases on one TCP connection:
//!
//! 1. **Handshake**: the server sends the literal token `who`; the client
//!    answers with a JSON object (`{"processName": ..., "processId": ...}`)
//!    in a single chunk; the server acknowledges with the literal `ready`.
//! 2. **Streaming**: the client sends log records separated by `,`. Within
//!    a record, fields are separated by ASCII unit separator (0x1F) in the
//!    order threadName, threadId, level, timestampMillis, message, tag.
//!
//! Record decoding is lenient: missing fields default, unparsable numbers
//! become 0, an unknown level becomes `Info`. A record whose message ends up
//! empty is treated as absent by the receiver.

mod error;
mod hello;
mod identity;
mod record;

pub use error::ProtocolError;
pub use hello::ProcessHello;
pub use identity::ProcessIdentity;
pub use record::{LogLevel, LogRecord};

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Token the server sends right after accepting a connection
pub const HANDSHAKE_REQUEST: &[u8] = b"who";

/// Token the server sends once the client's identity is complete
pub const HANDSHAKE_READY: &[u8] = b"ready";

/// Separator between consecutive records in the byte stream
pub const RECORD_SEPARATOR: u8 = b',';

/// Separator between fields within one record segment
pub const FIELD_SEPARATOR: u8 = 0x1F;

#[cfg(test)]
mod identity_test;
