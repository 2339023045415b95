//! Events the receiver delivers to its consumer

use spool_protocol::{LogRecord, ProcessIdentity};

/// Consumer-visible output of the receiver, delivered in order over an
/// unbounded channel. Dropping the consuming half simply ends delivery;
/// the receiver keeps running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverEvent {
    /// A record passed the filter - from live parsing, transport-error
    /// synthesis, or a replay operation
    RecordAccepted(LogRecord),
    /// A client completed its handshake
    ClientConnected(ProcessIdentity),
    /// A client's connection closed and its session moved to the retired
    /// table
    ClientClosed(ProcessIdentity),
}
