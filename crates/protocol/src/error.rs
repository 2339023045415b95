//! Protocol error types

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Handshake chunk was not a complete identity payload
    #[error("invalid hello payload: {0}")]
    InvalidHello(#[source] serde_json::Error),
}
