//! Receiver error types

use thiserror::Error;

/// Errors surfaced by receiver control operations
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// Failed to bind the listening endpoint
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error on an established resource
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The receiver's event loop is shutting down or has stopped
    #[error("receiver is stopped")]
    Stopped,
}

/// Result type for receiver operations
pub type Result<T> = std::result::Result<T, ReceiverError>;
