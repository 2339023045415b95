//! Handshake payload sent by a client to identify itself

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, Result};

/// Identity payload a client sends after the server's `who` token.
///
/// Arrives as a JSON object in a single chunk; decoding is never attempted
/// across chunk boundaries. `processName` is required for the payload to
/// decode at all; `processId` may be absent, in which case the identity
/// stays incomplete until a later payload carries both fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessHello {
    /// Name the client reports for itself
    pub process_name: String,
    /// Numeric id; required to complete the identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<i64>,
}

impl ProcessHello {
    /// Complete hello with both fields
    pub fn new(process_name: impl Into<String>, process_id: i64) -> Self {
        ProcessHello {
            process_name: process_name.into(),
            process_id: Some(process_id),
        }
    }

    /// Decode one chunk as a hello payload.
    pub fn from_chunk(chunk: &[u8]) -> Result<Self> {
        serde_json::from_slice(chunk).map_err(ProtocolError::InvalidHello)
    }

    /// Encode for sending (one write, one chunk).
    pub fn to_chunk(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(ProtocolError::InvalidHello)
    }
}
