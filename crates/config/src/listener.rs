//! Listener configuration
//!
//! Controls the TCP endpoint the receiver binds and the socket options
//! applied to accepted client connections.

use serde::Deserialize;

/// Listener configuration
///
/// # Example
///
/// ```toml
/// [listener]
/// address = "0.0.0.0"
/// port = 50100
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address
    /// Default: "0.0.0.0"
    pub address: String,

    /// Listen port
    /// Default: 50100
    pub port: u16,

    /// Per-connection read buffer size (bytes)
    /// Default: 64KB
    pub read_buffer_size: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    /// Default: true
    pub nodelay: bool,

    /// Enable TCP keepalive probes on accepted connections
    /// Default: true
    pub keepalive: bool,

    /// Kernel socket buffer size for send and receive (bytes)
    /// Default: 256KB
    pub socket_buffer_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".into(),
            port: 50100,
            read_buffer_size: 64 * 1024,
            nodelay: true,
            keepalive: true,
            socket_buffer_size: 256 * 1024,
        }
    }
}
