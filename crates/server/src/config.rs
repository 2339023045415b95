//! Receiver configuration

/// Configuration applied to the receiver and every accepted socket.
///
/// The listening endpoint is not part of this struct: it is passed to
/// [`ReceiverHandle::listen`](crate::ReceiverHandle::listen), which may be
/// called again later to rebind.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Capacity of each connection's read buffer.
    /// Default: 64KB
    pub read_buffer_size: usize,

    /// Disable Nagle's algorithm on accepted sockets.
    /// Default: true
    pub nodelay: bool,

    /// Enable TCP keepalive probes on accepted sockets.
    /// Default: true
    pub keepalive: bool,

    /// Kernel send/receive buffer size for accepted sockets, 0 to leave the
    /// OS default.
    /// Default: 256KB
    pub socket_buffer_size: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        ReceiverConfig {
            read_buffer_size: 64 * 1024,
            nodelay: true,
            keepalive: true,
            socket_buffer_size: 256 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReceiverConfig::default();
        assert_eq!(config.read_buffer_size, 64 * 1024);
        assert!(config.nodelay);
        assert!(config.keepalive);
        assert_eq!(config.socket_buffer_size, 256 * 1024);
    }
}
