//! Receiver metrics
//!
//! Lock-free counters shared between the event loop and any number of
//! handles. Snapshots are cheap and taken on demand; there is no exporter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one receiver instance
#[derive(Debug)]
pub struct ReceiverMetrics {
    connections_active: AtomicU64,
    connections_total: AtomicU64,
    handshakes_completed: AtomicU64,
    handshake_rejects: AtomicU64,
    bytes_received: AtomicU64,
    records_parsed: AtomicU64,
    records_dropped: AtomicU64,
    records_accepted: AtomicU64,
    transport_errors: AtomicU64,
}

impl ReceiverMetrics {
    pub const fn new() -> Self {
        ReceiverMetrics {
            connections_active: AtomicU64::new(0),
            connections_total: AtomicU64::new(0),
            handshakes_completed: AtomicU64::new(0),
            handshake_rejects: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            records_parsed: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            records_accepted: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn connection_opened(&self) {
        self.connections_active.fetch_add(1, Ordering::Relaxed);
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn handshake_completed(&self) {
        self.handshakes_completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn handshake_reject(&self) {
        self.handshake_rejects.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn bytes_received(&self, count: u64) {
        self.bytes_received.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_parsed(&self) {
        self.records_parsed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_dropped(&self) {
        self.records_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_accepted(&self) {
        self.records_accepted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_active: self.connections_active.load(Ordering::Relaxed),
            connections_total: self.connections_total.load(Ordering::Relaxed),
            handshakes_completed: self.handshakes_completed.load(Ordering::Relaxed),
            handshake_rejects: self.handshake_rejects.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            records_parsed: self.records_parsed.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            records_accepted: self.records_accepted.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for ReceiverMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of receiver counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub connections_active: u64,
    pub connections_total: u64,
    pub handshakes_completed: u64,
    pub handshake_rejects: u64,
    pub bytes_received: u64,
    pub records_parsed: u64,
    pub records_dropped: u64,
    pub records_accepted: u64,
    pub transport_errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_start_at_zero() {
        let metrics = ReceiverMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_connection_counters() {
        let metrics = ReceiverMetrics::new();
        metrics.connection_opened();
        metrics.connection_opened();
        metrics.connection_closed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.connections_active, 1);
        assert_eq!(snapshot.connections_total, 2);
    }

    #[test]
    fn test_record_counters() {
        let metrics = ReceiverMetrics::new();
        metrics.record_parsed();
        metrics.record_parsed();
        metrics.record_dropped();
        metrics.record_accepted();
        metrics.bytes_received(128);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.records_parsed, 2);
        assert_eq!(snapshot.records_dropped, 1);
        assert_eq!(snapshot.records_accepted, 1);
        assert_eq!(snapshot.bytes_received, 128);
    }
}
