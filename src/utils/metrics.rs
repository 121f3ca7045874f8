//! Channel Metrics
//!
//! Counters describing what a packet channel's receive loop has done.
//! Shared between the loop and the channel handle through an `Arc`.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for one packet channel
#[derive(Debug)]
pub struct ChannelMetrics {
    /// Frames scanned off the wire, fragments included
    pub frames_scanned: AtomicU64,
    /// Raw bytes read from the byte source, headers and partial frames included
    pub bytes_received: AtomicU64,
    /// Packets handed to the consumer queue
    pub packets_delivered: AtomicU64,
    /// Packets that were reassembled from more than one frame
    pub multipart_packets: AtomicU64,
    /// Logical body bytes handed to the interpreter
    pub body_bytes: AtomicU64,
    /// Failures pushed to the consumer queue
    pub failures: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl ChannelMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            frames_scanned: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            packets_delivered: AtomicU64::new(0),
            multipart_packets: AtomicU64::new(0),
            body_bytes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record bytes that arrived from the byte source
    pub fn bytes_arrived(&self, count: u64) {
        self.bytes_received.fetch_add(count, Ordering::Relaxed);
    }

    /// Record one frame split off the read buffer
    pub fn frame_scanned(&self) {
        self.frames_scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed logical packet that took `frames` frames on the wire
    pub fn packet_assembled(&self, frames: u64, byte_count: u64) {
        self.body_bytes.fetch_add(byte_count, Ordering::Relaxed);
        if frames > 1 {
            self.multipart_packets.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a packet placed on the consumer queue
    pub fn packet_delivered(&self) {
        self.packets_delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failure placed on the consumer queue
    pub fn failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_scanned: self.frames_scanned.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            packets_delivered: self.packets_delivered.load(Ordering::Relaxed),
            multipart_packets: self.multipart_packets.load(Ordering::Relaxed),
            body_bytes: self.body_bytes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            frames_scanned = snapshot.frames_scanned,
            bytes_received = snapshot.bytes_received,
            packets_delivered = snapshot.packets_delivered,
            multipart_packets = snapshot.multipart_packets,
            body_bytes = snapshot.body_bytes,
            failures = snapshot.failures,
            uptime_seconds = snapshot.uptime_seconds,
            "Channel metrics snapshot"
        );
    }
}

impl Default for ChannelMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_scanned: u64,
    pub bytes_received: u64,
    pub packets_delivered: u64,
    pub multipart_packets: u64,
    pub body_bytes: u64,
    pub failures: u64,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_counted_only_above_one_frame() {
        let metrics = ChannelMetrics::new();
        for _ in 0..4 {
            metrics.frame_scanned();
        }
        metrics.bytes_arrived(126);
        metrics.packet_assembled(1, 10);
        metrics.packet_assembled(3, 100);
        metrics.packet_delivered();
        metrics.packet_delivered();
        metrics.failure();

        let snap = metrics.snapshot();
        assert_eq!(snap.frames_scanned, 4);
        assert_eq!(snap.bytes_received, 126);
        assert_eq!(snap.multipart_packets, 1);
        assert_eq!(snap.body_bytes, 110);
        assert_eq!(snap.packets_delivered, 2);
        assert_eq!(snap.failures, 1);
    }

    #[test]
    fn assembling_a_packet_does_not_count_frames() {
        let metrics = ChannelMetrics::new();
        metrics.packet_assembled(2, 64);

        let snap = metrics.snapshot();
        assert_eq!(snap.frames_scanned, 0);
        assert_eq!(snap.multipart_packets, 1);
    }
}
