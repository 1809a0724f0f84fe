use serde::Serialize;
/// Real-time delivery metrics
///
/// Lock-free counters shared by the registry, the broadcaster and each
/// connection task.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ============================================================================
// CONNECTION METRICS
// ============================================================================

/// Per-connection counters
#[derive(Debug, Default)]
pub struct ConnectionMetrics {
    /// Frames written to the socket
    frames_sent: AtomicU64,

    /// Client messages received (text, ping, pong)
    frames_received: AtomicU64,
}

impl ConnectionMetrics {
    pub fn inc_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    pub fn received(&self) -> u64 {
        self.frames_received.load(Ordering::Relaxed)
    }
}

// ============================================================================
// REALTIME METRICS
// ============================================================================

/// Aggregate counters across all subscriptions
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    subscriptions_opened: AtomicU64,
    subscriptions_closed: AtomicU64,
    subscriptions_rejected: AtomicU64,
    events_published: AtomicU64,
    messages_queued: AtomicU64,
    messages_dropped: AtomicU64,
}

impl RealtimeMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscription_opened(&self) {
        self.subscriptions_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn subscription_closed(&self) {
        self.subscriptions_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Connection refused because of a malformed filter
    pub fn subscription_rejected(&self) {
        self.subscriptions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn event_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn message_queued(&self) {
        self.messages_queued.fetch_add(1, Ordering::Relaxed);
    }

    /// Subscriber queue was full
    pub fn message_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, live_subscriptions: usize) -> RealtimeMetricsSnapshot {
        RealtimeMetricsSnapshot {
            live_subscriptions,
            subscriptions_opened: self.subscriptions_opened.load(Ordering::Relaxed),
            subscriptions_closed: self.subscriptions_closed.load(Ordering::Relaxed),
            subscriptions_rejected: self.subscriptions_rejected.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            messages_queued: self.messages_queued.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view for `/api/realtime/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeMetricsSnapshot {
    pub live_subscriptions: usize,
    pub subscriptions_opened: u64,
    pub subscriptions_closed: u64,
    pub subscriptions_rejected: u64,
    pub events_published: u64,
    pub messages_queued: u64,
    pub messages_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_metrics_snapshot() {
        let metrics = RealtimeMetrics::new();
        metrics.subscription_opened();
        metrics.subscription_opened();
        metrics.subscription_closed();
        metrics.event_published();
        metrics.message_queued();
        metrics.message_queued();
        metrics.message_dropped();

        let snapshot = metrics.snapshot(1);
        assert_eq!(snapshot.live_subscriptions, 1);
        assert_eq!(snapshot.subscriptions_opened, 2);
        assert_eq!(snapshot.subscriptions_closed, 1);
        assert_eq!(snapshot.events_published, 1);
        assert_eq!(snapshot.messages_queued, 2);
        assert_eq!(snapshot.messages_dropped, 1);
    }

    #[test]
    fn test_connection_metrics() {
        let metrics = ConnectionMetrics::default();
        metrics.inc_sent();
        metrics.inc_received();
        metrics.inc_received();
        assert_eq!(metrics.sent(), 1);
        assert_eq!(metrics.received(), 2);
    }
}
