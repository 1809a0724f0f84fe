/// Subscription registry
///
/// Holds one entry per open readings channel: its filter and the sending
/// half of a bounded delivery queue. Entries are removed only when the
/// owning `SubscriptionHandle` is dropped.
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;

use crate::{
    arguments::is_debug_websocket_enabled,
    logger::{self, LogTag},
    readings::ReadingEvent,
};

use super::filters::SubscriptionFilter;
use super::metrics::RealtimeMetrics;

// ============================================================================
// REGISTRY TYPES
// ============================================================================

/// Subscription ID (unique per channel, never reused)
pub type SubscriptionId = u64;

/// Pre-serialized frame shared by every recipient of one event
pub type Payload = Arc<str>;

struct Entry {
    filter: SubscriptionFilter,
    sender: mpsc::Sender<Payload>,
}

/// Outcome of fanning one event out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscriptions whose filter matched
    pub matched: usize,
    /// Queued for delivery
    pub delivered: usize,
    /// Queue already closed (connection going away)
    pub skipped: usize,
    /// Queue full, message dropped for that subscriber
    pub dropped: usize,
}

// ============================================================================
// SUBSCRIPTION REGISTRY
// ============================================================================

pub struct SubscriptionRegistry {
    entries: RwLock<HashMap<SubscriptionId, Entry>>,
    next_id: AtomicU64,
    buffer_size: usize,
    metrics: Arc<RealtimeMetrics>,
}

impl SubscriptionRegistry {
    pub fn new(buffer_size: usize) -> Arc<Self> {
        Arc::new(Self {
            entries: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            buffer_size: buffer_size.max(1),
            metrics: RealtimeMetrics::new(),
        })
    }

    /// Add a subscription. The entry lives until the returned handle drops.
    pub fn register(
        self: &Arc<Self>,
        filter: SubscriptionFilter,
    ) -> (SubscriptionHandle, mpsc::Receiver<Payload>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.buffer_size);

        let live = {
            let mut entries = self.entries.write();
            entries.insert(id, Entry { filter, sender });
            entries.len()
        };
        self.metrics.subscription_opened();

        if is_debug_websocket_enabled() {
            logger::debug(
                LogTag::Websocket,
                &format!("Subscription {} registered ({}, live={})", id, filter, live),
            );
        }

        let handle = SubscriptionHandle {
            id,
            filter,
            registry: Arc::downgrade(self),
        };
        (handle, receiver)
    }

    fn remove(&self, id: SubscriptionId) {
        let removed = {
            let mut entries = self.entries.write();
            entries.remove(&id).map(|_| entries.len())
        };

        if let Some(live) = removed {
            self.metrics.subscription_closed();
            if is_debug_websocket_enabled() {
                logger::debug(
                    LogTag::Websocket,
                    &format!("Subscription {} removed (live={})", id, live),
                );
            }
        }
    }

    pub fn live_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Queue `payload` on every subscription whose filter matches `event`.
    /// Never blocks and never removes entries.
    pub fn deliver_matching(&self, event: &ReadingEvent, payload: &Payload) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let entries = self.entries.read();

        for (id, entry) in entries.iter() {
            if !entry.filter.matches(event) {
                continue;
            }
            report.matched += 1;

            match entry.sender.try_send(Arc::clone(payload)) {
                Ok(()) => {
                    report.delivered += 1;
                    self.metrics.message_queued();
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    report.dropped += 1;
                    self.metrics.message_dropped();
                    if is_debug_websocket_enabled() {
                        logger::debug(
                            LogTag::Websocket,
                            &format!("Subscription {} queue full, reading {} dropped", id, event.id),
                        );
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    report.skipped += 1;
                }
            }
        }

        report
    }

    pub fn metrics(&self) -> Arc<RealtimeMetrics> {
        Arc::clone(&self.metrics)
    }
}

// ============================================================================
// SUBSCRIPTION HANDLE
// ============================================================================

/// Ownership token for a registry entry; dropping it deregisters
pub struct SubscriptionHandle {
    id: SubscriptionId,
    filter: SubscriptionFilter,
    registry: Weak<SubscriptionRegistry>,
}

impl SubscriptionHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: i64, sensor_installed_id: i64, installation_id: i64) -> ReadingEvent {
        ReadingEvent {
            id,
            sensor_installed_id,
            installation_id,
            installation_name: "Tank A".into(),
            sensor_type: "temperature".into(),
            unit: Some("°C".into()),
            taken_at: "2024-03-01T10:15:00.000Z".into(),
            value: 23.5,
        }
    }

    fn payload(text: &str) -> Payload {
        Arc::from(text)
    }

    #[test]
    fn test_register_and_drop() {
        let registry = SubscriptionRegistry::new(8);
        let (a, _rx_a) = registry.register(SubscriptionFilter::SensorInstalled(7));
        let (b, _rx_b) = registry.register(SubscriptionFilter::Installation(3));

        assert_ne!(a.id(), b.id());
        assert_eq!(registry.live_count(), 2);

        drop(a);
        assert_eq!(registry.live_count(), 1);
        drop(b);
        assert_eq!(registry.live_count(), 0);

        let snapshot = registry.metrics().snapshot(registry.live_count());
        assert_eq!(snapshot.subscriptions_opened, 2);
        assert_eq!(snapshot.subscriptions_closed, 2);
    }

    #[test]
    fn test_delivers_only_to_matching_filters() {
        let registry = SubscriptionRegistry::new(8);
        let (_s7, mut rx_s7) = registry.register(SubscriptionFilter::SensorInstalled(7));
        let (_i3, mut rx_i3) = registry.register(SubscriptionFilter::Installation(3));
        let (_s8, mut rx_s8) = registry.register(SubscriptionFilter::SensorInstalled(8));

        let report = registry.deliver_matching(&event(41, 7, 3), &payload("frame"));
        assert_eq!(report.matched, 2);
        assert_eq!(report.delivered, 2);

        assert_eq!(&*rx_s7.try_recv().unwrap(), "frame");
        assert_eq!(&*rx_i3.try_recv().unwrap(), "frame");
        assert!(rx_s8.try_recv().is_err());
    }

    #[test]
    fn test_full_queue_drops_without_deregistering() {
        let registry = SubscriptionRegistry::new(1);
        let (_handle, mut rx) = registry.register(SubscriptionFilter::SensorInstalled(7));

        let first = registry.deliver_matching(&event(1, 7, 3), &payload("one"));
        let second = registry.deliver_matching(&event(2, 7, 3), &payload("two"));
        assert_eq!(first.delivered, 1);
        assert_eq!(second.dropped, 1);
        assert_eq!(registry.live_count(), 1);

        assert_eq!(&*rx.try_recv().unwrap(), "one");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_receiver_is_skipped() {
        let registry = SubscriptionRegistry::new(4);
        let (_handle, rx) = registry.register(SubscriptionFilter::Installation(3));
        drop(rx);

        let report = registry.deliver_matching(&event(1, 7, 3), &payload("x"));
        assert_eq!(report.skipped, 1);
        assert_eq!(report.delivered, 0);
        // Only the handle deregisters
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn test_handle_outliving_registry_is_harmless() {
        let registry = SubscriptionRegistry::new(4);
        let (handle, _rx) = registry.register(SubscriptionFilter::Installation(3));
        drop(registry);
        drop(handle);
    }
}
