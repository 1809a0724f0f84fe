/// Reading event fan-out
///
/// Serializes each event once and queues it on every matching
/// subscription. Publishing is synchronous and never blocks on a slow
/// client; the outcome is logged, not returned to the submitter.
use std::sync::Arc;

use crate::{
    arguments::is_debug_broadcast_enabled,
    logger::{self, LogTag},
    readings::ReadingEvent,
};

use super::message::ServerMessage;
use super::registry::{DeliveryReport, Payload, SubscriptionRegistry};

pub struct Broadcaster {
    registry: Arc<SubscriptionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<SubscriptionRegistry>) -> Self {
        Self { registry }
    }

    pub fn publish(&self, event: &ReadingEvent) -> DeliveryReport {
        let message = ServerMessage::ReadingCreated {
            data: event.clone(),
        };
        let payload: Payload = match message.to_json() {
            Ok(json) => Arc::from(json),
            Err(e) => {
                logger::error(
                    LogTag::Broadcast,
                    &format!("Failed to serialize reading {}: {}", event.id, e),
                );
                return DeliveryReport::default();
            }
        };

        let metrics = self.registry.metrics();
        metrics.event_published();

        let report = self.registry.deliver_matching(event, &payload);

        if report.dropped > 0 {
            logger::warning(
                LogTag::Broadcast,
                &format!(
                    "Reading {} dropped for {} slow subscriber(s)",
                    event.id, report.dropped
                ),
            );
        }

        if is_debug_broadcast_enabled() {
            logger::debug(
                LogTag::Broadcast,
                &format!(
                    "Reading {} (sensor={}, installation={}) matched={} delivered={} skipped={} dropped={}",
                    event.id,
                    event.sensor_installed_id,
                    event.installation_id,
                    report.matched,
                    report.delivered,
                    report.skipped,
                    report.dropped
                ),
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webserver::ws::filters::SubscriptionFilter;

    fn event() -> ReadingEvent {
        ReadingEvent {
            id: 41,
            sensor_installed_id: 7,
            installation_id: 3,
            installation_name: "Tank A".into(),
            sensor_type: "temperature".into(),
            unit: Some("°C".into()),
            taken_at: "2024-03-01T10:15:00.000Z".into(),
            value: 23.5,
        }
    }

    #[test]
    fn test_publish_sends_reading_created_envelope() {
        let registry = SubscriptionRegistry::new(4);
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let (_handle, mut rx) = registry.register(SubscriptionFilter::SensorInstalled(7));

        let report = broadcaster.publish(&event());
        assert_eq!(report.delivered, 1);

        let frame = rx.try_recv().unwrap();
        let parsed: ServerMessage = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed, ServerMessage::ReadingCreated { data: event() });
    }

    #[test]
    fn test_publish_without_subscribers_is_a_noop() {
        let registry = SubscriptionRegistry::new(4);
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        assert_eq!(broadcaster.publish(&event()), DeliveryReport::default());
        assert_eq!(registry.metrics().snapshot(0).events_published, 1);
    }
}
