/// Real-time readings channel
///
/// ## Key Components
/// - `registry`: live subscriptions with bounded delivery queues
/// - `filters`: sensor / installation subscription filters
/// - `broadcaster`: serialize-once fan-out of reading events
/// - `connection`: socket lifecycle, heartbeat and rejection path
/// - `message`: wire envelopes
/// - `health`: liveness tracking
/// - `metrics`: delivery counters
pub mod broadcaster;
pub mod connection;
pub mod filters;
pub mod health;
pub mod message;
pub mod metrics;
pub mod registry;

pub use broadcaster::Broadcaster;
pub use filters::SubscriptionFilter;
pub use message::ServerMessage;
pub use registry::{DeliveryReport, SubscriptionHandle, SubscriptionRegistry};
