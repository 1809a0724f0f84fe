/// Connection liveness tracking
///
/// The server pings a client that has been silent for the heartbeat
/// interval and gives up after the idle timeout or an unanswered ping.
use std::time::{Duration, Instant};

use crate::config::WebsocketConfig;

/// Unanswered ping grace period
const PONG_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub heartbeat_interval: Duration,
    pub idle_timeout: Duration,
    pub pong_timeout: Duration,
}

impl HealthConfig {
    pub fn from_config(config: &WebsocketConfig) -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(config.heartbeat_secs.max(1)),
            idle_timeout: Duration::from_secs(config.client_idle_timeout_secs.max(1)),
            pong_timeout: PONG_TIMEOUT,
        }
    }
}

/// What the connection loop should do after a periodic check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthVerdict {
    Healthy,
    SendPing,
    IdleTimeout,
    PongTimeout,
}

#[derive(Debug)]
pub struct ConnectionHealth {
    last_activity: Instant,
    ping_sent_at: Option<Instant>,
    config: HealthConfig,
}

impl ConnectionHealth {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            last_activity: Instant::now(),
            ping_sent_at: None,
            config,
        }
    }

    /// Any inbound frame counts as activity and answers a pending ping
    pub fn record_activity(&mut self) {
        self.last_activity = Instant::now();
        self.ping_sent_at = None;
    }

    pub fn record_ping(&mut self) {
        self.ping_sent_at = Some(Instant::now());
    }

    pub fn check(&self) -> HealthVerdict {
        self.check_at(Instant::now())
    }

    fn check_at(&self, now: Instant) -> HealthVerdict {
        let silent_for = now.saturating_duration_since(self.last_activity);

        if silent_for > self.config.idle_timeout {
            return HealthVerdict::IdleTimeout;
        }

        match self.ping_sent_at {
            Some(sent) if now.saturating_duration_since(sent) > self.config.pong_timeout => {
                HealthVerdict::PongTimeout
            }
            Some(_) => HealthVerdict::Healthy,
            None if silent_for > self.config.heartbeat_interval => HealthVerdict::SendPing,
            None => HealthVerdict::Healthy,
        }
    }

    pub fn seconds_since_activity(&self) -> u64 {
        self.last_activity.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HealthConfig {
        HealthConfig {
            heartbeat_interval: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(90),
            pong_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_heartbeat_progression() {
        let mut health = ConnectionHealth::new(config());
        let start = health.last_activity;

        assert_eq!(health.check_at(start + Duration::from_secs(5)), HealthVerdict::Healthy);
        assert_eq!(health.check_at(start + Duration::from_secs(31)), HealthVerdict::SendPing);

        health.ping_sent_at = Some(start + Duration::from_secs(31));
        assert_eq!(health.check_at(start + Duration::from_secs(35)), HealthVerdict::Healthy);
        assert_eq!(health.check_at(start + Duration::from_secs(45)), HealthVerdict::PongTimeout);

        health.record_activity();
        assert_eq!(health.check(), HealthVerdict::Healthy);
    }

    #[test]
    fn test_idle_timeout_wins() {
        let health = ConnectionHealth::new(config());
        let start = health.last_activity;
        assert_eq!(health.check_at(start + Duration::from_secs(91)), HealthVerdict::IdleTimeout);
    }

    #[test]
    fn test_from_config() {
        let cfg = HealthConfig::from_config(&WebsocketConfig::default());
        assert_eq!(cfg.heartbeat_interval, Duration::from_secs(30));
        assert_eq!(cfg.idle_timeout, Duration::from_secs(90));
    }
}
