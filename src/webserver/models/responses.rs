/// API response type definitions
///
/// Standard response structures for REST API endpoints

use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use crate::webserver::ws::metrics::RealtimeMetricsSnapshot;

/// Liveness check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub time: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
    /// Open readings-channel subscriptions
    pub subscribers: usize,
}

/// Real-time channel counters
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeStatsResponse {
    pub stats: RealtimeMetricsSnapshot,
    pub timestamp: DateTime<Utc>,
}

/// Generic error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<String>,
}

/// Generic success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
