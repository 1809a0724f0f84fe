/// Liveness endpoint
use axum::{extract::State, response::Response, routing::get, Router};
use std::sync::Arc;

use crate::webserver::{models::HealthResponse, state::AppState, utils::success_response};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<Arc<AppState>>) -> Response {
    success_response(HealthResponse {
        status: "ok".to_string(),
        time: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        subscribers: state.registry.live_count(),
    })
}

#[cfg(test)]
mod tests {
    use crate::webserver::routes::test_support::{call, test_state};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_health_reports_ok() {
        let (_dir, state) = test_state();
        let (status, body) = call(&state, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["subscribers"], 0);
        assert!(body["time"].is_string());
    }
}
