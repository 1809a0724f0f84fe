/// Readings channel upgrade endpoint and real-time stats
use axum::{
    extract::{ws::WebSocketUpgrade, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::webserver::{
    models::RealtimeStatsResponse,
    state::AppState,
    utils::success_response,
    ws::{connection::handle_connection, health::HealthConfig, SubscriptionFilter},
};

/// Channel query string; validated after the upgrade so the client gets
/// an error envelope instead of a bare HTTP failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelParams {
    pub sensor_installed_id: Option<String>,
    pub installation_id: Option<String>,
}

/// Routes mounted at the server root
pub fn channel_routes() -> Router<Arc<AppState>> {
    Router::new().route("/ws/readings", get(readings_channel))
}

/// Routes mounted under `/api`
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/realtime/stats", get(realtime_stats))
}

async fn readings_channel(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChannelParams>,
) -> Response {
    let filter = SubscriptionFilter::from_params(
        params.sensor_installed_id.as_deref(),
        params.installation_id.as_deref(),
    );
    let registry = Arc::clone(&state.registry);
    let health = HealthConfig::from_config(&state.config.websocket);
    let shutdown = state.shutdown_receiver();

    ws.on_upgrade(move |socket| handle_connection(socket, filter, registry, health, shutdown))
}

async fn realtime_stats(State(state): State<Arc<AppState>>) -> Response {
    let live = state.registry.live_count();
    success_response(RealtimeStatsResponse {
        stats: state.registry.metrics().snapshot(live),
        timestamp: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::database::{NewInstallation, NewSensorInstallation, NewSensorType};
    use crate::readings::ReadingSubmission;
    use crate::webserver::routes::create_router;
    use crate::webserver::routes::test_support::{call, test_state, test_state_with};
    use crate::webserver::state::AppState;
    use axum::http::{Method, StatusCode};
    use futures::StreamExt;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_tungstenite::tungstenite::Message;

    async fn serve(state: Arc<AppState>) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn wait_for_subscribers(state: &Arc<AppState>, expected: usize) {
        for _ in 0..100 {
            if state.registry.live_count() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} subscribers, found {}",
            expected,
            state.registry.live_count()
        );
    }

    async fn next_text<S>(stream: &mut S) -> serde_json::Value
    where
        S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    {
        loop {
            let msg = tokio::time::timeout(Duration::from_secs(5), stream.next())
                .await
                .expect("timed out waiting for frame")
                .expect("stream ended")
                .expect("websocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    async fn seed(state: &Arc<AppState>) -> (i64, i64) {
        let installation = state
            .store
            .create_installation(NewInstallation {
                branch_id: None,
                name: "Tank A".into(),
                installed_on: "2024-01-10".into(),
                operational_status: None,
                description: None,
                usage_type: None,
            })
            .await
            .unwrap();
        let sensor = state
            .store
            .create_sensor_type(NewSensorType {
                sensor: "temperature".into(),
                description: "Water temperature".into(),
                model: None,
                brand: None,
                measurement_range: None,
                unit: Some("°C".into()),
            })
            .await
            .unwrap();
        let mounted = state
            .store
            .create_sensor_installation(NewSensorInstallation {
                installation_id: installation.id,
                sensor_id: sensor.id,
                installed_on: "2024-01-11".into(),
                description: "north corner".into(),
            })
            .await
            .unwrap();
        (mounted.id, installation.id)
    }

    #[tokio::test]
    async fn test_channel_without_filter_gets_error_then_close() {
        let (_dir, state) = test_state();
        let addr = serve(Arc::clone(&state)).await;

        let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws/readings", addr))
            .await
            .unwrap();

        let frame = next_text(&mut socket).await;
        assert_eq!(frame["type"], "error");
        assert_eq!(
            frame["message"],
            "must supply sensorInstalledId or installationId"
        );

        let closing = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .unwrap();
        assert!(matches!(closing, Some(Ok(Message::Close(_))) | None));
        assert_eq!(state.registry.live_count(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_matching_readings_only() {
        let (_dir, state) = test_state();
        let (sensor_id, installation_id) = seed(&state).await;
        let addr = serve(Arc::clone(&state)).await;

        let (mut by_sensor, _) = tokio_tungstenite::connect_async(format!(
            "ws://{}/ws/readings?sensorInstalledId={}",
            addr, sensor_id
        ))
        .await
        .unwrap();
        let (mut by_installation, _) = tokio_tungstenite::connect_async(format!(
            "ws://{}/ws/readings?installationId={}",
            addr, installation_id
        ))
        .await
        .unwrap();
        wait_for_subscribers(&state, 2).await;

        let created = state
            .ingest
            .submit_reading(ReadingSubmission {
                sensor_installed_id: sensor_id,
                value: 23.5,
                timestamp: Some("2024-03-01T10:15:00Z".into()),
            })
            .await
            .unwrap();

        for socket in [&mut by_sensor, &mut by_installation] {
            let frame = next_text(socket).await;
            assert_eq!(frame["type"], "reading.created");
            assert_eq!(frame["data"]["id"], created.id);
            assert_eq!(frame["data"]["takenAt"], "2024-03-01T10:15:00.000Z");
            assert_eq!(frame["data"]["unit"], "°C");
        }

        let (status, stats) = call(&state, Method::GET, "/api/realtime/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["stats"]["liveSubscriptions"], 2);
        assert_eq!(stats["stats"]["messagesQueued"], 2);

        drop(by_sensor);
        wait_for_subscribers(&state, 1).await;
    }

    #[tokio::test]
    async fn test_heartbeat_follows_state_config() {
        let mut config = Config::default();
        config.websocket.heartbeat_secs = 1;
        config.websocket.client_idle_timeout_secs = 30;
        let (_dir, state) = test_state_with(config);
        let (sensor_id, _) = seed(&state).await;
        let addr = serve(Arc::clone(&state)).await;

        let (mut socket, _) = tokio_tungstenite::connect_async(format!(
            "ws://{}/ws/readings?sensorInstalledId={}",
            addr, sensor_id
        ))
        .await
        .unwrap();

        let pinged = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match socket.next().await {
                    Some(Ok(Message::Ping(_))) => return true,
                    Some(Ok(_)) => continue,
                    _ => return false,
                }
            }
        })
        .await
        .expect("no ping within the configured heartbeat");
        assert!(pinged);
    }
}
