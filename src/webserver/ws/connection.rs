/// Readings channel connection handler
///
/// Validates the subscription filter, registers with the registry and
/// then forwards queued frames to the client until either side goes away.
/// Deregistration happens when the subscription handle drops at loop exit.
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::{
    arguments::is_debug_websocket_enabled,
    errors::FilterError,
    logger::{self, LogTag},
};

use super::{
    filters::SubscriptionFilter,
    health::{ConnectionHealth, HealthConfig, HealthVerdict},
    message::{ClientMessage, ServerMessage},
    metrics::ConnectionMetrics,
    registry::SubscriptionRegistry,
};

type WsSink = SplitSink<WebSocket, Message>;

/// How often liveness is evaluated
const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Drive one upgraded socket
pub async fn handle_connection(
    socket: WebSocket,
    filter: Result<SubscriptionFilter, FilterError>,
    registry: Arc<SubscriptionRegistry>,
    health_config: HealthConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let filter = match filter {
        Ok(filter) => filter,
        Err(e) => {
            registry.metrics().subscription_rejected();
            if is_debug_websocket_enabled() {
                logger::debug(LogTag::Websocket, &format!("Rejecting channel: {}", e));
            }
            reject(&mut ws_tx, &e.to_string()).await;
            return;
        }
    };

    let (handle, mut queue) = registry.register(filter);
    let conn_id = handle.id();
    let metrics = ConnectionMetrics::default();
    let mut health = ConnectionHealth::new(health_config);

    let mut ticker = tokio::time::interval(HEALTH_CHECK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            Ok(()) = shutdown.changed() => {
                let _ = ws_tx
                    .send(Message::Close(Some(CloseFrame {
                        code: close_code::AWAY,
                        reason: Cow::from("server shutting down"),
                    })))
                    .await;
                break;
            }

            frame = queue.recv() => {
                let Some(frame) = frame else { break };
                if let Err(e) = ws_tx.send(Message::Text(frame.to_string())).await {
                    logger::warning(
                        LogTag::Websocket,
                        &format!("Connection {}: failed to send frame: {}", conn_id, e),
                    );
                    break;
                }
                metrics.inc_sent();
            }

            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        health.record_activity();
                        metrics.inc_received();
                        if let Err(e) = handle_client_message(&text, &mut ws_tx).await {
                            if is_debug_websocket_enabled() {
                                logger::debug(
                                    LogTag::Websocket,
                                    &format!("Connection {}: {}", conn_id, e),
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                        health.record_activity();
                        metrics.inc_received();
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        if is_debug_websocket_enabled() {
                            logger::debug(
                                LogTag::Websocket,
                                &format!("Connection {}: client closed", conn_id),
                            );
                        }
                        break;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        health.record_activity();
                    }
                    Some(Err(e)) => {
                        logger::warning(
                            LogTag::Websocket,
                            &format!("Connection {}: websocket error: {}", conn_id, e),
                        );
                        break;
                    }
                }
            }

            _ = ticker.tick() => {
                match health.check() {
                    HealthVerdict::Healthy => {}
                    HealthVerdict::SendPing => {
                        if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                            break;
                        }
                        health.record_ping();
                    }
                    HealthVerdict::IdleTimeout => {
                        logger::info(
                            LogTag::Websocket,
                            &format!(
                                "Connection {}: idle for {}s, closing",
                                conn_id,
                                health.seconds_since_activity()
                            ),
                        );
                        break;
                    }
                    HealthVerdict::PongTimeout => {
                        logger::info(
                            LogTag::Websocket,
                            &format!("Connection {}: ping unanswered, closing", conn_id),
                        );
                        break;
                    }
                }
            }
        }
    }

    drop(handle);

    if is_debug_websocket_enabled() {
        logger::debug(
            LogTag::Websocket,
            &format!(
                "Connection {} finished (sent={}, received={})",
                conn_id,
                metrics.sent(),
                metrics.received()
            ),
        );
    }
}

/// Send an error envelope then a policy-violation close
async fn reject(ws_tx: &mut WsSink, message: &str) {
    let envelope = ServerMessage::Error {
        message: message.to_string(),
    };
    if let Ok(json) = envelope.to_json() {
        let _ = ws_tx.send(Message::Text(json)).await;
    }
    let _ = ws_tx
        .send(Message::Close(Some(CloseFrame {
            code: close_code::POLICY,
            reason: Cow::from("invalid subscription filter"),
        })))
        .await;
}

async fn handle_client_message(text: &str, ws_tx: &mut WsSink) -> Result<(), String> {
    let message: ClientMessage =
        serde_json::from_str(text).map_err(|e| format!("Ignoring client message: {}", e))?;

    match message {
        ClientMessage::Ping { id } => {
            let json = ServerMessage::Pong { id }
                .to_json()
                .map_err(|e| format!("Serialization error: {}", e))?;
            ws_tx
                .send(Message::Text(json))
                .await
                .map_err(|e| format!("Send error: {}", e))?;
        }
    }

    Ok(())
}
