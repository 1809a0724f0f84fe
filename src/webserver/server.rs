/// Axum webserver implementation
///
/// Startup, CORS, and graceful termination on Ctrl+C / SIGTERM
use axum::http::{HeaderValue, Method};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    config::WebserverConfig,
    logger::{self, LogTag},
    webserver::{routes, state::AppState},
};

/// Start the webserver
///
/// This function blocks until the server is shut down
pub async fn start_server(state: Arc<AppState>) -> Result<(), String> {
    let (host, port) = (
        state.config.webserver.host.clone(),
        state.config.webserver.port,
    );

    let app = build_app(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid bind address {}:{}: {}", host, port, e))?;

    let listener = TcpListener::bind(&addr).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::AddrInUse => format!(
            "Failed to bind to {}: Address already in use\n\
             \n\
             Another aquasonda instance (or another service) is listening on port {}.\n\
             Stop it or start with --port <PORT>.",
            addr, port
        ),
        std::io::ErrorKind::PermissionDenied => format!(
            "Failed to bind to {}: Permission denied\n\
             \n\
             Port {} requires elevated privileges on this system.\n\
             Consider using a port above 1024 or running with appropriate permissions.",
            addr, port
        ),
        _ => format!("Failed to bind to {}: {}", addr, e),
    })?;

    logger::info(
        LogTag::Webserver,
        &format!("Listening on http://{} (channel ws://{}/ws/readings)", addr, addr),
    );

    let shutdown_state = Arc::clone(&state);
    let shutdown_signal = async move {
        wait_for_shutdown().await;
        logger::info(LogTag::Webserver, "Shutdown requested, closing channels...");
        shutdown_state.signal_shutdown();
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    logger::info(LogTag::Webserver, "Webserver stopped gracefully");

    Ok(())
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::warning(
                LogTag::Webserver,
                &format!("Failed to listen for Ctrl+C: {}", e),
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                logger::warning(
                    LogTag::Webserver,
                    &format!("Failed to listen for SIGTERM: {}", e),
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Build the Axum application with all routes and middleware
fn build_app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.webserver);
    routes::create_router(state).layer(cors)
}

fn cors_layer(config: &WebserverConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors_allow_any {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                logger::warning(
                    LogTag::Webserver,
                    &format!("Ignoring invalid CORS origin '{}'", origin),
                );
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
