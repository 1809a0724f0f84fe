use crate::webserver::state::AppState;
use axum::Router;
use std::sync::Arc;

pub mod health;
pub mod installations;
pub mod readings;
pub mod sensors;
pub mod ws;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(ws::channel_routes())
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(readings::routes())
        .merge(installations::routes())
        .merge(sensors::routes())
        .merge(ws::routes())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::Config;
    use crate::database::SqliteStore;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    /// Fresh state over a temporary database; keep the TempDir alive
    pub fn test_state() -> (tempfile::TempDir, Arc<AppState>) {
        test_state_with(Config::default())
    }

    /// Same as `test_state` with an explicit configuration
    pub fn test_state_with(config: Config) -> (tempfile::TempDir, Arc<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("api.db"), &config.database).unwrap();
        (dir, Arc::new(AppState::new(config, store)))
    }

    /// Send one request through the router and decode the JSON body
    pub async fn call(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = create_router(Arc::clone(state))
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
