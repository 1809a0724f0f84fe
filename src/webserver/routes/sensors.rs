/// Sensor catalog and sensor installation routes
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    database::{NewSensorInstallation, NewSensorType},
    webserver::{
        state::AppState,
        utils::{
            created_response, invalid_input_response, message_response, not_found_response,
            page_from_query, parse_optional_id, path_id, store_error_response, success_response,
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorInstallationListQuery {
    pub installation_id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/sensor-catalog",
            get(list_sensor_types).post(create_sensor_type),
        )
        .route(
            "/sensor-catalog/:id",
            get(get_sensor_type).delete(delete_sensor_type),
        )
        .route(
            "/sensors-installed",
            get(list_sensor_installations).post(create_sensor_installation),
        )
        .route(
            "/sensors-installed/:id",
            get(get_sensor_installation).delete(delete_sensor_installation),
        )
}

// =============================================================================
// SENSOR CATALOG
// =============================================================================

async fn create_sensor_type(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewSensorType>, JsonRejection>,
) -> Response {
    let Json(new) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_input_response(&rejection.body_text()),
    };
    if new.sensor.trim().is_empty() || new.description.trim().is_empty() {
        return invalid_input_response("sensor and description must not be empty");
    }

    match state.store.create_sensor_type(new).await {
        Ok(created) => created_response(created),
        Err(e) => store_error_response("Create sensor type", e),
    }
}

async fn list_sensor_types(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = page_from_query(
        &state.config.pagination,
        query.limit.as_deref(),
        query.offset.as_deref(),
    );
    match state.store.list_sensor_types(page).await {
        Ok(rows) => success_response(rows),
        Err(e) => store_error_response("List sensor types", e),
    }
}

async fn get_sensor_type(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.store.get_sensor_type(id).await {
        Ok(Some(sensor)) => success_response(sensor),
        Ok(None) => not_found_response("sensor type", id),
        Err(e) => store_error_response("Get sensor type", e),
    }
}

async fn delete_sensor_type(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.store.delete_sensor_type(id).await {
        Ok(true) => message_response(&format!("sensor type {} deleted", id)),
        Ok(false) => not_found_response("sensor type", id),
        Err(e) => store_error_response("Delete sensor type", e),
    }
}

// =============================================================================
// SENSOR INSTALLATIONS
// =============================================================================

async fn create_sensor_installation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewSensorInstallation>, JsonRejection>,
) -> Response {
    let Json(new) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_input_response(&rejection.body_text()),
    };
    if new.installation_id < 1 || new.sensor_id < 1 {
        return invalid_input_response("installationId and sensorId must be positive integers");
    }

    match state.store.create_sensor_installation(new).await {
        Ok(created) => created_response(created),
        Err(e) => store_error_response("Create sensor installation", e),
    }
}

async fn list_sensor_installations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SensorInstallationListQuery>,
) -> Response {
    let installation_id =
        match parse_optional_id("installationId", query.installation_id.as_deref()) {
            Ok(id) => id,
            Err(response) => return response,
        };
    let page = page_from_query(
        &state.config.pagination,
        query.limit.as_deref(),
        query.offset.as_deref(),
    );

    match state.store.list_sensor_installations(installation_id, page).await {
        Ok(rows) => success_response(rows),
        Err(e) => store_error_response("List sensor installations", e),
    }
}

async fn get_sensor_installation(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.store.get_sensor_installation(id).await {
        Ok(Some(installed)) => success_response(installed),
        Ok(None) => not_found_response("sensor installation", id),
        Err(e) => store_error_response("Get sensor installation", e),
    }
}

async fn delete_sensor_installation(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.store.delete_sensor_installation(id).await {
        Ok(true) => message_response(&format!("sensor installation {} deleted", id)),
        Ok(false) => not_found_response("sensor installation", id),
        Err(e) => store_error_response("Delete sensor installation", e),
    }
}
