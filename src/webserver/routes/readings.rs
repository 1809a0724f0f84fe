/// Reading routes: ingestion and history
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    database::ReadingStore,
    readings::{time::parse_timestamp, ReadingQuery, ReadingResponse, ReadingSubmission},
    webserver::{
        state::AppState,
        utils::{
            clamp_int, created_response, ingest_error_response, invalid_input_response,
            parse_optional_id, store_error_response, success_response,
        },
    },
};

/// Query parameters for reading history
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingsQuery {
    pub sensor_installed_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/readings", get(list_readings).post(create_reading))
}

/// POST /api/readings
async fn create_reading(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ReadingSubmission>, JsonRejection>,
) -> Response {
    let Json(submission) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_input_response(&rejection.body_text()),
    };

    match state.ingest.submit_reading(submission).await {
        Ok(created) => created_response(created),
        Err(e) => ingest_error_response(e),
    }
}

/// GET /api/readings?sensorInstalledId=&from=&to=&limit=
async fn list_readings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReadingsQuery>,
) -> Response {
    let sensor_installed_id =
        match parse_optional_id("sensorInstalledId", query.sensor_installed_id.as_deref()) {
            Ok(Some(id)) => id,
            Ok(None) => return invalid_input_response("sensorInstalledId is required"),
            Err(response) => return response,
        };

    let from = match parse_bound("from", query.from.as_deref()) {
        Ok(bound) => bound,
        Err(response) => return response,
    };
    let to = match parse_bound("to", query.to.as_deref()) {
        Ok(bound) => bound,
        Err(response) => return response,
    };

    let limits = &state.config.readings;
    let limit = clamp_int(
        query.limit.as_deref(),
        limits.list_default_limit,
        1,
        limits.list_max_limit,
    );

    let result = state
        .store
        .list_readings(ReadingQuery {
            sensor_installed_id,
            from,
            to,
            limit,
        })
        .await;

    match result {
        Ok(rows) => success_response(rows.iter().map(ReadingResponse::from).collect::<Vec<_>>()),
        Err(e) => store_error_response("Reading history query", e),
    }
}

fn parse_bound(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, Response> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| invalid_input_response(&format!("{} is not a valid date/time", field))),
    }
}
