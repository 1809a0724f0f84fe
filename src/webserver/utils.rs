/// Shared response helpers for route handlers
use axum::{
    extract::{rejection::PathRejection, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::PaginationConfig;
use crate::database::Page;
use crate::errors::{IngestError, StoreError};
use crate::logger::{self, LogTag};
use crate::webserver::models::{ErrorDetails, ErrorResponse, SuccessResponse};

/// 200 with a JSON body
pub fn success_response<T: Serialize>(data: T) -> Response {
    Json(data).into_response()
}

/// 201 with a JSON body
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// `{ success, message, timestamp }` acknowledgement
pub fn message_response(message: &str) -> Response {
    success_response(SuccessResponse {
        success: true,
        message: message.to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Standard error body
pub fn error_response(
    status: StatusCode,
    code: &str,
    message: &str,
    details: Option<&str>,
) -> Response {
    let body = ErrorResponse {
        error: ErrorDetails {
            code: code.to_string(),
            message: message.to_string(),
            details: details.map(str::to_string),
            timestamp: chrono::Utc::now(),
            request_id: None,
        },
    };
    (status, Json(body)).into_response()
}

pub fn not_found_response(what: &str, id: i64) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        &format!("{} {} not found", what, id),
        None,
    )
}

pub fn invalid_input_response(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, "INVALID_INPUT", message, None)
}

/// Map a store failure. Constraint violations are the caller's fault;
/// anything else is logged and reported without internals.
pub fn store_error_response(operation: &str, err: StoreError) -> Response {
    if err.is_constraint_violation() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "CONSTRAINT_VIOLATION",
            "Request conflicts with existing records or references a missing one",
            Some(&err.to_string()),
        );
    }

    logger::error(LogTag::Api, &format!("{} failed: {}", operation, err));
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "STORE_FAILURE",
        "Internal storage error",
        None,
    )
}

pub fn ingest_error_response(err: IngestError) -> Response {
    let status = match &err {
        IngestError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        IngestError::NotFound(_) => StatusCode::NOT_FOUND,
        IngestError::StoreFailure(inner) => {
            logger::error(LogTag::Api, &format!("Reading ingestion failed: {}", inner));
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                err.code(),
                "Internal storage error",
                None,
            );
        }
    };
    error_response(status, err.code(), &err.to_string(), None)
}

/// Parse an integer query value and clamp it; missing or non-numeric
/// values fall back to `default`. A configured `max` below `min` is
/// raised to `min`.
pub fn clamp_int(raw: Option<&str>, default: i64, min: i64, max: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
        .clamp(min, max.max(min))
}

/// Clamp raw `limit` / `offset` query values into a page window
pub fn page_from_query(
    limits: &PaginationConfig,
    limit: Option<&str>,
    offset: Option<&str>,
) -> Page {
    Page {
        limit: clamp_int(limit, limits.default_limit, 1, limits.max_limit),
        offset: clamp_int(offset, 0, 0, limits.max_offset),
    }
}

/// Unwrap a `:id` path segment, turning axum's plain-text rejection into
/// the JSON error body
pub fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, Response> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => Err(invalid_input_response(&format!(
            "id must be an integer: {}",
            rejection.body_text()
        ))),
    }
}

/// Parse an optional positive id filter from a query string
pub fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<i64>, Response> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => match value.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Some(id)),
            _ => Err(invalid_input_response(&format!(
                "{} must be a positive integer",
                field
            ))),
        },
    }
}
