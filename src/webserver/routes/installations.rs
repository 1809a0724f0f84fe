/// Installation CRUD routes
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
    database::NewInstallation,
    webserver::{
        state::AppState,
        utils::{
            created_response, invalid_input_response, message_response, not_found_response,
            page_from_query, parse_optional_id, path_id, store_error_response, success_response,
        },
    },
};

const OPERATIONAL_STATUSES: [&str; 2] = ["active", "inactive"];
const USAGE_TYPES: [&str; 3] = ["aquaculture", "treatment", "other"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationListQuery {
    pub branch_id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/installations",
            get(list_installations).post(create_installation),
        )
        .route(
            "/installations/:id",
            get(get_installation).delete(delete_installation),
        )
}

fn validate(new: &NewInstallation) -> Result<(), String> {
    if new.name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    if new.installed_on.trim().is_empty() {
        return Err("installedOn must not be empty".to_string());
    }
    if let Some(status) = new.operational_status.as_deref() {
        if !OPERATIONAL_STATUSES.contains(&status) {
            return Err(format!(
                "operationalStatus must be one of {}",
                OPERATIONAL_STATUSES.join(", ")
            ));
        }
    }
    if let Some(usage) = new.usage_type.as_deref() {
        if !USAGE_TYPES.contains(&usage) {
            return Err(format!("usageType must be one of {}", USAGE_TYPES.join(", ")));
        }
    }
    Ok(())
}

async fn create_installation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewInstallation>, JsonRejection>,
) -> Response {
    let Json(new) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_input_response(&rejection.body_text()),
    };
    if let Err(message) = validate(&new) {
        return invalid_input_response(&message);
    }

    match state.store.create_installation(new).await {
        Ok(created) => created_response(created),
        Err(e) => store_error_response("Create installation", e),
    }
}

async fn list_installations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InstallationListQuery>,
) -> Response {
    let branch_id = match parse_optional_id("branchId", query.branch_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let page = page_from_query(
        &state.config.pagination,
        query.limit.as_deref(),
        query.offset.as_deref(),
    );

    match state.store.list_installations(branch_id, page).await {
        Ok(rows) => success_response(rows),
        Err(e) => store_error_response("List installations", e),
    }
}

async fn get_installation(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.store.get_installation(id).await {
        Ok(Some(installation)) => success_response(installation),
        Ok(None) => not_found_response("installation", id),
        Err(e) => store_error_response("Get installation", e),
    }
}

async fn delete_installation(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match path_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.store.delete_installation(id).await {
        Ok(true) => message_response(&format!("installation {} deleted", id)),
        Ok(false) => not_found_response("installation", id),
        Err(e) => store_error_response("Delete installation", e),
    }
}

#[cfg(test)]
mod tests {
    use crate::webserver::routes::test_support::{call, test_state};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_installation_lifecycle() {
        let (_dir, state) = test_state();

        let (status, created) = call(
            &state,
            Method::POST,
            "/api/installations",
            Some(json!({ "branchId": 2, "name": "Pond 4", "installedOn": "2024-02-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["operationalStatus"], "active");
        assert_eq!(created["usageType"], "aquaculture");
        let id = created["id"].as_i64().unwrap();

        let (status, listed) =
            call(&state, Method::GET, "/api/installations?branchId=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (_, other_branch) =
            call(&state, Method::GET, "/api/installations?branchId=3", None).await;
        assert!(other_branch.as_array().unwrap().is_empty());

        let uri = format!("/api/installations/{}", id);
        let (status, fetched) = call(&state, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Pond 4");

        let (status, _) = call(&state, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&state, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_usage_type_is_rejected() {
        let (_dir, state) = test_state();
        let (status, body) = call(
            &state,
            Method::POST,
            "/api/installations",
            Some(json!({ "name": "X", "installedOn": "2024-02-01", "usageType": "swimming" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_non_numeric_id_gets_json_error() {
        let (_dir, state) = test_state();
        for method in [Method::GET, Method::DELETE] {
            let (status, body) = call(&state, method, "/api/installations/pond", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["code"], "INVALID_INPUT");
        }
    }
}
