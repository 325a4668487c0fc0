//! API request handlers

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;

use super::routes::{ApiDoc, AppState};
use crate::error::{Error, Result};
use crate::types::{
    ListResponse, LoadParams, SaveConfigRequest, SaveRequest, SaveResponse, StatusResponse,
};

/// Parse a JSON request body regardless of the declared content type
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Save a drawing or an exported file
#[utoipa::path(
    post,
    path = "/api/save",
    request_body = SaveRequest,
    responses(
        (status = 200, description = "File written", body = SaveResponse),
        (status = 400, description = "Missing filename or payload, invalid filename or base64"),
        (status = 500, description = "Write failed")
    ),
    tag = "drawings"
)]
pub async fn save(State(state): State<AppState>, body: Bytes) -> Result<Json<SaveResponse>> {
    let request: SaveRequest = parse_body(&body)?;
    let (filename, payload) = request.into_parts()?;

    let path = state.store.save(&filename, payload).await?;

    Ok(Json(SaveResponse {
        status: "success".into(),
        path: path.display().to_string(),
    }))
}

/// List saved drawings
#[utoipa::path(
    get,
    path = "/api/list",
    responses(
        (status = 200, description = "Saved drawings, filename descending", body = ListResponse),
        (status = 500, description = "Data directory unreadable")
    ),
    tag = "drawings"
)]
pub async fn list_files(State(state): State<AppState>) -> Result<Json<ListResponse>> {
    let files = state.store.list().await?;
    Ok(Json(ListResponse { files }))
}

/// Load a saved drawing verbatim
#[utoipa::path(
    get,
    path = "/api/load",
    params(LoadParams),
    responses(
        (status = 200, description = "Stored JSON bytes, served as application/json"),
        (status = 400, description = "Missing or invalid filename"),
        (status = 404, description = "File not found")
    ),
    tag = "drawings"
)]
pub async fn load_file(
    State(state): State<AppState>,
    query: std::result::Result<Query<LoadParams>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(params) = query.map_err(|rejection| {
        Error::BadRequest(format!("Invalid query: {}", rejection.body_text()))
    })?;
    let filename = params
        .file
        .ok_or_else(|| Error::BadRequest("Missing file parameter".into()))?;

    let bytes = state.store.load(&filename).await?;
    tracing::debug!("Loaded {} ({} bytes)", filename, bytes.len());

    Ok(([(header::CONTENT_TYPE, "application/json")], bytes))
}

/// Overwrite the configuration module
#[utoipa::path(
    post,
    path = "/api/save-config",
    request_body = SaveConfigRequest,
    responses(
        (status = 200, description = "Configuration module written", body = StatusResponse),
        (status = 400, description = "Missing config"),
        (status = 500, description = "Write failed")
    ),
    tag = "config"
)]
pub async fn save_config(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>> {
    let request: SaveConfigRequest = parse_body(&body)?;
    let config = request
        .config
        .ok_or_else(|| Error::BadRequest("Missing config".into()))?;

    state.config_module.save(&config).await?;

    Ok(Json(StatusResponse { status: "ok".into() }))
}

/// OpenAPI document for the endpoints above
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    Json(ApiDoc::openapi())
}
