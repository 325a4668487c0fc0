//! API route definitions

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::handlers;
use super::static_files::fallback;
use crate::config::Config;
use crate::store::{ConfigModule, DrawingStore};
use crate::types::{
    FileEntry, ListResponse, SaveConfigRequest, SaveRequest, SaveResponse, StatusResponse,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "sketchsave API",
        version = "0.1.0",
        description = "Local persistence for a browser-based drawing tool"
    ),
    tags(
        (name = "drawings", description = "Saving, listing and loading drawings"),
        (name = "config", description = "Configuration module")
    ),
    paths(
        handlers::save,
        handlers::list_files,
        handlers::load_file,
        handlers::save_config,
    ),
    components(schemas(
        SaveRequest,
        SaveResponse,
        SaveConfigRequest,
        StatusResponse,
        FileEntry,
        ListResponse,
    ))
)]
pub struct ApiDoc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DrawingStore>,
    pub config_module: Arc<ConfigModule>,
    pub static_root: PathBuf,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            store: Arc::new(DrawingStore::new(config.data_path())),
            config_module: Arc::new(ConfigModule::new(
                config.config_module_path(),
                config.config_export.clone(),
            )),
            static_root: config.root.clone(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// Create the API router.
///
/// Each API path only answers its own method; anything else on that path
/// goes through the same fallback as unknown paths (static files for `GET`,
/// "Unknown API endpoint" otherwise).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Drawings
        .route("/api/save", post(handlers::save).fallback(fallback))
        .route("/api/list", get(handlers::list_files).fallback(fallback))
        .route("/api/load", get(handlers::load_file).fallback(fallback))

        // Configuration module
        .route("/api/save-config", post(handlers::save_config).fallback(fallback))

        // OpenAPI spec
        .route("/api/openapi.json", get(handlers::openapi).fallback(fallback))

        // Static files
        .fallback(fallback)

        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
