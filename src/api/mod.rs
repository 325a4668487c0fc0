//! HTTP API layer

mod routes;
mod handlers;
mod static_files;

pub use routes::{create_router, ApiDoc, AppState};
