//! # API REST
//!
//! REST API implementation for docstore.
//!
//! Handles:
//! - HTTP endpoints with axum (upload, list, download, delete, liveness)
//! - OpenAPI documentation
//! - REST-specific concerns (multipart parsing, JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for wire types and `docstore-core` for every storage operation.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use docstore_core::DocumentService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

pub use error::ApiError;

/// Largest request body accepted on any route (uploads included).
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    documents: DocumentService,
}

impl AppState {
    pub fn new(documents: DocumentService) -> Self {
        Self { documents }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::index,
        handlers::health,
        handlers::upload,
        handlers::list_documents,
        handlers::download,
        handlers::delete,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::UploadForm,
        api_shared::UploadRes,
        api_shared::DocumentRes,
        api_shared::DeleteReq,
        api_shared::MessageRes,
        api_shared::ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the complete REST application around `documents`.
pub fn router(documents: DocumentService) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/documents", get(handlers::list_documents))
        .route("/download/*identifier", get(handlers::download))
        .route("/delete", post(handlers::delete))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(documents))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
