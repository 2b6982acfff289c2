//! Scholarship Intake Server Library
//!
//! This module exports the core types and the router for testing and reuse.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod storage;

pub use config::Config;
pub use db::create_pool;
pub use error::{AppError, Result};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};

use storage::DocumentStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub store: DocumentStore,
    pub config: Config,
}

/// Build the application router
///
/// The public form posts from any origin; preflight requests are answered
/// by the CORS layer with no body.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/applications", post(routes::submit_application))
        .route("/api/documents/:folder/:file", get(routes::download_document))
        .route("/api/admin/applications", get(routes::list_applications))
        .route(
            "/api/admin/applications/:id/status",
            put(routes::update_status),
        )
        .route(
            "/api/admin/applications/:id/documents/:kind",
            get(routes::document_link),
        )
        .route("/api/admin/stats", get(routes::admin_stats))
        .layer(DefaultBodyLimit::max(constants::MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}
