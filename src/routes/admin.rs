use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Application, ApplicationStatus, StatusCounts};
use crate::storage::{DocumentKind, SignedDocumentUrl};
use crate::AppState;

/// Header carrying the operator credential for admin endpoints
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub status: ApplicationStatus,
}

/// Check the per-request operator credential
///
/// Admin endpoints are disabled entirely while no admin key is configured.
fn authorize_admin(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let admin_key = state
        .config
        .admin_secret_key
        .as_ref()
        .ok_or(AppError::Unauthorized)?;

    let provided = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    if provided != admin_key {
        tracing::warn!("Invalid admin key attempt");
        return Err(AppError::Unauthorized);
    }

    Ok(())
}

/// List every application, newest first
///
/// The review dashboard filters and searches over this snapshot
/// client-side; there is no server-side pagination.
pub async fn list_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Application>>> {
    authorize_admin(&state, &headers)?;

    let applications = Application::list_all(&state.pool).await?;

    Ok(Json(applications))
}

/// Overwrite one application's status
///
/// Flat overwrite: any status may move to any other status, including back
/// to pending. No audit trail of prior statuses is kept.
pub async fn update_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    authorize_admin(&state, &headers)?;

    let matched = Application::set_status(&state.pool, &id, payload.status).await?;
    if !matched {
        return Err(AppError::ApplicationNotFound);
    }

    tracing::info!("Application {} status set to {}", id, payload.status.as_str());

    Ok(Json(UpdateStatusResponse {
        success: true,
        status: payload.status,
    }))
}

/// Generate a time-limited signed URL for one stored document
pub async fn document_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, kind)): Path<(String, DocumentKind)>,
) -> Result<Json<SignedDocumentUrl>> {
    authorize_admin(&state, &headers)?;

    let application = Application::find(&state.pool, &id)
        .await?
        .ok_or(AppError::ApplicationNotFound)?;

    let path = application
        .document_path(kind)
        .ok_or(AppError::DocumentNotFound)?;

    Ok(Json(state.store.signed_url(path, Utc::now())))
}

/// Per-status application counts for the dashboard summary cards
pub async fn admin_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatusCounts>> {
    authorize_admin(&state, &headers)?;

    let counts = Application::count_by_status(&state.pool).await?;

    Ok(Json(counts))
}
