use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::security::{link_is_live, verify_document_signature};
use crate::storage::content_type_for;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignedLinkParams {
    pub expires: i64,
    pub signature: String,
}

/// Serve one stored document through a signed, expiring link
///
/// Documents are never addressable by raw path: the signature covers the
/// exact path and expiry issued by the admin document-link endpoint, so a
/// link grants read access to one object until it expires.
pub async fn download_document(
    State(state): State<AppState>,
    Path((folder, file)): Path<(String, String)>,
    Query(params): Query<SignedLinkParams>,
) -> Result<Response> {
    let relative_path = format!("{}/{}", folder, file);

    if !verify_document_signature(
        &relative_path,
        params.expires,
        &params.signature,
        state.store.secret(),
    ) {
        return Err(AppError::InvalidSignature);
    }

    if !link_is_live(params.expires, Utc::now().timestamp()) {
        return Err(AppError::LinkExpired);
    }

    let bytes = state.store.read(&relative_path).await?;

    Ok((
        [(header::CONTENT_TYPE, content_type_for(&relative_path))],
        bytes,
    )
        .into_response())
}
