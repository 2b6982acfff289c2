use axum::{
    extract::{ConnectInfo, Multipart, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::net::SocketAddr;

use crate::error::{AppError, Result};
use crate::models::{Application, NewApplication, RateLimitWindow};
use crate::routes::validation::{
    client_ip, validate_fields, validate_files, ApplicationFields, SubmissionFiles, UploadedFile,
};
use crate::storage::DocumentKind;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

/// Accept one scholarship application
///
/// The request is one unit of work: rate-limit check, then field and file
/// validation, then the document uploads in sequence, then a single record
/// insert. Any failure aborts the remaining steps; nothing is retried and
/// no partially uploaded documents are removed. The rate-limit counter
/// only advances for fully successful submissions.
pub async fn submit_application(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<SubmitResponse>> {
    let ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    tracing::info!("Submission attempt from IP: {}", ip);

    // Admission is decided before the body is parsed
    let now = Utc::now();
    let window = RateLimitWindow::find_active(&state.pool, &ip, now).await?;
    if window.as_ref().is_some_and(|w| w.is_exhausted()) {
        tracing::warn!("Rate limit exceeded for IP: {}", ip);
        return Err(AppError::RateLimitExceeded);
    }

    let (fields, files) = read_submission(multipart).await?;

    validate_fields(&fields).map_err(AppError::InvalidInput)?;
    let files = validate_files(files).map_err(AppError::InvalidInput)?;

    tracing::info!("Uploading documents...");

    let transcript_path = save_document(&state, DocumentKind::Transcript, &files.transcript).await?;
    let application_letter_path =
        save_document(&state, DocumentKind::ApplicationLetter, &files.application_letter).await?;
    let nomination_letter_path =
        save_document(&state, DocumentKind::NominationLetter, &files.nomination_letter).await?;
    let supporting_docs_path = match &files.supporting_docs {
        Some(file) => Some(save_document(&state, DocumentKind::SupportingDocs, file).await?),
        None => None,
    };

    let application = Application::insert(
        &state.pool,
        NewApplication {
            full_name: fields.full_name.trim().to_string(),
            email: fields.email.trim().to_lowercase(),
            phone: fields.phone.trim().to_string(),
            community_name: fields.community_name.trim().to_string(),
            university: fields.university.trim().to_string(),
            course: fields.course.trim().to_string(),
            // yearOfStudy is stored exactly as sent
            year_of_study: fields.year_of_study,
            cgpa: fields.cgpa.trim().to_string(),
            reason: fields.reason.trim().to_string(),
            transcript_path,
            application_letter_path,
            nomination_letter_path,
            supporting_docs_path,
        },
    )
    .await?;

    RateLimitWindow::record_submission(&state.pool, window.as_ref(), &ip, now).await?;

    tracing::info!("Application {} saved", application.id);

    Ok(Json(SubmitResponse {
        success: true,
        message: "Application submitted successfully".to_string(),
    }))
}

async fn save_document(
    state: &AppState,
    kind: DocumentKind,
    file: &UploadedFile,
) -> Result<String> {
    state.store.save(kind, &file.file_name, &file.bytes).await
}

/// Pull the text fields and attachments out of the multipart body
///
/// Unknown parts are ignored; absent text fields stay empty and fall to
/// the presence check.
async fn read_submission(mut multipart: Multipart) -> Result<(ApplicationFields, SubmissionFiles)> {
    let mut fields = ApplicationFields::default();
    let mut files = SubmissionFiles::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "fullName" => fields.full_name = field.text().await?,
            "email" => fields.email = field.text().await?,
            "phone" => fields.phone = field.text().await?,
            "communityName" => fields.community_name = field.text().await?,
            "university" => fields.university = field.text().await?,
            "course" => fields.course = field.text().await?,
            "yearOfStudy" => fields.year_of_study = field.text().await?,
            "cgpa" => fields.cgpa = field.text().await?,
            "reason" => fields.reason = field.text().await?,
            "transcript" | "applicationLetter" | "nominationLetter" | "supportingDocs" => {
                let file = UploadedFile {
                    file_name: field.file_name().unwrap_or("upload").to_string(),
                    content_type: field.content_type().unwrap_or("").to_string(),
                    bytes: field.bytes().await?.to_vec(),
                };
                match name.as_str() {
                    "transcript" => files.transcript = Some(file),
                    "applicationLetter" => files.application_letter = Some(file),
                    "nominationLetter" => files.nomination_letter = Some(file),
                    _ => files.supporting_docs = Some(file),
                }
            }
            _ => {}
        }
    }

    Ok((fields, files))
}
