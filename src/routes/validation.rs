use axum::http::HeaderMap;
use std::net::SocketAddr;

use crate::constants::*;

/// The nine applicant text fields, as received off the wire
#[derive(Debug, Default, Clone)]
pub struct ApplicationFields {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub community_name: String,
    pub university: String,
    pub course: String,
    pub year_of_study: String,
    pub cgpa: String,
    pub reason: String,
}

/// One uploaded document as received off the wire
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The up-to-four document attachments of one submission
#[derive(Debug, Default)]
pub struct SubmissionFiles {
    pub transcript: Option<UploadedFile>,
    pub application_letter: Option<UploadedFile>,
    pub nomination_letter: Option<UploadedFile>,
    pub supporting_docs: Option<UploadedFile>,
}

/// Attachments that passed validation; the three required documents are
/// guaranteed present
#[derive(Debug)]
pub struct ValidatedFiles {
    pub transcript: UploadedFile,
    pub application_letter: UploadedFile,
    pub nomination_letter: UploadedFile,
    pub supporting_docs: Option<UploadedFile>,
}

/// Validate the nine text fields
///
/// First violation wins; errors are never aggregated. Presence is checked
/// for every field in wire order, then the email shape, then the length
/// caps (yearOfStudy and cgpa carry none).
pub fn validate_fields(fields: &ApplicationFields) -> Result<(), String> {
    let required: [(&str, &str); 9] = [
        ("fullName", fields.full_name.as_str()),
        ("email", fields.email.as_str()),
        ("phone", fields.phone.as_str()),
        ("communityName", fields.community_name.as_str()),
        ("university", fields.university.as_str()),
        ("course", fields.course.as_str()),
        ("yearOfStudy", fields.year_of_study.as_str()),
        ("cgpa", fields.cgpa.as_str()),
        ("reason", fields.reason.as_str()),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(format!("{} is required", name));
        }
    }

    if !is_valid_email(&fields.email) {
        return Err(ERR_INVALID_EMAIL.to_string());
    }

    let caps: [(&str, usize, &str); 7] = [
        (fields.full_name.as_str(), MAX_FULL_NAME_LEN, "Full name too long"),
        (fields.email.as_str(), MAX_EMAIL_LEN, "Email too long"),
        (fields.phone.as_str(), MAX_PHONE_LEN, "Phone number too long"),
        (
            fields.community_name.as_str(),
            MAX_COMMUNITY_NAME_LEN,
            "Community name too long",
        ),
        (
            fields.university.as_str(),
            MAX_UNIVERSITY_LEN,
            "University name too long",
        ),
        (fields.course.as_str(), MAX_COURSE_LEN, "Course name too long"),
        (fields.reason.as_str(), MAX_REASON_LEN, "Reason too long"),
    ];
    for (value, cap, message) in caps {
        if value.chars().count() > cap {
            return Err(message.to_string());
        }
    }

    Ok(())
}

/// Validate the document attachments
///
/// Missing-required-file checks run before the per-file size/type checks,
/// so a missing transcript reports as missing even when other attachments
/// would also fail validation.
pub fn validate_files(files: SubmissionFiles) -> Result<ValidatedFiles, String> {
    let transcript = files
        .transcript
        .ok_or_else(|| ERR_TRANSCRIPT_REQUIRED.to_string())?;
    let application_letter = files
        .application_letter
        .ok_or_else(|| ERR_APPLICATION_LETTER_REQUIRED.to_string())?;
    let nomination_letter = files
        .nomination_letter
        .ok_or_else(|| ERR_NOMINATION_LETTER_REQUIRED.to_string())?;

    validate_file(&transcript)?;
    validate_file(&application_letter)?;
    validate_file(&nomination_letter)?;
    if let Some(supporting_docs) = &files.supporting_docs {
        validate_file(supporting_docs)?;
    }

    Ok(ValidatedFiles {
        transcript,
        application_letter,
        nomination_letter,
        supporting_docs: files.supporting_docs,
    })
}

/// Size and declared-type check for one attachment
fn validate_file(file: &UploadedFile) -> Result<(), String> {
    if file.bytes.len() > MAX_FILE_SIZE_BYTES {
        return Err(format!("File {} exceeds 10MB limit", file.file_name));
    }
    if !ALLOWED_CONTENT_TYPES.contains(&file.content_type.as_str()) {
        return Err(format!(
            "File {} has invalid type. Allowed: PDF, Word, JPEG, PNG",
            file.file_name
        ));
    }
    Ok(())
}

/// Basic `local@domain.tld` shape check
///
/// No whitespace, exactly one `@`, non-empty local part, and a dot in the
/// domain with at least one character on each side. Nothing deeper: no MX
/// lookup, no internationalized-domain handling.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => (local, domain),
        _ => return false,
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Derive the client identity used for rate limiting
///
/// First forwarded-for entry, then the x-real-ip header, then the direct
/// connection peer. Clients behind proxies that strip forwarding headers
/// collapse into the "unknown" bucket.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    if let Some(peer) = peer {
        return peer.ip().to_string();
    }

    "unknown".to_string()
}
