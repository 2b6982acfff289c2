use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::constants::{SIGNED_URL_TTL_SECS, STORAGE_TOKEN_LEN};
use crate::error::{AppError, Result};
use crate::security::{random_token, sign_document_path};

/// The four kinds of document an application can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Transcript,
    ApplicationLetter,
    NominationLetter,
    SupportingDocs,
}

impl DocumentKind {
    /// Logical storage folder for this document kind
    pub fn folder(self) -> &'static str {
        match self {
            DocumentKind::Transcript => "transcripts",
            DocumentKind::ApplicationLetter => "application-letters",
            DocumentKind::NominationLetter => "nomination-letters",
            DocumentKind::SupportingDocs => "supporting-docs",
        }
    }
}

/// A time-limited document link
#[derive(Debug, Clone, Serialize)]
pub struct SignedDocumentUrl {
    pub url: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

/// Filesystem-backed document store
///
/// Documents are written once under a folder per kind and never publicly
/// addressable by raw path: reads go through signed, expiring URLs issued
/// by [`DocumentStore::signed_url`] and checked by the download route.
#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
    secret: String,
    public_base_url: String,
}

impl DocumentStore {
    pub fn new(
        root: impl Into<PathBuf>,
        secret: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            secret: secret.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Persist one document and return its relative storage path
    ///
    /// The submission aborts on the first failed upload; documents stored
    /// earlier in the same request are left in place unreferenced.
    pub async fn save(
        &self,
        kind: DocumentKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let name = object_name(original_name, Utc::now().timestamp_millis());
        let relative = format!("{}/{}", kind.folder(), name);

        let folder = self.root.join(kind.folder());
        fs::create_dir_all(&folder).await?;
        fs::write(folder.join(&name), bytes).await?;

        tracing::debug!("Stored {} document at {}", kind.folder(), relative);

        Ok(relative)
    }

    /// Generate a signed URL for one stored document, valid for 1 hour
    pub fn signed_url(&self, relative_path: &str, now: DateTime<Utc>) -> SignedDocumentUrl {
        let expires_at = now.timestamp() + SIGNED_URL_TTL_SECS;
        let signature = sign_document_path(relative_path, expires_at, &self.secret);

        SignedDocumentUrl {
            url: format!(
                "{}/api/documents/{}?expires={}&signature={}",
                self.public_base_url, relative_path, expires_at, signature
            ),
            expires_at,
        }
    }

    /// Read a stored document's bytes by relative path
    pub async fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
        let relative = Path::new(relative_path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(AppError::DocumentNotFound);
        }

        match fs::read(self.root.join(relative)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::DocumentNotFound),
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

/// Compose a collision-resistant stored object name
///
/// Current time in milliseconds plus a short random token, keeping the
/// original file's extension.
fn object_name(original_name: &str, now_millis: i64) -> String {
    let ext: String = original_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(10)
        .collect::<String>()
        .to_lowercase();
    let ext = if ext.is_empty() { "bin".to_string() } else { ext };

    format!("{}-{}.{}", now_millis, random_token(STORAGE_TOKEN_LEN), ext)
}

/// Content type for serving a stored document, inferred from its extension
pub fn content_type_for(relative_path: &str) -> &'static str {
    match relative_path.rsplit('.').next() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_keeps_extension() {
        let name = object_name("transcript.pdf", 1715000000000);
        assert!(name.starts_with("1715000000000-"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_object_name_sanitizes_extension() {
        let name = object_name("weird.P/D:F", 1715000000000);
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_object_name_without_extension() {
        // No dot in the name: the whole name doubles as the extension,
        // matching the path scheme this replaces
        let name = object_name("transcript", 1715000000000);
        assert!(name.ends_with(".transcript"));
    }

    #[test]
    fn test_object_names_are_unique() {
        let a = object_name("a.pdf", 1715000000000);
        let b = object_name("a.pdf", 1715000000000);
        assert_ne!(a, b);
    }

    #[test]
    fn test_document_kind_folders() {
        assert_eq!(DocumentKind::Transcript.folder(), "transcripts");
        assert_eq!(DocumentKind::ApplicationLetter.folder(), "application-letters");
        assert_eq!(DocumentKind::NominationLetter.folder(), "nomination-letters");
        assert_eq!(DocumentKind::SupportingDocs.folder(), "supporting-docs");
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("transcripts/a.pdf"), "application/pdf");
        assert_eq!(content_type_for("transcripts/a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("transcripts/a"), "application/octet-stream");
    }

    #[test]
    fn test_signed_url_shape() {
        let store = DocumentStore::new("/tmp/docs", "secret", "http://localhost:8080");
        let now = Utc::now();
        let signed = store.signed_url("transcripts/a.pdf", now);

        assert_eq!(signed.expires_at, now.timestamp() + SIGNED_URL_TTL_SECS);
        assert!(signed
            .url
            .starts_with("http://localhost:8080/api/documents/transcripts/a.pdf?expires="));
        assert!(signed.url.contains("&signature="));
    }

    #[tokio::test]
    async fn test_read_rejects_traversal() {
        let store = DocumentStore::new("/tmp/docs", "secret", "http://localhost:8080");
        let result = store.read("../etc/passwd").await;
        assert!(matches!(result, Err(AppError::DocumentNotFound)));
    }
}
