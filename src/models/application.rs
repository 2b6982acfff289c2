use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::storage::DocumentKind;

/// Review status of one application
///
/// Any status may be overwritten by any other status; there is no guarded
/// transition graph and no audit trail of prior values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// One stored scholarship application
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub community_name: String,
    pub university: String,
    pub course: String,
    pub year_of_study: String,
    pub cgpa: String,
    pub reason: String,
    pub transcript_path: String,
    pub application_letter_path: String,
    pub nomination_letter_path: String,
    pub supporting_docs_path: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated applicant data plus resolved document paths, ready to insert
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub community_name: String,
    pub university: String,
    pub course: String,
    pub year_of_study: String,
    pub cgpa: String,
    pub reason: String,
    pub transcript_path: String,
    pub application_letter_path: String,
    pub nomination_letter_path: String,
    pub supporting_docs_path: Option<String>,
}

/// Per-status application counts for the admin summary
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub under_review: i64,
    pub approved: i64,
    pub rejected: i64,
}

impl Application {
    /// Insert exactly one new record with status `pending` and a
    /// server-assigned id and creation timestamp
    pub async fn insert(pool: &SqlitePool, new: NewApplication) -> Result<Application> {
        let application = Application {
            id: Uuid::new_v4().to_string(),
            full_name: new.full_name,
            email: new.email,
            phone: new.phone,
            community_name: new.community_name,
            university: new.university,
            course: new.course,
            year_of_study: new.year_of_study,
            cgpa: new.cgpa,
            reason: new.reason,
            transcript_path: new.transcript_path,
            application_letter_path: new.application_letter_path,
            nomination_letter_path: new.nomination_letter_path,
            supporting_docs_path: new.supporting_docs_path,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO scholarship_applications (
                id, full_name, email, phone, community_name, university,
                course, year_of_study, cgpa, reason,
                transcript_path, application_letter_path, nomination_letter_path,
                supporting_docs_path, status, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.id)
        .bind(&application.full_name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.community_name)
        .bind(&application.university)
        .bind(&application.course)
        .bind(&application.year_of_study)
        .bind(&application.cgpa)
        .bind(&application.reason)
        .bind(&application.transcript_path)
        .bind(&application.application_letter_path)
        .bind(&application.nomination_letter_path)
        .bind(&application.supporting_docs_path)
        .bind(application.status)
        .bind(application.created_at)
        .execute(pool)
        .await?;

        Ok(application)
    }

    /// All applications, newest first
    ///
    /// Filtering and searching stay client-side; no pagination.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM scholarship_applications ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(applications)
    }

    pub async fn find(pool: &SqlitePool, id: &str) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            "SELECT * FROM scholarship_applications WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(application)
    }

    /// Overwrite the status field, returning whether a row matched
    pub async fn set_status(
        pool: &SqlitePool,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE scholarship_applications SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Per-status counts for the admin summary cards
    pub async fn count_by_status(pool: &SqlitePool) -> Result<StatusCounts> {
        let rows = sqlx::query_as::<_, (ApplicationStatus, i64)>(
            "SELECT status, COUNT(*) FROM scholarship_applications GROUP BY status",
        )
        .fetch_all(pool)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            counts.total += count;
            match status {
                ApplicationStatus::Pending => counts.pending = count,
                ApplicationStatus::UnderReview => counts.under_review = count,
                ApplicationStatus::Approved => counts.approved = count,
                ApplicationStatus::Rejected => counts.rejected = count,
            }
        }

        Ok(counts)
    }

    /// Storage path of one of this application's documents
    ///
    /// `None` only for the optional supporting documents; the three
    /// required documents are non-null from creation.
    pub fn document_path(&self, kind: DocumentKind) -> Option<&str> {
        match kind {
            DocumentKind::Transcript => Some(&self.transcript_path),
            DocumentKind::ApplicationLetter => Some(&self.application_letter_path),
            DocumentKind::NominationLetter => Some(&self.nomination_letter_path),
            DocumentKind::SupportingDocs => self.supporting_docs_path.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_application() -> Application {
        Application {
            id: "11111111-2222-3333-4444-555555555555".to_string(),
            full_name: "Amina Yusuf".to_string(),
            email: "amina@example.com".to_string(),
            phone: "+2348012345678".to_string(),
            community_name: "Makoko".to_string(),
            university: "University of Lagos".to_string(),
            course: "Computer Science".to_string(),
            year_of_study: "3".to_string(),
            cgpa: "4.5".to_string(),
            reason: "Need support to finish my degree".to_string(),
            transcript_path: "transcripts/1-a.pdf".to_string(),
            application_letter_path: "application-letters/1-b.pdf".to_string(),
            nomination_letter_path: "nomination-letters/1-c.pdf".to_string(),
            supporting_docs_path: None,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::UnderReview).unwrap(),
            "\"under_review\""
        );
        let parsed: ApplicationStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Approved);
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        let parsed: std::result::Result<ApplicationStatus, _> =
            serde_json::from_str("\"archived\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_document_path_selection() {
        let app = sample_application();

        assert_eq!(
            app.document_path(DocumentKind::Transcript),
            Some("transcripts/1-a.pdf")
        );
        assert_eq!(app.document_path(DocumentKind::SupportingDocs), None);
    }

    #[test]
    fn test_application_serializes_camel_case() {
        let json = serde_json::to_value(sample_application()).unwrap();

        assert_eq!(json["fullName"], "Amina Yusuf");
        assert_eq!(json["status"], "pending");
        assert!(json["supportingDocsPath"].is_null());
    }
}
