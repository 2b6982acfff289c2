use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::constants::{MAX_SUBMISSIONS_PER_WINDOW, RATE_LIMIT_WINDOW_MINUTES};
use crate::error::Result;

/// Fixed-window submission counter for one client IP
///
/// One row per IP per window. A new window row is allocated once the
/// previous row's start falls outside the lookback interval; old rows are
/// never purged. The check and the increment are separate statements, so
/// two submissions racing on the same IP can both be admitted at the
/// threshold, and a client can use one window's full quota right before a
/// boundary and the next window's right after it. Both limits of the
/// scheme are accepted behavior.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RateLimitWindow {
    pub id: i64,
    pub ip_address: String,
    pub window_start: DateTime<Utc>,
    pub submission_count: i64,
}

/// Earliest window start still considered active at `now`
pub fn window_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::minutes(RATE_LIMIT_WINDOW_MINUTES)
}

impl RateLimitWindow {
    /// Whether this window has used up its submission quota
    pub fn is_exhausted(&self) -> bool {
        self.submission_count >= MAX_SUBMISSIONS_PER_WINDOW
    }

    /// The counter row for this IP whose window is still active, if any
    pub async fn find_active(
        pool: &SqlitePool,
        ip_address: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RateLimitWindow>> {
        let window = sqlx::query_as::<_, RateLimitWindow>(
            r#"
            SELECT id, ip_address, window_start, submission_count
            FROM submission_rate_limits
            WHERE ip_address = ? AND window_start >= ?
            ORDER BY window_start DESC
            LIMIT 1
            "#,
        )
        .bind(ip_address)
        .bind(window_cutoff(now))
        .fetch_optional(pool)
        .await?;

        Ok(window)
    }

    /// Count one admitted submission against this IP
    ///
    /// Increments the active window found at admission time, or opens a
    /// new window starting now. Only called after the submission fully
    /// succeeded, so failed attempts do not consume quota.
    pub async fn record_submission(
        pool: &SqlitePool,
        active: Option<&RateLimitWindow>,
        ip_address: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match active {
            Some(window) => {
                sqlx::query(
                    "UPDATE submission_rate_limits
                     SET submission_count = submission_count + 1
                     WHERE id = ?",
                )
                .bind(window.id)
                .execute(pool)
                .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO submission_rate_limits (ip_address, window_start, submission_count)
                     VALUES (?, ?, 1)",
                )
                .bind(ip_address)
                .bind(now)
                .execute(pool)
                .await?;
            }
        }

        Ok(())
    }
}
