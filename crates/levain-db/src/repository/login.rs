//! # Login History Repository
//!
//! Bookkeeping of staff logins and logouts.
//!
//! A login inserts an open record; a logout stamps `logout_at` on the
//! user's most recent open record. Sessions abandoned without a logout
//! simply stay open - the audit trail records what happened, it doesn't
//! guess.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use levain_core::LoginHistory;

/// Repository for login-history database operations.
#[derive(Debug, Clone)]
pub struct LoginHistoryRepository {
    pool: SqlitePool,
}

const LOGIN_COLUMNS: &str = "id, user_id, ip_address, user_agent, login_at, logout_at";

impl LoginHistoryRepository {
    /// Creates a new LoginHistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LoginHistoryRepository { pool }
    }

    /// Records a login, returning the open history row.
    pub async fn record_login(
        &self,
        user_id: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> DbResult<LoginHistory> {
        debug!(user_id = %user_id, "Recording login");

        let record = LoginHistory {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            ip_address: ip_address.map(str::to_string),
            // Browsers send arbitrarily long agent strings; cap for storage
            user_agent: user_agent.map(|ua| ua.chars().take(255).collect()),
            login_at: Utc::now(),
            logout_at: None,
        };

        sqlx::query(
            "INSERT INTO login_history (id, user_id, ip_address, user_agent, login_at, logout_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.ip_address)
        .bind(&record.user_agent)
        .bind(record.login_at)
        .bind(record.logout_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Closes the user's most recent open login record.
    ///
    /// Returns the closed record, or None when the user has no open
    /// record (a logout without a matching login is a no-op, not an
    /// error).
    pub async fn record_logout(&self, user_id: &str) -> DbResult<Option<LoginHistory>> {
        debug!(user_id = %user_id, "Recording logout");

        let now = Utc::now();

        let closed_id: Option<String> = sqlx::query_scalar(
            "UPDATE login_history
             SET logout_at = ?2
             WHERE id = (
                 SELECT id FROM login_history
                 WHERE user_id = ?1 AND logout_at IS NULL
                 ORDER BY login_at DESC
                 LIMIT 1
             )
             RETURNING id",
        )
        .bind(user_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        let Some(id) = closed_id else {
            debug!(user_id = %user_id, "No open login record to close");
            return Ok(None);
        };

        let record = sqlx::query_as::<_, LoginHistory>(&format!(
            "SELECT {LOGIN_COLUMNS} FROM login_history WHERE id = ?1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(record))
    }

    /// Lists a user's login history, most recent first.
    pub async fn history_for_user(&self, user_id: &str, limit: u32) -> DbResult<Vec<LoginHistory>> {
        let records = sqlx::query_as::<_, LoginHistory>(&format!(
            "SELECT {LOGIN_COLUMNS}
             FROM login_history
             WHERE user_id = ?1
             ORDER BY login_at DESC
             LIMIT ?2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
