//! # Login Audit Service
//!
//! Records who was at the register and when. The external auth layer does
//! the actual authentication; it calls in here after a login succeeds and
//! when a session ends.

use tracing::{debug, info};

use levain_core::{CoreError, LoginHistory, User};
use levain_db::Database;

use crate::error::PosResult;

/// Login/logout bookkeeping for staff users.
#[derive(Debug, Clone)]
pub struct LoginAudit {
    db: Database,
}

impl LoginAudit {
    /// Creates a login audit service over an opened database.
    pub fn new(db: Database) -> Self {
        LoginAudit { db }
    }

    /// Records a successful login.
    pub async fn record_login(
        &self,
        user_id: &str,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> PosResult<LoginHistory> {
        let record = self
            .db
            .logins()
            .record_login(user_id, ip_address, user_agent)
            .await?;

        info!(
            user_id = %user_id,
            ip = ip_address.unwrap_or("unknown"),
            "User logged in"
        );
        Ok(record)
    }

    /// Records a logout, closing the most recent open login record.
    /// A logout with no open record is a quiet no-op.
    pub async fn record_logout(&self, user_id: &str) -> PosResult<Option<LoginHistory>> {
        let closed = self.db.logins().record_logout(user_id).await?;

        match &closed {
            Some(record) => info!(user_id = %user_id, record_id = %record.id, "User logged out"),
            None => debug!(user_id = %user_id, "Logout without open login record"),
        }
        Ok(closed)
    }

    /// A user's login history, most recent first.
    pub async fn history(&self, user_id: &str, limit: u32) -> PosResult<Vec<LoginHistory>> {
        Ok(self.db.logins().history_for_user(user_id, limit).await?)
    }

    /// Resolves a username to its user row, for the auth layer.
    pub async fn find_user(&self, username: &str) -> PosResult<User> {
        self.db
            .users()
            .get_by_username(username)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(username.to_string()).into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
