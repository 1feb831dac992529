//! # User Repository
//!
//! Staff accounts. Passwords and session handling belong to the external
//! auth layer; this table only carries the identity that sales and the
//! login audit reference.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use levain_core::{Role, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

const USER_COLUMNS: &str = "id, username, role, is_active, created_at";

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user with a generated id.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the username is taken.
    pub async fn insert(&self, username: &str, role: Role) -> DbResult<User> {
        debug!(username = %username, role = %role, "Inserting user");

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO users (id, username, role, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    /// Gets a user by username (the auth layer's lookup).
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, admins first then by username.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY role, username"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Deactivates a user. Their sales and login history stay untouched.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;

        let user = db.users().insert("aurora", Role::Admin).await.unwrap();
        assert!(user.role.is_admin());

        let by_name = db
            .users()
            .get_by_username("aurora")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, user.id);
        assert_eq!(by_name.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;
        db.users().insert("cashier", Role::Cashier).await.unwrap();

        let err = db.users().insert("cashier", Role::Cashier).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_deactivate() {
        let db = test_db().await;
        let user = db.users().insert("temp", Role::Cashier).await.unwrap();

        db.users().deactivate(&user.id).await.unwrap();
        let loaded = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert!(!loaded.is_active);
    }
}
