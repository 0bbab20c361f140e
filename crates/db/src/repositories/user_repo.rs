//! Repository for the `users` table.

use slotswap_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, PartyInfo, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, current_group_id, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive, emails are stored lowercased).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the public identity (name/email) of a user.
    pub async fn party_info(pool: &PgPool, id: DbId) -> Result<PartyInfo, sqlx::Error> {
        sqlx::query_as::<_, PartyInfo>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Fetch just the user's current group, if any.
    pub async fn current_group(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<DbId>>("SELECT current_group_id FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Point the user's current group at `group_id`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn set_current_group(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        group_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET current_group_id = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(group_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
