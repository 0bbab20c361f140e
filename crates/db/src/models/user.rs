//! User entity models.

use serde::Serialize;
use slotswap_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// The password hash is never serialized; handlers expose [`PartyInfo`]
/// (or their own response types) instead of raw rows where possible.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub current_group_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for inserting a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public identity of one swap party (name/email only).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartyInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

impl From<&User> for PartyInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
