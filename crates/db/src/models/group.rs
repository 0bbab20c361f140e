//! Group entity models.

use serde::Serialize;
use slotswap_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::models::user::PartyInfo;

/// A row from the `groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    /// Six-character uppercase join code, unique across all groups.
    pub code: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A group populated with its creator and member identities, as returned
/// by the group-detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GroupDetail {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub created_by: PartyInfo,
    pub members: Vec<PartyInfo>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
