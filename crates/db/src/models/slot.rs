//! Calendar slot entity models.

use serde::Serialize;
use slotswap_core::slot::SlotStatus;
use slotswap_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Slot {
    pub id: DbId,
    pub title: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: SlotStatus,
    pub owner_id: DbId,
    pub group_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A slot joined with its owner's public identity, as returned by the
/// swappable-slot listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SlotWithOwner {
    pub id: DbId,
    pub title: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: SlotStatus,
    pub owner_id: DbId,
    pub group_id: DbId,
    pub owner_name: String,
    pub owner_email: String,
}

/// Input for inserting a new slot.
#[derive(Debug, Clone)]
pub struct CreateSlot {
    pub title: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub status: SlotStatus,
    pub owner_id: DbId,
    pub group_id: DbId,
}

/// Partial update for a slot. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateSlot {
    pub title: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub status: Option<SlotStatus>,
}
