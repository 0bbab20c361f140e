//! Swap-request entity models.

use serde::Serialize;
use slotswap_core::swap::SwapStatus;
use slotswap_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::models::slot::Slot;
use crate::models::user::PartyInfo;

/// A row from the `swap_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SwapRequest {
    pub id: DbId,
    pub status: SwapStatus,
    pub initiator_id: DbId,
    pub receiver_id: DbId,
    pub initiator_slot_id: DbId,
    pub receiver_slot_id: DbId,
    pub created_at: Timestamp,
    pub responded_at: Option<Timestamp>,
}

/// A swap request populated with both parties and both slots, as sent to
/// clients and carried in notification payloads.
#[derive(Debug, Clone, Serialize)]
pub struct SwapRequestDetail {
    pub id: DbId,
    pub status: SwapStatus,
    pub created_at: Timestamp,
    pub responded_at: Option<Timestamp>,
    pub initiator: PartyInfo,
    pub receiver: PartyInfo,
    pub initiator_slot: Slot,
    pub receiver_slot: Slot,
}
