//! Repository for the `swap_requests` table.

use slotswap_core::swap::SwapStatus;
use slotswap_core::types::DbId;
use sqlx::PgPool;

use crate::models::swap_request::{SwapRequest, SwapRequestDetail};
use crate::repositories::{SlotRepo, UserRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, status, initiator_id, receiver_id, initiator_slot_id, \
                       receiver_slot_id, created_at, responded_at";

/// Provides operations for swap-request records.
pub struct SwapRequestRepo;

impl SwapRequestRepo {
    /// Insert a new PENDING request, returning the created row.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        initiator_id: DbId,
        receiver_id: DbId,
        initiator_slot_id: DbId,
        receiver_slot_id: DbId,
    ) -> Result<SwapRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO swap_requests
                (initiator_id, receiver_id, initiator_slot_id, receiver_slot_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(initiator_id)
            .bind(receiver_id)
            .bind(initiator_slot_id)
            .bind(receiver_slot_id)
            .fetch_one(executor)
            .await
    }

    /// Find a request by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SwapRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM swap_requests WHERE id = $1");
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a PENDING request to a terminal status, recording the response
    /// time. Conditional on the request still being PENDING, so exactly one
    /// of any number of concurrent responders gets the row back; the rest
    /// get `None` and must report "already responded".
    pub async fn claim_response(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        next: SwapStatus,
    ) -> Result<Option<SwapRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE swap_requests SET status = $2, responded_at = now()
             WHERE id = $1 AND status = 'PENDING'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(id)
            .bind(next)
            .fetch_optional(executor)
            .await
    }

    /// PENDING requests awaiting the given receiver, newest first.
    pub async fn list_incoming(
        pool: &PgPool,
        receiver_id: DbId,
    ) -> Result<Vec<SwapRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM swap_requests
             WHERE receiver_id = $1 AND status = 'PENDING'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(receiver_id)
            .fetch_all(pool)
            .await
    }

    /// All requests ever initiated by the given user, newest first.
    pub async fn list_outgoing(
        pool: &PgPool,
        initiator_id: DbId,
    ) -> Result<Vec<SwapRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM swap_requests
             WHERE initiator_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SwapRequest>(&query)
            .bind(initiator_id)
            .fetch_all(pool)
            .await
    }

    /// Populate a request with both parties and both slots.
    ///
    /// The referenced rows are FK-protected and never deleted, so a missing
    /// one is a data integrity fault and surfaces as `RowNotFound`.
    pub async fn populate(
        pool: &PgPool,
        request: &SwapRequest,
    ) -> Result<SwapRequestDetail, sqlx::Error> {
        let initiator = UserRepo::party_info(pool, request.initiator_id).await?;
        let receiver = UserRepo::party_info(pool, request.receiver_id).await?;
        let initiator_slot = SlotRepo::find_by_id(pool, request.initiator_slot_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let receiver_slot = SlotRepo::find_by_id(pool, request.receiver_slot_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        Ok(SwapRequestDetail {
            id: request.id,
            status: request.status,
            created_at: request.created_at,
            responded_at: request.responded_at,
            initiator,
            receiver,
            initiator_slot,
            receiver_slot,
        })
    }
}
