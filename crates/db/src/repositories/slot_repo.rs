//! Repository for the `slots` table.
//!
//! Besides plain CRUD this module carries the conditional-update primitive
//! the negotiation engine's correctness rests on: every status transition
//! is keyed on the expected prior status, so concurrent writers racing for
//! the same slot resolve to exactly one winner at the database.

use slotswap_core::slot::SlotStatus;
use slotswap_core::types::DbId;
use sqlx::PgPool;

use crate::models::slot::{CreateSlot, Slot, SlotWithOwner, UpdateSlot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, starts_at, ends_at, status, owner_id, group_id, created_at, updated_at";

/// Provides CRUD and conditional status transitions for slots.
pub struct SlotRepo;

impl SlotRepo {
    /// Insert a new slot, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSlot) -> Result<Slot, sqlx::Error> {
        let query = format!(
            "INSERT INTO slots (title, starts_at, ends_at, status, owner_id, group_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(&input.title)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.status)
            .bind(input.owner_id)
            .bind(input.group_id)
            .fetch_one(pool)
            .await
    }

    /// Find a slot by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = $1");
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's own slots within a group, earliest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        group_id: DbId,
    ) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slots
             WHERE owner_id = $1 AND group_id = $2
             ORDER BY starts_at ASC"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(owner_id)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    /// List SWAPPABLE slots offered by other members of a group, joined
    /// with the owner's public identity, earliest first.
    ///
    /// Membership is judged by the owner's *current* group so a member who
    /// moved to another group stops appearing in the marketplace.
    pub async fn list_swappable_for_group(
        pool: &PgPool,
        group_id: DbId,
        exclude_user: DbId,
    ) -> Result<Vec<SlotWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, SlotWithOwner>(
            "SELECT s.id, s.title, s.starts_at, s.ends_at, s.status, s.owner_id, s.group_id,
                    u.name AS owner_name, u.email AS owner_email
             FROM slots s
             JOIN users u ON u.id = s.owner_id
             WHERE s.status = 'SWAPPABLE'
               AND u.current_group_id = $1
               AND s.owner_id <> $2
             ORDER BY s.starts_at ASC",
        )
        .bind(group_id)
        .bind(exclude_user)
        .fetch_all(pool)
        .await
    }

    /// Update a slot, keyed on the status the caller last observed. Only
    /// non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the row is gone or its status moved on since the
    /// caller read it. The condition keeps an owner edit from silently
    /// overwriting a SWAP_PENDING lock a concurrent negotiation just took.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        expected: SlotStatus,
        input: &UpdateSlot,
    ) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!(
            "UPDATE slots SET
                title = COALESCE($3, title),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at),
                status = COALESCE($6, status),
                updated_at = now()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .bind(expected)
            .bind(&input.title)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a slot unless it is locked by a pending negotiation.
    ///
    /// Returns `true` if a row was removed; `false` means the slot is gone
    /// or became SWAP_PENDING since the caller last looked.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM slots WHERE id = $1 AND status <> 'SWAP_PENDING'")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition a slot's status only if it currently holds `expected`.
    ///
    /// Returns `true` when this caller won the transition; `false` means a
    /// concurrent writer got there first (or the slot moved on) and the
    /// caller must treat the operation as lost, not retry blindly.
    pub async fn transition_status(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        expected: SlotStatus,
        next: SlotStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE slots SET status = $3, updated_at = now()
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Hand a SWAP_PENDING slot to a new owner and mark it BUSY.
    ///
    /// Keyed on the SWAP_PENDING lock so the ownership exchange can never
    /// apply to a slot that was not committed to the accepted negotiation.
    pub async fn complete_swap(
        executor: impl sqlx::PgExecutor<'_>,
        id: DbId,
        new_owner: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE slots SET owner_id = $2, status = 'BUSY', updated_at = now()
             WHERE id = $1 AND status = 'SWAP_PENDING'",
        )
        .bind(id)
        .bind(new_owner)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
