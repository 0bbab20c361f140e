//! Orchestrates swap negotiations end to end.
//!
//! Each operation follows the same shape: load current facts, run the pure
//! precondition checks from `slotswap_core::negotiation`, then apply all
//! mutations inside a single transaction whose individual updates are
//! conditional on the expected prior state. A failed condition aborts the
//! transaction (dropping it rolls everything back), so concurrent callers
//! racing for the same slot or request resolve to exactly one winner.
//! Events are published only after the transaction has committed.

use std::sync::Arc;

use slotswap_core::error::CoreError;
use slotswap_core::negotiation::{self, RequestFacts, SlotFacts};
use slotswap_core::slot::SlotStatus;
use slotswap_core::swap::SwapStatus;
use slotswap_core::types::DbId;
use slotswap_db::models::slot::{Slot, SlotWithOwner};
use slotswap_db::models::swap_request::SwapRequestDetail;
use slotswap_db::repositories::{SlotRepo, SwapRequestRepo, UserRepo};
use slotswap_db::DbPool;
use slotswap_events::{EventBus, SwapEvent, SwapEventKind};

use crate::error::{AppError, AppResult};

/// Coordinates swap-request creation and responses against the database
/// and publishes a [`SwapEvent`] for each committed state change.
#[derive(Clone)]
pub struct NegotiationEngine {
    pool: DbPool,
    event_bus: Arc<EventBus>,
}

impl NegotiationEngine {
    pub fn new(pool: DbPool, event_bus: Arc<EventBus>) -> Self {
        Self { pool, event_bus }
    }

    /// Create a swap request: validate, lock both slots as SWAP_PENDING,
    /// and record the PENDING request, all in one transaction.
    pub async fn create_swap_request(
        &self,
        requester_id: DbId,
        my_slot_id: DbId,
        their_slot_id: DbId,
    ) -> AppResult<SwapRequestDetail> {
        let my_slot = self.load_slot_facts(my_slot_id).await?;
        let their_slot = self.load_slot_facts(their_slot_id).await?;

        negotiation::check_swap_request(requester_id, &my_slot, &their_slot)?;

        let mut tx = self.pool.begin().await?;

        let locked_mine = SlotRepo::transition_status(
            &mut *tx,
            my_slot_id,
            SlotStatus::Swappable,
            SlotStatus::SwapPending,
        )
        .await?;
        if !locked_mine {
            return Err(CoreError::Conflict("Your slot is no longer swappable".into()).into());
        }

        let locked_theirs = SlotRepo::transition_status(
            &mut *tx,
            their_slot_id,
            SlotStatus::Swappable,
            SlotStatus::SwapPending,
        )
        .await?;
        if !locked_theirs {
            return Err(CoreError::Conflict("Their slot is no longer swappable".into()).into());
        }

        let request = SwapRequestRepo::create(
            &mut *tx,
            requester_id,
            their_slot.owner_id,
            my_slot_id,
            their_slot_id,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            request_id = request.id,
            initiator_id = requester_id,
            receiver_id = their_slot.owner_id,
            "swap request created"
        );

        let detail = SwapRequestRepo::populate(&self.pool, &request).await?;
        self.publish(SwapEventKind::Requested, request.receiver_id, &detail);

        Ok(detail)
    }

    /// Respond to a pending swap request.
    ///
    /// Accepting exchanges slot ownership and marks both slots BUSY;
    /// rejecting releases both slots back to SWAPPABLE. Either way the
    /// request moves to its terminal status atomically with the slot
    /// updates.
    pub async fn respond_to_swap_request(
        &self,
        responder_id: DbId,
        request_id: DbId,
        accept: bool,
    ) -> AppResult<SwapRequestDetail> {
        let request = SwapRequestRepo::find_by_id(&self.pool, request_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Swap request",
                id: request_id,
            })?;

        let facts = RequestFacts {
            id: request.id,
            receiver_id: request.receiver_id,
            status: request.status,
        };
        negotiation::check_swap_response(responder_id, &facts)?;

        let next = if accept {
            SwapStatus::Accepted
        } else {
            SwapStatus::Rejected
        };

        let mut tx = self.pool.begin().await?;

        let claimed = SwapRequestRepo::claim_response(&mut *tx, request_id, next)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict("This request has already been responded to".into())
            })?;

        if accept {
            // Cross-assign ownership: each slot goes to the other party.
            let a = SlotRepo::complete_swap(
                &mut *tx,
                claimed.initiator_slot_id,
                claimed.receiver_id,
            )
            .await?;
            let b = SlotRepo::complete_swap(
                &mut *tx,
                claimed.receiver_slot_id,
                claimed.initiator_id,
            )
            .await?;
            if !(a && b) {
                return Err(CoreError::Internal(
                    "Swap state out of sync: a committed slot is not SWAP_PENDING".into(),
                )
                .into());
            }
        } else {
            let a = SlotRepo::transition_status(
                &mut *tx,
                claimed.initiator_slot_id,
                SlotStatus::SwapPending,
                SlotStatus::Swappable,
            )
            .await?;
            let b = SlotRepo::transition_status(
                &mut *tx,
                claimed.receiver_slot_id,
                SlotStatus::SwapPending,
                SlotStatus::Swappable,
            )
            .await?;
            if !(a && b) {
                return Err(CoreError::Internal(
                    "Swap state out of sync: a committed slot is not SWAP_PENDING".into(),
                )
                .into());
            }
        }

        tx.commit().await?;

        tracing::info!(
            request_id,
            responder_id,
            status = next.as_str(),
            "swap request resolved"
        );

        let detail = SwapRequestRepo::populate(&self.pool, &claimed).await?;
        let kind = if accept {
            SwapEventKind::Accepted
        } else {
            SwapEventKind::Rejected
        };
        self.publish(kind, claimed.initiator_id, &detail);

        Ok(detail)
    }

    /// List SWAPPABLE slots offered by other members of the viewer's group.
    pub async fn list_swappable_slots(&self, viewer_id: DbId) -> AppResult<Vec<SlotWithOwner>> {
        let group_id = UserRepo::current_group(&self.pool, viewer_id)
            .await?
            .ok_or_else(|| {
                CoreError::Validation("Create or join a group first to see swappable slots".into())
            })?;

        Ok(SlotRepo::list_swappable_for_group(&self.pool, group_id, viewer_id).await?)
    }

    /// Load a slot together with its owner's current group.
    async fn load_slot_facts(&self, slot_id: DbId) -> Result<SlotFacts, AppError> {
        let slot: Slot = SlotRepo::find_by_id(&self.pool, slot_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Slot",
                id: slot_id,
            })?;

        let owner_group_id = UserRepo::current_group(&self.pool, slot.owner_id).await?;

        Ok(SlotFacts {
            id: slot.id,
            owner_id: slot.owner_id,
            owner_group_id,
            status: slot.status,
        })
    }

    fn publish(&self, kind: SwapEventKind, recipient_id: DbId, detail: &SwapRequestDetail) {
        match serde_json::to_value(detail) {
            Ok(payload) => {
                self.event_bus
                    .publish(SwapEvent::new(kind, recipient_id, payload));
            }
            Err(e) => {
                // Delivery is best-effort; the state change is already durable.
                tracing::warn!(error = %e, kind = kind.as_str(), "failed to serialize swap event");
            }
        }
    }
}
