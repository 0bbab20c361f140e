//! Pure precondition checks for the swap negotiation engine.
//!
//! The engine in `slotswap-api` re-reads current state from the database and
//! feeds it through these functions before attempting any mutation. Checks
//! run in a fixed order and the first failure wins, so every rejection maps
//! to one well-defined [`CoreError`] kind (and therefore one HTTP status).
//!
//! These checks alone do not make the engine safe under concurrency; the
//! persistence layer's conditional status updates do. They exist so that a
//! losing writer gets a precise error instead of a mystery, and so the rules
//! are testable without a database.

use crate::error::CoreError;
use crate::slot::SlotStatus;
use crate::swap::SwapStatus;
use crate::types::DbId;

/// The facts about a slot the negotiation rules care about, captured at
/// read time. The engine never holds on to these across a mutation; it
/// re-reads and rebuilds them per operation.
#[derive(Debug, Clone, Copy)]
pub struct SlotFacts {
    pub id: DbId,
    pub owner_id: DbId,
    /// The owner's current group, if any.
    pub owner_group_id: Option<DbId>,
    pub status: SlotStatus,
}

/// The facts about a swap request needed to validate a response.
#[derive(Debug, Clone, Copy)]
pub struct RequestFacts {
    pub id: DbId,
    pub receiver_id: DbId,
    pub status: SwapStatus,
}

/// Validate a `create_swap_request` call.
///
/// Order (first failure wins):
/// 1. requester owns the offered slot
/// 2. the requested slot belongs to someone else
/// 3. both owners share a current group
/// 4. both slots are currently SWAPPABLE
///
/// Existence of both slots is precondition zero and is checked by the
/// caller while loading the facts.
pub fn check_swap_request(
    requester_id: DbId,
    my_slot: &SlotFacts,
    their_slot: &SlotFacts,
) -> Result<(), CoreError> {
    if my_slot.owner_id != requester_id {
        return Err(CoreError::Forbidden(
            "You do not own the offered slot".into(),
        ));
    }

    if their_slot.owner_id == requester_id {
        return Err(CoreError::Validation("Cannot swap with yourself".into()));
    }

    match (my_slot.owner_group_id, their_slot.owner_group_id) {
        (Some(mine), Some(theirs)) if mine == theirs => {}
        _ => {
            return Err(CoreError::Forbidden(
                "Cannot swap slots with users outside your group".into(),
            ));
        }
    }

    if my_slot.status != SlotStatus::Swappable {
        return Err(CoreError::Conflict("Your slot is not swappable".into()));
    }
    if their_slot.status != SlotStatus::Swappable {
        return Err(CoreError::Conflict("Their slot is not swappable".into()));
    }

    Ok(())
}

/// Validate a `respond_to_swap_request` call.
///
/// Order: the request must still be PENDING ("already responded" is
/// terminal, not retryable), then the responder must be the receiver.
pub fn check_swap_response(responder_id: DbId, request: &RequestFacts) -> Result<(), CoreError> {
    if request.status.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "This request has already been {}",
            request.status.as_str().to_lowercase()
        )));
    }

    if request.receiver_id != responder_id {
        return Err(CoreError::Forbidden(
            "You are not authorized to respond to this request".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: DbId = 1;
    const BOB: DbId = 2;
    const CAROL: DbId = 3;
    const GROUP: DbId = 10;
    const OTHER_GROUP: DbId = 11;

    fn slot(id: DbId, owner: DbId, group: Option<DbId>, status: SlotStatus) -> SlotFacts {
        SlotFacts {
            id,
            owner_id: owner,
            owner_group_id: group,
            status,
        }
    }

    fn swappable(id: DbId, owner: DbId) -> SlotFacts {
        slot(id, owner, Some(GROUP), SlotStatus::Swappable)
    }

    #[test]
    fn valid_request_between_group_members_passes() {
        let s1 = swappable(100, ALICE);
        let s2 = swappable(200, BOB);
        assert!(check_swap_request(ALICE, &s1, &s2).is_ok());
    }

    #[test]
    fn offering_a_slot_you_do_not_own_is_forbidden() {
        let s1 = swappable(100, BOB);
        let s2 = swappable(200, CAROL);
        let err = check_swap_request(ALICE, &s1, &s2).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn swapping_with_yourself_is_rejected() {
        // Scenario: Alice offers her own slot and requests another of her
        // own slots (including the degenerate S1 == S1 case).
        let s1 = swappable(100, ALICE);
        let err = check_swap_request(ALICE, &s1, &s1).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let s2 = swappable(200, ALICE);
        let err = check_swap_request(ALICE, &s1, &s2).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn cross_group_swaps_are_forbidden() {
        let s1 = swappable(100, ALICE);
        let s2 = slot(200, BOB, Some(OTHER_GROUP), SlotStatus::Swappable);
        let err = check_swap_request(ALICE, &s1, &s2).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn owner_without_a_group_cannot_swap() {
        let s1 = slot(100, ALICE, None, SlotStatus::Swappable);
        let s2 = swappable(200, BOB);
        let err = check_swap_request(ALICE, &s1, &s2).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn non_swappable_offered_slot_is_a_conflict() {
        let s1 = slot(100, ALICE, Some(GROUP), SlotStatus::Busy);
        let s2 = swappable(200, BOB);
        let err = check_swap_request(ALICE, &s1, &s2).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn locked_target_slot_is_a_conflict() {
        // Scenario C: Carol targets a slot already committed to Alice's
        // pending request. She must see a conflict, not a validation error.
        let s1 = swappable(100, CAROL);
        let s2 = slot(200, BOB, Some(GROUP), SlotStatus::SwapPending);
        let err = check_swap_request(CAROL, &s1, &s2).unwrap_err();
        match err {
            CoreError::Conflict(msg) => assert!(msg.contains("not swappable")),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn ownership_check_precedes_status_check() {
        // Both violations present; ownership must win.
        let s1 = slot(100, BOB, Some(GROUP), SlotStatus::Busy);
        let s2 = swappable(200, CAROL);
        let err = check_swap_request(ALICE, &s1, &s2).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    fn request(receiver: DbId, status: SwapStatus) -> RequestFacts {
        RequestFacts {
            id: 500,
            receiver_id: receiver,
            status,
        }
    }

    #[test]
    fn receiver_may_respond_to_pending_request() {
        assert!(check_swap_response(BOB, &request(BOB, SwapStatus::Pending)).is_ok());
    }

    #[test]
    fn second_response_is_a_conflict() {
        for terminal in [SwapStatus::Accepted, SwapStatus::Rejected] {
            let err = check_swap_response(BOB, &request(BOB, terminal)).unwrap_err();
            match err {
                CoreError::Conflict(msg) => assert!(msg.contains("already been")),
                other => panic!("expected Conflict, got {other:?}"),
            }
        }
    }

    #[test]
    fn only_the_receiver_may_respond() {
        let err = check_swap_response(CAROL, &request(BOB, SwapStatus::Pending)).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn terminal_status_reported_before_authorization() {
        // A non-receiver poking an already-answered request sees the
        // terminal conflict, matching the documented check order.
        let err = check_swap_response(CAROL, &request(BOB, SwapStatus::Accepted)).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }
}
