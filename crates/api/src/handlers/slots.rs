//! Slot CRUD handlers.
//!
//! Owners manage their own slots and may toggle them between BUSY and
//! SWAPPABLE. The SWAP_PENDING status is owned by the negotiation engine:
//! it cannot be set here, and a slot holding it cannot be edited or
//! deleted until the pending request resolves.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use slotswap_core::error::CoreError;
use slotswap_core::slot::{SlotDraft, SlotStatus};
use slotswap_core::types::{DbId, Timestamp};
use slotswap_db::models::slot::{CreateSlot, Slot, UpdateSlot};
use slotswap_db::repositories::{SlotRepo, UserRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSlotRequest {
    pub title: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    /// Defaults to BUSY when omitted.
    pub status: Option<SlotStatus>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateSlotRequest {
    pub title: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub status: Option<SlotStatus>,
}

/// `GET /api/v1/slots` -- the caller's own slots in their current group.
pub async fn list_slots(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    let slots = match UserRepo::current_group(&state.pool, auth.user_id).await? {
        Some(group_id) => SlotRepo::list_for_owner(&state.pool, auth.user_id, group_id).await?,
        None => Vec::new(),
    };

    Ok(Json(DataResponse { data: slots }))
}

/// `POST /api/v1/slots`
pub async fn create_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateSlotRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Slot>>)> {
    let draft = SlotDraft {
        title: body.title.trim().to_string(),
        starts_at: body.starts_at,
        ends_at: body.ends_at,
    };
    draft.validate()?;
    draft.check_time_range()?;

    let status = body.status.unwrap_or(SlotStatus::Busy);
    if !status.owner_settable() {
        return Err(CoreError::Validation(
            "Slots cannot be created in SWAP_PENDING status".into(),
        )
        .into());
    }

    let group_id = UserRepo::current_group(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            CoreError::Validation("Create or join a group before adding slots".into())
        })?;

    let slot = SlotRepo::create(
        &state.pool,
        &CreateSlot {
            title: draft.title,
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            status,
            owner_id: auth.user_id,
            group_id,
        },
    )
    .await?;

    tracing::info!(slot_id = slot.id, owner_id = auth.user_id, "slot created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: slot })))
}

/// `PUT /api/v1/slots/{id}`
pub async fn update_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateSlotRequest>,
) -> AppResult<Json<DataResponse<Slot>>> {
    let slot = load_owned_unlocked_slot(&state, auth.user_id, id).await?;

    if body.status.is_some_and(|s| !s.owner_settable()) {
        return Err(CoreError::Validation(
            "Slots cannot be moved to SWAP_PENDING directly".into(),
        )
        .into());
    }

    // Validate the effective (post-update) field values.
    let draft = SlotDraft {
        title: body.title.clone().unwrap_or_else(|| slot.title.clone()),
        starts_at: body.starts_at.unwrap_or(slot.starts_at),
        ends_at: body.ends_at.unwrap_or(slot.ends_at),
    };
    draft.validate()?;
    draft.check_time_range()?;

    // Keyed on the status read above: if a negotiation locked the slot in
    // the meantime, the write loses instead of clobbering the lock.
    let updated = SlotRepo::update(
        &state.pool,
        id,
        slot.status,
        &UpdateSlot {
            title: body.title,
            starts_at: body.starts_at,
            ends_at: body.ends_at,
            status: body.status,
        },
    )
    .await?
    .ok_or_else(|| {
        CoreError::Conflict("The slot changed while your update was in flight".into())
    })?;

    Ok(Json(DataResponse { data: updated }))
}

/// `DELETE /api/v1/slots/{id}`
pub async fn delete_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned_unlocked_slot(&state, auth.user_id, id).await?;

    // The delete itself refuses SWAP_PENDING rows, so a negotiation that
    // locked the slot after the check above wins the race.
    let deleted = SlotRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::Conflict(
            "This slot is locked by a pending swap request".into(),
        )
        .into());
    }

    tracing::info!(slot_id = id, owner_id = auth.user_id, "slot deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Load a slot and check the caller owns it and it is not locked by a
/// pending swap.
async fn load_owned_unlocked_slot(
    state: &AppState,
    user_id: DbId,
    id: DbId,
) -> Result<Slot, AppError> {
    let slot = SlotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Slot", id })?;

    if slot.owner_id != user_id {
        return Err(CoreError::Forbidden("You do not own this slot".into()).into());
    }

    if slot.status == SlotStatus::SwapPending {
        return Err(CoreError::Conflict(
            "This slot is locked by a pending swap request".into(),
        )
        .into());
    }

    Ok(slot)
}
