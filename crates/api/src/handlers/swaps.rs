//! Swap negotiation handlers.
//!
//! These are thin adapters over [`NegotiationEngine`]; all rules and
//! atomicity live there and in the repositories it drives.
//!
//! [`NegotiationEngine`]: crate::engine::NegotiationEngine

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use slotswap_core::types::DbId;
use slotswap_db::models::slot::SlotWithOwner;
use slotswap_db::models::swap_request::SwapRequestDetail;
use slotswap_db::repositories::SwapRequestRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSwapRequestBody {
    /// The caller's own slot being offered.
    pub my_slot_id: DbId,
    /// The other member's slot being requested.
    pub their_slot_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct SwapResponseBody {
    pub accept: bool,
}

/// `GET /api/v1/swappable-slots` -- other members' SWAPPABLE slots.
pub async fn list_swappable_slots(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SlotWithOwner>>>> {
    let slots = state.engine.list_swappable_slots(auth.user_id).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// `POST /api/v1/swap-request`
pub async fn create_swap_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateSwapRequestBody>,
) -> AppResult<(StatusCode, Json<DataResponse<SwapRequestDetail>>)> {
    let detail = state
        .engine
        .create_swap_request(auth.user_id, body.my_slot_id, body.their_slot_id)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// `POST /api/v1/swap-response/{request_id}`
pub async fn respond_to_swap_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<DbId>,
    Json(body): Json<SwapResponseBody>,
) -> AppResult<Json<DataResponse<SwapRequestDetail>>> {
    let detail = state
        .engine
        .respond_to_swap_request(auth.user_id, request_id, body.accept)
        .await?;

    Ok(Json(DataResponse { data: detail }))
}

/// `GET /api/v1/swap-requests/incoming` -- PENDING requests awaiting the caller.
pub async fn list_incoming_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SwapRequestDetail>>>> {
    let requests = SwapRequestRepo::list_incoming(&state.pool, auth.user_id).await?;

    let mut details = Vec::with_capacity(requests.len());
    for request in &requests {
        details.push(SwapRequestRepo::populate(&state.pool, request).await?);
    }

    Ok(Json(DataResponse { data: details }))
}

/// `GET /api/v1/swap-requests/outgoing` -- every request the caller initiated.
pub async fn list_outgoing_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SwapRequestDetail>>>> {
    let requests = SwapRequestRepo::list_outgoing(&state.pool, auth.user_id).await?;

    let mut details = Vec::with_capacity(requests.len());
    for request in &requests {
        details.push(SwapRequestRepo::populate(&state.pool, request).await?);
    }

    Ok(Json(DataResponse { data: details }))
}
