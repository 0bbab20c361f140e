pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                WebSocket (IDENTIFY handshake)
///
/// /auth/signup                       register (public)
/// /auth/login                        login (public)
/// /auth/me                           current user
///
/// /groups                            create group
/// /groups/join                       join by code
/// /groups/my-groups                  groups the caller belongs to
/// /groups/switch/{group_id}          change current group (PUT)
/// /groups/{group_id}                 group detail with members
/// /groups/{group_id}/leave           leave a group (POST)
///
/// /slots                             list own, create
/// /slots/{id}                        update, delete
///
/// /swappable-slots                   other members' SWAPPABLE slots
/// /swap-request                      create a swap request (POST)
/// /swap-response/{request_id}        accept or reject (POST)
/// /swap-requests/incoming            PENDING requests awaiting the caller
/// /swap-requests/outgoing            requests the caller initiated
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket.
        .route("/ws", get(ws::ws_handler))
        // Auth.
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        // Groups.
        .route("/groups", post(handlers::groups::create_group))
        .route("/groups/join", post(handlers::groups::join_group))
        .route("/groups/my-groups", get(handlers::groups::my_groups))
        .route(
            "/groups/switch/{group_id}",
            put(handlers::groups::switch_group),
        )
        .route("/groups/{group_id}", get(handlers::groups::group_detail))
        .route(
            "/groups/{group_id}/leave",
            post(handlers::groups::leave_group),
        )
        // Slots.
        .route(
            "/slots",
            get(handlers::slots::list_slots).post(handlers::slots::create_slot),
        )
        .route(
            "/slots/{id}",
            put(handlers::slots::update_slot).delete(handlers::slots::delete_slot),
        )
        // Swap negotiation.
        .route(
            "/swappable-slots",
            get(handlers::swaps::list_swappable_slots),
        )
        .route("/swap-request", post(handlers::swaps::create_swap_request))
        .route(
            "/swap-response/{request_id}",
            post(handlers::swaps::respond_to_swap_request),
        )
        .route(
            "/swap-requests/incoming",
            get(handlers::swaps::list_incoming_requests),
        )
        .route(
            "/swap-requests/outgoing",
            get(handlers::swaps::list_outgoing_requests),
        )
}
