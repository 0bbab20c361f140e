//! Group creation and membership handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rand::Rng;
use serde::Deserialize;
use slotswap_core::error::CoreError;
use slotswap_core::types::DbId;
use slotswap_db::models::group::{Group, GroupDetail};
use slotswap_db::repositories::{GroupRepo, UserRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserInfo;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinGroupRequest {
    pub code: String,
}

/// Alphabet for join codes. Skips easily confused characters (0/O, 1/I).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 6;
const CODE_ATTEMPTS: usize = 5;

fn generate_join_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// `POST /api/v1/groups`
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateGroupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Group>>)> {
    body.validate()?;

    // Retry until the code is unused; the unique index on `code` is the
    // real guard, this just keeps collisions from surfacing as 409s.
    let mut code = generate_join_code();
    for _ in 0..CODE_ATTEMPTS {
        if GroupRepo::find_by_code(&state.pool, &code).await?.is_none() {
            break;
        }
        code = generate_join_code();
    }

    let group = GroupRepo::create(&state.pool, body.name.trim(), &code, auth.user_id).await?;

    tracing::info!(group_id = group.id, created_by = auth.user_id, "group created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// `POST /api/v1/groups/join`
pub async fn join_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<JoinGroupRequest>,
) -> AppResult<Json<DataResponse<Group>>> {
    let code = body.code.trim().to_uppercase();

    let group = GroupRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound("No group exists with that join code".into()))?;

    GroupRepo::add_member(&state.pool, group.id, auth.user_id).await?;

    tracing::info!(group_id = group.id, user_id = auth.user_id, "user joined group");

    Ok(Json(DataResponse { data: group }))
}

/// `GET /api/v1/groups/my-groups` -- every group the caller belongs to.
pub async fn my_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Group>>>> {
    let groups = GroupRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// `GET /api/v1/groups/{group_id}` -- group detail with members.
pub async fn group_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<DataResponse<GroupDetail>>> {
    let group = load_group_as_member(&state, auth.user_id, group_id).await?;
    let detail = GroupRepo::populate(&state.pool, &group).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// `PUT /api/v1/groups/switch/{group_id}` -- make another of the caller's
/// groups their current one.
pub async fn switch_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserInfo>>> {
    load_group_as_member(&state, auth.user_id, group_id).await?;

    UserRepo::set_current_group(&state.pool, auth.user_id, group_id).await?;

    tracing::info!(group_id, user_id = auth.user_id, "user switched current group");

    current_user_info(&state, auth.user_id).await
}

/// `POST /api/v1/groups/{group_id}/leave`
///
/// The creator may only leave once everyone else has; otherwise the group
/// would be orphaned with members still in it.
pub async fn leave_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserInfo>>> {
    let group = load_group_as_member(&state, auth.user_id, group_id).await?;

    if group.created_by == auth.user_id {
        let members = GroupRepo::member_count(&state.pool, group_id).await?;
        if members > 1 {
            return Err(CoreError::Validation(
                "Cannot leave a group you created while it still has other members".into(),
            )
            .into());
        }
    }

    GroupRepo::remove_member(&state.pool, group_id, auth.user_id).await?;

    tracing::info!(group_id, user_id = auth.user_id, "user left group");

    current_user_info(&state, auth.user_id).await
}

/// Load a group and check the caller is enrolled in it.
async fn load_group_as_member(
    state: &AppState,
    user_id: DbId,
    group_id: DbId,
) -> Result<Group, AppError> {
    let group = GroupRepo::find_by_id(&state.pool, group_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Group",
            id: group_id,
        })?;

    if !GroupRepo::is_member(&state.pool, group_id, user_id).await? {
        return Err(CoreError::Forbidden("You are not a member of this group".into()).into());
    }

    Ok(group)
}

/// Re-read the caller and return their public info (used by the endpoints
/// that change group state, so clients see the new current group).
async fn current_user_info(
    state: &AppState,
    user_id: DbId,
) -> AppResult<Json<DataResponse<UserInfo>>> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    Ok(Json(DataResponse {
        data: UserInfo::from(&user),
    }))
}
