//! HTTP-level tests for group membership management: listing, detail,
//! switching the current group, and leaving.
//!
//! These run against a real Postgres via `DATABASE_URL` and are `#[ignore]`d
//! so the default test run stays database-free:
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test -p slotswap-api -- --ignored
//! ```

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get_auth, post_json_auth, put_auth, token_for};
use slotswap_core::types::DbId;
use slotswap_db::models::user::CreateUser;
use slotswap_db::repositories::{GroupRepo, UserRepo};
use sqlx::PgPool;

async fn create_user(pool: &PgPool, name: &str) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{name}@test.com"),
            password_hash: "unused-in-these-tests".to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    user.id
}

// ---------------------------------------------------------------------------
// Test: my-groups lists every membership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore]
async fn my_groups_lists_every_membership(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    GroupRepo::create(&pool, "First", "AAAA22", alice)
        .await
        .expect("group creation should succeed");
    GroupRepo::create(&pool, "Second", "BBBB33", alice)
        .await
        .expect("group creation should succeed");

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/v1/groups/my-groups", &token_for(alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let groups = json["data"].as_array().expect("data should be an array");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], "First");
    assert_eq!(groups[1]["name"], "Second");
}

// ---------------------------------------------------------------------------
// Test: group detail is members-only
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore]
async fn group_detail_requires_membership(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let mallory = create_user(&pool, "mallory").await;
    let group = GroupRepo::create(&pool, "Private", "CCCC44", alice)
        .await
        .expect("group creation should succeed");

    let uri = format!("/api/v1/groups/{}", group.id);

    let response = get_auth(build_test_app(pool.clone()), &uri, &token_for(mallory)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(build_test_app(pool), &uri, &token_for(alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Private");
    assert_eq!(json["data"]["created_by"]["id"], alice);
    let members = json["data"]["members"]
        .as_array()
        .expect("members should be an array");
    assert_eq!(members.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: switching changes the caller's current group
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore]
async fn switch_changes_current_group(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let first = GroupRepo::create(&pool, "First", "DDDD55", alice)
        .await
        .expect("group creation should succeed");
    let second = GroupRepo::create(&pool, "Second", "EEEE66", alice)
        .await
        .expect("group creation should succeed");

    // Creating "Second" made it current; switch back to "First".
    assert_ne!(first.id, second.id);
    let uri = format!("/api/v1/groups/switch/{}", first.id);
    let response = put_auth(build_test_app(pool), &uri, &token_for(alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["current_group_id"], first.id);
}

// ---------------------------------------------------------------------------
// Test: switching to a group you are not in is forbidden
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore]
async fn switch_to_foreign_group_is_forbidden(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let group = GroupRepo::create(&pool, "Alice's", "FFFF77", alice)
        .await
        .expect("group creation should succeed");

    let uri = format!("/api/v1/groups/switch/{}", group.id);
    let response = put_auth(build_test_app(pool), &uri, &token_for(bob)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: leaving falls back to the oldest remaining membership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore]
async fn leave_falls_back_to_remaining_membership(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;

    let own = GroupRepo::create(&pool, "Alice's", "GGGG88", alice)
        .await
        .expect("group creation should succeed");
    let bobs = GroupRepo::create(&pool, "Bob's", "HHHH99", bob)
        .await
        .expect("group creation should succeed");
    GroupRepo::add_member(&pool, bobs.id, alice)
        .await
        .expect("join should succeed");

    // Joining Bob's group made it current; leaving it falls back to her own.
    let uri = format!("/api/v1/groups/{}/leave", bobs.id);
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &uri,
        &token_for(alice),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["current_group_id"], own.id);

    // Leaving the last group clears the current group entirely.
    let uri = format!("/api/v1/groups/{}/leave", own.id);
    let response = post_json_auth(
        build_test_app(pool),
        &uri,
        &token_for(alice),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["current_group_id"].is_null());
}

// ---------------------------------------------------------------------------
// Test: the creator cannot leave while other members remain
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore]
async fn creator_cannot_leave_with_members_present(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let group = GroupRepo::create(&pool, "Shared", "JJJJ22", alice)
        .await
        .expect("group creation should succeed");
    GroupRepo::add_member(&pool, group.id, bob)
        .await
        .expect("join should succeed");

    let uri = format!("/api/v1/groups/{}/leave", group.id);
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &uri,
        &token_for(alice),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Once Bob is gone the creator may leave.
    GroupRepo::remove_member(&pool, group.id, bob)
        .await
        .expect("member removal should succeed");
    let response = post_json_auth(
        build_test_app(pool),
        &uri,
        &token_for(alice),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
