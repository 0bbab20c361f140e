//! Repository for the `groups` and `group_members` tables.

use slotswap_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::{Group, GroupDetail};
use crate::models::user::PartyInfo;
use crate::repositories::UserRepo;

/// Column list for `groups` queries.
const COLUMNS: &str = "id, name, code, created_by, created_at, updated_at";

/// Provides operations for groups and group membership.
pub struct GroupRepo;

impl GroupRepo {
    /// Create a group and enroll its creator in one transaction.
    ///
    /// The creator becomes a member and the group becomes their current
    /// group, so they can post and browse slots immediately.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        code: &str,
        created_by: DbId,
    ) -> Result<Group, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO groups (name, code, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let group = sqlx::query_as::<_, Group>(&query)
            .bind(name)
            .bind(code)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
            .bind(group.id)
            .bind(created_by)
            .execute(&mut *tx)
            .await?;

        UserRepo::set_current_group(&mut *tx, created_by, group.id).await?;

        tx.commit().await?;
        Ok(group)
    }

    /// Find a group by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a group by its join code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE code = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// All groups the user is enrolled in, oldest membership first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "SELECT g.id, g.name, g.code, g.created_by, g.created_at, g.updated_at
             FROM groups g
             JOIN group_members gm ON gm.group_id = g.id
             WHERE gm.user_id = $1
             ORDER BY gm.joined_at ASC, g.id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Public identities of a group's members, oldest membership first.
    pub async fn members(pool: &PgPool, group_id: DbId) -> Result<Vec<PartyInfo>, sqlx::Error> {
        sqlx::query_as::<_, PartyInfo>(
            "SELECT u.id, u.name, u.email
             FROM users u
             JOIN group_members gm ON gm.user_id = u.id
             WHERE gm.group_id = $1
             ORDER BY gm.joined_at ASC, u.id ASC",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    /// Number of users enrolled in the group.
    pub async fn member_count(pool: &PgPool, group_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM group_members WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(pool)
            .await
    }

    /// Populate a group with its creator and member identities.
    pub async fn populate(pool: &PgPool, group: &Group) -> Result<GroupDetail, sqlx::Error> {
        let created_by = UserRepo::party_info(pool, group.created_by).await?;
        let members = Self::members(pool, group.id).await?;

        Ok(GroupDetail {
            id: group.id,
            name: group.name.clone(),
            code: group.code.clone(),
            created_by,
            members,
            created_at: group.created_at,
            updated_at: group.updated_at,
        })
    }

    /// Enroll a user in a group and make it their current group.
    ///
    /// Joining a group the user already belongs to is a no-op apart from
    /// switching their current group.
    pub async fn add_member(pool: &PgPool, group_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO group_members (group_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (group_id, user_id) DO NOTHING",
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        UserRepo::set_current_group(&mut *tx, user_id, group_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Remove a user from a group.
    ///
    /// If the group was the user's current group, their current group falls
    /// back to their oldest remaining membership, or to none at all. Runs in
    /// one transaction so the membership row and the fallback stay in step.
    pub async fn remove_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        // Runs after the delete, so the departed group cannot be re-picked.
        sqlx::query(
            "UPDATE users SET
                current_group_id = (
                    SELECT gm.group_id FROM group_members gm
                    WHERE gm.user_id = $1
                    ORDER BY gm.joined_at ASC, gm.group_id ASC
                    LIMIT 1
                ),
                updated_at = now()
             WHERE id = $1 AND current_group_id = $2",
        )
        .bind(user_id)
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Whether the user is enrolled in the group.
    pub async fn is_member(
        pool: &PgPool,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM group_members WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }
}
