//! Database queries for tier-role configuration.
//!
//! The engine only ever reads (`list_tier_role_ids`); registration and
//! deregistration are invoked by administrative command handlers.

use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use super::action::RoleTier;
use super::models::TierRoleBinding;

/// List the role ids registered under a tier for a community.
///
/// An unconfigured community yields an empty set, not an error.
pub async fn list_tier_role_ids(
    pool: &PgPool,
    community_id: Uuid,
    tier: RoleTier,
) -> sqlx::Result<HashSet<Uuid>> {
    let rows: Vec<Uuid> = sqlx::query_scalar(
        r"
        SELECT role_id
        FROM community_tier_roles
        WHERE community_id = $1
          AND tier = $2
        ",
    )
    .bind(community_id)
    .bind(tier.to_db())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

/// List full tier-role bindings for a community, all tiers.
///
/// Used by administrative listing commands, not by the engine.
pub async fn list_tier_bindings(
    pool: &PgPool,
    community_id: Uuid,
) -> sqlx::Result<Vec<TierRoleBinding>> {
    sqlx::query_as::<_, TierRoleBinding>(
        r"
        SELECT community_id, tier, role_id, added_by, added_at
        FROM community_tier_roles
        WHERE community_id = $1
        ORDER BY tier DESC, added_at ASC
        ",
    )
    .bind(community_id)
    .fetch_all(pool)
    .await
}

/// Register a role under a tier for a community.
///
/// Uses ON CONFLICT DO NOTHING so repeated registration is idempotent.
/// Registering the same role under a second tier is a separate row and
/// is allowed.
pub async fn register_tier_role(
    pool: &PgPool,
    community_id: Uuid,
    tier: RoleTier,
    role_id: Uuid,
    added_by: Option<Uuid>,
) -> sqlx::Result<()> {
    sqlx::query(
        r"
        INSERT INTO community_tier_roles (community_id, tier, role_id, added_by)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (community_id, tier, role_id) DO NOTHING
        ",
    )
    .bind(community_id)
    .bind(tier.to_db())
    .bind(role_id)
    .bind(added_by)
    .execute(pool)
    .await?;

    Ok(())
}

/// Deregister a role from a tier.
///
/// Returns `true` if a binding was removed, `false` if none existed.
pub async fn deregister_tier_role(
    pool: &PgPool,
    community_id: Uuid,
    tier: RoleTier,
    role_id: Uuid,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r"
        DELETE FROM community_tier_roles
        WHERE community_id = $1
          AND tier = $2
          AND role_id = $3
        ",
    )
    .bind(community_id)
    .bind(tier.to_db())
    .bind(role_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
