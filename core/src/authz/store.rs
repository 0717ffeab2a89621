//! Tier-role configuration store.
//!
//! The engine depends on one read shape: "which role ids are registered
//! under tier T for community C". `PgTierRoleStore` answers it from
//! PostgreSQL; `MemoryTierRoleStore` keeps everything in-process and backs
//! tests and single-node deployments.

use std::collections::HashSet;

use dashmap::DashMap;
use sqlx::PgPool;
use uuid::Uuid;

use super::action::RoleTier;
use super::error::StoreError;
use super::queries;

/// Read access to per-community tier-role configuration.
#[allow(async_fn_in_trait)]
pub trait TierRoleStore: Send + Sync {
    /// Role ids registered under `tier` for `community_id`.
    ///
    /// An unconfigured community or tier yields an empty set.
    async fn tier_role_ids(
        &self,
        community_id: Uuid,
        tier: RoleTier,
    ) -> Result<HashSet<Uuid>, StoreError>;
}

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgTierRoleStore {
    pool: PgPool,
}

impl PgTierRoleStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TierRoleStore for PgTierRoleStore {
    async fn tier_role_ids(
        &self,
        community_id: Uuid,
        tier: RoleTier,
    ) -> Result<HashSet<Uuid>, StoreError> {
        Ok(queries::list_tier_role_ids(&self.pool, community_id, tier).await?)
    }
}

/// In-memory store keyed by (community, tier).
///
/// Mutations mirror the database entry points: registration is idempotent,
/// deregistration reports whether a binding existed.
#[derive(Debug, Default)]
pub struct MemoryTierRoleStore {
    bindings: DashMap<(Uuid, RoleTier), HashSet<Uuid>>,
}

impl MemoryTierRoleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role under a tier. Returns `true` if it was not already
    /// registered.
    pub fn register(&self, community_id: Uuid, tier: RoleTier, role_id: Uuid) -> bool {
        self.bindings
            .entry((community_id, tier))
            .or_default()
            .insert(role_id)
    }

    /// Deregister a role from a tier. Returns `true` if a binding existed.
    pub fn deregister(&self, community_id: Uuid, tier: RoleTier, role_id: Uuid) -> bool {
        self.bindings
            .get_mut(&(community_id, tier))
            .is_some_and(|mut set| set.remove(&role_id))
    }

    /// Drop every binding for a community, all tiers.
    pub fn clear_community(&self, community_id: Uuid) {
        self.bindings.retain(|(id, _), _| *id != community_id);
    }
}

impl TierRoleStore for MemoryTierRoleStore {
    async fn tier_role_ids(
        &self,
        community_id: Uuid,
        tier: RoleTier,
    ) -> Result<HashSet<Uuid>, StoreError> {
        Ok(self
            .bindings
            .get(&(community_id, tier))
            .map(|set| set.value().clone())
            .unwrap_or_default())
    }
}
