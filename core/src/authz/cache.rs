//! Read-through cache for tier membership sets.
//!
//! Caches the registered role-id set per (community, tier) using `DashMap`
//! for lock-free concurrent access. The cache is advisory: a stale entry
//! may delay a permission change, but the configuration store remains the
//! source of truth and administrator/native checks never touch the cache.
//!
//! Per-community generation counters prevent a stale in-flight load from
//! overwriting a fresh invalidation (TOCTOU protection) without causing
//! cross-community cache misses.

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use super::action::RoleTier;
use super::error::StoreError;

/// Cached role set paired with the generation it was loaded at.
struct CachedSet {
    roles: Arc<HashSet<Uuid>>,
    _generation: u64,
}

/// Thread-safe cache of per-(community, tier) registered role sets.
pub struct MembershipCache {
    sets: DashMap<(Uuid, RoleTier), CachedSet>,
    /// Per-community generation counters. Incremented on invalidation so
    /// in-flight loads from stale data are discarded on insert.
    generations: DashMap<Uuid, Arc<AtomicU64>>,
}

impl Default for MembershipCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sets: DashMap::new(),
            generations: DashMap::new(),
        }
    }

    /// Get or create the generation counter for a community.
    fn community_generation(&self, community_id: Uuid) -> Arc<AtomicU64> {
        self.generations
            .entry(community_id)
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone()
    }

    /// Get the registered role set for a tier, loading it on a miss.
    ///
    /// A load failure is returned as-is and nothing is cached, so the next
    /// call retries the store.
    pub async fn get_or_load<F, Fut>(
        &self,
        community_id: Uuid,
        tier: RoleTier,
        load: F,
    ) -> Result<Arc<HashSet<Uuid>>, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<HashSet<Uuid>, StoreError>>,
    {
        // Fast path: set already cached
        if let Some(entry) = self.sets.get(&(community_id, tier)) {
            return Ok(Arc::clone(&entry.roles));
        }

        // Capture the community generation before hitting the store
        let generation = self.community_generation(community_id);
        let gen_before = generation.load(Ordering::Acquire);

        let roles = Arc::new(load().await?);

        // Only insert if no invalidation happened for this community since
        // we started loading.
        let gen_after = generation.load(Ordering::Acquire);
        if gen_before == gen_after {
            self.sets.insert(
                (community_id, tier),
                CachedSet {
                    roles: Arc::clone(&roles),
                    _generation: gen_before,
                },
            );
        }

        Ok(roles)
    }

    /// Invalidate every cached tier set for a community.
    ///
    /// Called by administrative handlers after registering or deregistering
    /// a tier role. Increments the community's generation counter so
    /// in-flight loads from stale data will not overwrite the invalidation.
    pub fn invalidate(&self, community_id: Uuid) {
        self.community_generation(community_id)
            .fetch_add(1, Ordering::Release);
        self.sets.retain(|(id, _), _| *id != community_id);
    }
}
