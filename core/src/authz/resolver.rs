//! Role membership resolution.
//!
//! Answers "does this actor belong to tier T in community C?" without the
//! engine knowing how tier configuration is persisted. The single store
//! call is the only suspension point in the core and is bounded by the
//! configured timeout; expiry reports as a store failure, never a grant.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::action::RoleTier;
use super::cache::MembershipCache;
use super::error::StoreError;
use super::models::Actor;
use super::store::TierRoleStore;
use crate::config::AuthzConfig;

/// Resolves custom tier membership against the configuration store.
pub struct MembershipResolver<S> {
    store: S,
    cache: Option<MembershipCache>,
    store_timeout: Duration,
}

impl<S: TierRoleStore> MembershipResolver<S> {
    /// Create a resolver over `store`, cached or not per `config`.
    #[must_use]
    pub fn new(store: S, config: &AuthzConfig) -> Self {
        Self {
            store,
            cache: config.cache_enabled.then(MembershipCache::new),
            store_timeout: config.store_timeout,
        }
    }

    /// Whether the actor holds any role registered under `tier`.
    ///
    /// An actor with no roles never matches; a tier with no registered
    /// roles matches no one. Neither is an error.
    #[tracing::instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn is_member_of_tier(
        &self,
        community_id: Uuid,
        actor: &Actor,
        tier: RoleTier,
    ) -> Result<bool, StoreError> {
        if actor.role_ids.is_empty() {
            return Ok(false);
        }

        let registered = self.registered_roles(community_id, tier).await?;
        Ok(!registered.is_disjoint(&actor.role_ids))
    }

    /// Drop cached membership sets for a community.
    ///
    /// No-op when the cache is disabled.
    pub fn invalidate(&self, community_id: Uuid) {
        if let Some(cache) = &self.cache {
            cache.invalidate(community_id);
        }
    }

    /// Access the underlying store, e.g. for administrative mutations.
    pub const fn store(&self) -> &S {
        &self.store
    }

    async fn registered_roles(
        &self,
        community_id: Uuid,
        tier: RoleTier,
    ) -> Result<Arc<HashSet<Uuid>>, StoreError> {
        match &self.cache {
            Some(cache) => {
                cache
                    .get_or_load(community_id, tier, || {
                        fetch_bounded(&self.store, community_id, tier, self.store_timeout)
                    })
                    .await
            }
            None => Ok(Arc::new(
                fetch_bounded(&self.store, community_id, tier, self.store_timeout).await?,
            )),
        }
    }
}

/// Query the store with the configured time bound.
async fn fetch_bounded<S: TierRoleStore>(
    store: &S,
    community_id: Uuid,
    tier: RoleTier,
    timeout: Duration,
) -> Result<HashSet<Uuid>, StoreError> {
    match tokio::time::timeout(timeout, store.tier_role_ids(community_id, tier)).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout { timeout }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::authz::native::NativePermissions;
    use crate::authz::store::MemoryTierRoleStore;

    fn uncached_config() -> AuthzConfig {
        AuthzConfig {
            cache_enabled: false,
            ..AuthzConfig::default()
        }
    }

    fn actor_with_roles(roles: &[Uuid]) -> Actor {
        Actor::new(
            Uuid::new_v4(),
            roles.iter().copied(),
            NativePermissions::empty(),
        )
    }

    /// Store that counts queries and delegates to an in-memory store.
    struct CountingStore {
        inner: MemoryTierRoleStore,
        queries: AtomicUsize,
    }

    impl TierRoleStore for CountingStore {
        async fn tier_role_ids(
            &self,
            community_id: Uuid,
            tier: RoleTier,
        ) -> Result<HashSet<Uuid>, StoreError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.tier_role_ids(community_id, tier).await
        }
    }

    /// Store that never answers.
    struct HangingStore;

    impl TierRoleStore for HangingStore {
        async fn tier_role_ids(
            &self,
            _community_id: Uuid,
            _tier: RoleTier,
        ) -> Result<HashSet<Uuid>, StoreError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(HashSet::new())
        }
    }

    #[tokio::test]
    async fn test_intersection_grants_membership() {
        let store = MemoryTierRoleStore::new();
        let community = Uuid::new_v4();
        let role = Uuid::new_v4();
        store.register(community, RoleTier::Moderator, role);

        let resolver = MembershipResolver::new(store, &uncached_config());
        let actor = actor_with_roles(&[Uuid::new_v4(), role]);

        assert!(resolver
            .is_member_of_tier(community, &actor, RoleTier::Moderator)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_disjoint_roles_do_not_grant_membership() {
        let store = MemoryTierRoleStore::new();
        let community = Uuid::new_v4();
        store.register(community, RoleTier::Moderator, Uuid::new_v4());

        let resolver = MembershipResolver::new(store, &uncached_config());
        let actor = actor_with_roles(&[Uuid::new_v4()]);

        assert!(!resolver
            .is_member_of_tier(community, &actor, RoleTier::Moderator)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unconfigured_community_is_not_an_error() {
        let resolver = MembershipResolver::new(MemoryTierRoleStore::new(), &uncached_config());
        let actor = actor_with_roles(&[Uuid::new_v4()]);

        let member = resolver
            .is_member_of_tier(Uuid::new_v4(), &actor, RoleTier::Staff)
            .await
            .unwrap();
        assert!(!member);
    }

    #[tokio::test]
    async fn test_actor_with_no_roles_skips_the_store() {
        let store = CountingStore {
            inner: MemoryTierRoleStore::new(),
            queries: AtomicUsize::new(0),
        };
        let resolver = MembershipResolver::new(store, &uncached_config());
        let actor = actor_with_roles(&[]);

        let member = resolver
            .is_member_of_tier(Uuid::new_v4(), &actor, RoleTier::Staff)
            .await
            .unwrap();

        assert!(!member);
        assert_eq!(resolver.store().queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_serves_repeat_lookups() {
        let store = CountingStore {
            inner: MemoryTierRoleStore::new(),
            queries: AtomicUsize::new(0),
        };
        let community = Uuid::new_v4();
        let role = Uuid::new_v4();
        store.inner.register(community, RoleTier::Staff, role);

        let resolver = MembershipResolver::new(store, &AuthzConfig::default());
        let actor = actor_with_roles(&[role]);

        for _ in 0..5 {
            assert!(resolver
                .is_member_of_tier(community, &actor, RoleTier::Staff)
                .await
                .unwrap());
        }

        assert_eq!(resolver.store().queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_picks_up_deregistration() {
        let store = MemoryTierRoleStore::new();
        let community = Uuid::new_v4();
        let role = Uuid::new_v4();
        store.register(community, RoleTier::Staff, role);

        let resolver = MembershipResolver::new(store, &AuthzConfig::default());
        let actor = actor_with_roles(&[role]);

        assert!(resolver
            .is_member_of_tier(community, &actor, RoleTier::Staff)
            .await
            .unwrap());

        resolver.store().deregister(community, RoleTier::Staff, role);
        resolver.invalidate(community);

        assert!(!resolver
            .is_member_of_tier(community, &actor, RoleTier::Staff)
            .await
            .unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_reports_timeout() {
        let config = AuthzConfig {
            store_timeout: Duration::from_millis(500),
            cache_enabled: false,
        };
        let resolver = MembershipResolver::new(HangingStore, &config);
        let actor = actor_with_roles(&[Uuid::new_v4()]);

        let err = resolver
            .is_member_of_tier(Uuid::new_v4(), &actor, RoleTier::Staff)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Timeout { .. }));
    }
}
