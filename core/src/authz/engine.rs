//! Action authorization engine.
//!
//! The single decision point for "may this actor perform this action in
//! this community?". Precedence, strictly in order:
//!
//! 1. Native administrator bit: absolute allow.
//! 2. Custom tiers, most senior first. Membership is only looked up for
//!    tiers whose static profile contains the action; the first matching
//!    tier allows.
//! 3. Native permission fallback, if the action maps to a flag.
//! 4. Deny.
//!
//! A store failure while checking a tier counts as "could not confirm",
//! never as a grant; the walk continues and the degraded condition is
//! logged once per call and reflected on the returned decision.

use uuid::Uuid;

use super::action::{ModerationAction, RoleTier};
use super::error::{AuthorizationError, AuthzResult, StoreError};
use super::models::Actor;
use super::native::NativePermissions;
use super::resolver::MembershipResolver;
use super::store::TierRoleStore;
use crate::config::AuthzConfig;

/// Which precedence step produced an allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    /// Actor carries the native administrator bit.
    Administrator,
    /// Actor belongs to a custom tier whose profile contains the action.
    Tier(RoleTier),
    /// No tier granted; the actor holds the action's native fallback flag.
    NativeFallback(NativePermissions),
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the action is permitted.
    pub allowed: bool,
    /// The step that granted, `None` on a deny.
    pub source: Option<DecisionSource>,
    /// True when at least one tier-membership lookup failed during the
    /// walk. A degraded deny means "could not confirm", not "confirmed
    /// lacking"; callers should word the response accordingly.
    pub degraded: bool,
}

impl Decision {
    const fn allow(source: DecisionSource) -> Self {
        Self {
            allowed: true,
            source: Some(source),
            degraded: false,
        }
    }

    const fn deny() -> Self {
        Self {
            allowed: false,
            source: None,
            degraded: false,
        }
    }

    /// Whether the action is permitted.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        self.allowed
    }
}

/// The authorization engine.
///
/// Cheap to share behind an `Arc`; concurrent calls for different actors
/// and communities are fully independent.
pub struct AuthorizationEngine<S> {
    resolver: MembershipResolver<S>,
}

impl<S: TierRoleStore> AuthorizationEngine<S> {
    /// Build an engine over `store` with the given configuration.
    #[must_use]
    pub fn new(store: S, config: &AuthzConfig) -> Self {
        Self {
            resolver: MembershipResolver::new(store, config),
        }
    }

    /// Decide whether `actor` may perform `action` in `community_id`.
    ///
    /// Only structurally invalid input errors; every runtime condition,
    /// including an unreachable configuration store, resolves to a
    /// decision.
    #[tracing::instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn authorize(
        &self,
        community_id: Uuid,
        actor: &Actor,
        action: ModerationAction,
    ) -> AuthzResult<Decision> {
        if community_id.is_nil() {
            return Err(AuthorizationError::InvalidCommunityId);
        }

        // Administrator short-circuits everything; read fresh from the
        // actor, never from any cache.
        if actor.is_administrator() {
            return Ok(Decision::allow(DecisionSource::Administrator));
        }

        let mut failed_tiers: Vec<RoleTier> = Vec::new();
        let mut last_error: Option<StoreError> = None;
        let mut decision = Decision::deny();

        for tier in RoleTier::PRECEDENCE {
            // Skip the (potentially failing) membership lookup when the
            // static profile already rules the tier out.
            if !tier.grants(action) {
                continue;
            }

            match self
                .resolver
                .is_member_of_tier(community_id, actor, tier)
                .await
            {
                Ok(true) => {
                    decision = Decision::allow(DecisionSource::Tier(tier));
                    break;
                }
                Ok(false) => {}
                Err(err) => {
                    failed_tiers.push(tier);
                    last_error = Some(err);
                }
            }
        }

        // Terminal fallback: only reached when no tier granted.
        if !decision.allowed {
            if let Some(flag) = action.native_fallback() {
                if actor.has_native(flag) {
                    decision = Decision::allow(DecisionSource::NativeFallback(flag));
                }
            }
        }

        if let Some(error) = last_error {
            decision.degraded = true;
            tracing::warn!(
                %community_id,
                %action,
                ?failed_tiers,
                %error,
                "tier membership could not be verified; treated as non-grant"
            );
        }

        Ok(decision)
    }

    /// The most senior tier the actor belongs to, if any.
    ///
    /// Display and reporting only; authorization always re-runs the full
    /// precedence walk per action.
    #[tracing::instrument(skip(self, actor), fields(user_id = %actor.user_id))]
    pub async fn highest_tier(
        &self,
        community_id: Uuid,
        actor: &Actor,
    ) -> AuthzResult<Option<RoleTier>> {
        if community_id.is_nil() {
            return Err(AuthorizationError::InvalidCommunityId);
        }

        let mut last_error: Option<StoreError> = None;

        for tier in RoleTier::PRECEDENCE {
            match self
                .resolver
                .is_member_of_tier(community_id, actor, tier)
                .await
            {
                Ok(true) => return Ok(Some(tier)),
                Ok(false) => {}
                Err(err) => last_error = Some(err),
            }
        }

        if let Some(error) = last_error {
            tracing::warn!(
                %community_id,
                %error,
                "tier membership could not be verified while resolving highest tier"
            );
        }

        Ok(None)
    }

    /// Drop cached membership for a community after a configuration change.
    pub fn invalidate(&self, community_id: Uuid) {
        self.resolver.invalidate(community_id);
    }

    /// The resolver backing this engine.
    pub const fn resolver(&self) -> &MembershipResolver<S> {
        &self.resolver
    }
}
