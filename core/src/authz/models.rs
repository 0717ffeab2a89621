//! Data types crossing the engine's boundary.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::RoleTier;
use super::native::NativePermissions;

/// The entity requesting an action.
///
/// Built by the platform-integration layer from the incoming event payload.
/// Native permissions and role ids are always taken fresh from here, never
/// from any cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Platform user id.
    pub user_id: Uuid,

    /// Role ids currently held by the actor. Order is irrelevant.
    pub role_ids: HashSet<Uuid>,

    /// Native platform permission bitmask.
    pub native_permissions: NativePermissions,
}

impl Actor {
    /// Create an actor descriptor.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        role_ids: impl IntoIterator<Item = Uuid>,
        native_permissions: NativePermissions,
    ) -> Self {
        Self {
            user_id,
            role_ids: role_ids.into_iter().collect(),
            native_permissions,
        }
    }

    /// Whether the platform marks this actor as an administrator.
    #[must_use]
    pub const fn is_administrator(&self) -> bool {
        self.native_permissions.is_administrator()
    }

    /// Whether the actor holds the given native permission flag.
    #[must_use]
    pub const fn has_native(&self, flag: NativePermissions) -> bool {
        self.native_permissions.has(flag)
    }
}

/// A role id registered under a tier for a community.
///
/// One row per (community, tier, role) triple; the same role may be
/// registered under more than one tier.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TierRoleBinding {
    pub community_id: Uuid,
    #[sqlx(try_from = "i16")]
    pub tier: RoleTier,
    pub role_id: Uuid,
    pub added_by: Option<Uuid>,
    pub added_at: DateTime<Utc>,
}
