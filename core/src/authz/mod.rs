//! Authorization system types and logic.
//!
//! Four independent permission sources layered into one decision:
//! - Native administrator bit: absolute override
//! - Three custom role tiers (senior moderator, moderator, staff), each
//!   granting a fixed, enumerated action profile
//! - Native permission bits as a terminal fallback

pub mod action;
pub mod cache;
pub mod engine;
pub mod error;
pub mod models;
pub mod native;
pub mod queries;
pub mod resolver;
pub mod store;

pub use action::{ModerationAction, RoleTier};
pub use cache::MembershipCache;
pub use engine::{AuthorizationEngine, Decision, DecisionSource};
pub use error::{AuthorizationError, AuthzResult, StoreError};
pub use models::{Actor, TierRoleBinding};
pub use native::NativePermissions;
pub use queries::*;
pub use resolver::MembershipResolver;
pub use store::{MemoryTierRoleStore, PgTierRoleStore, TierRoleStore};
