//! Moderation actions and custom role tiers.
//!
//! Three custom tiers sit on top of the platform's native permission bits,
//! ordered `Staff < Moderator < SeniorModerator`. Each action declares the
//! most junior tier allowed to perform it; a tier's full permission profile
//! is derived from that single table, so the "every tier grants at least
//! what the tier below it grants" guarantee holds by construction.
//!
//! Actions with no minimum tier are reachable only through a native
//! permission fallback, if they declare one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::AuthorizationError;
use super::native::NativePermissions;

/// Custom role tier, ordered by seniority (derived `Ord`: `Staff` lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
    /// Junior helpers: warnings, timeouts, and read-only lookups.
    Staff,
    /// Full moderators: bans, kicks, channel state, case management.
    Moderator,
    /// Senior moderators: everything, plus role and filter administration.
    SeniorModerator,
}

impl RoleTier {
    /// All tiers, most senior first. Authorization walks tiers in this order.
    pub const PRECEDENCE: [Self; 3] = [Self::SeniorModerator, Self::Moderator, Self::Staff];

    /// Human-readable tier name for embeds and reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Staff => "Staff",
            Self::Moderator => "Moderator",
            Self::SeniorModerator => "Senior Moderator",
        }
    }

    /// Whether this tier's permission profile includes `action`.
    ///
    /// This is a static table lookup; it says nothing about whether a
    /// particular actor belongs to the tier.
    #[must_use]
    pub fn grants(self, action: ModerationAction) -> bool {
        action.minimum_tier().is_some_and(|tier| self >= tier)
    }

    /// The full set of actions this tier's members may perform.
    #[must_use]
    pub fn profile(self) -> Vec<ModerationAction> {
        ModerationAction::ALL
            .into_iter()
            .filter(|action| self.grants(*action))
            .collect()
    }

    /// Convert to the SMALLINT representation used in PostgreSQL.
    #[must_use]
    pub const fn to_db(self) -> i16 {
        match self {
            Self::Staff => 0,
            Self::Moderator => 1,
            Self::SeniorModerator => 2,
        }
    }
}

impl TryFrom<i16> for RoleTier {
    type Error = AuthorizationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Staff),
            1 => Ok(Self::Moderator),
            2 => Ok(Self::SeniorModerator),
            other => Err(AuthorizationError::UnknownTier(other)),
        }
    }
}

impl fmt::Display for RoleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A privileged operation the bot can be asked to perform.
///
/// Closed enumeration; the command layer is expected to map its command
/// tags onto these before calling into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModerationAction {
    Ban,
    Kick,
    Mute,
    Unmute,
    Warn,
    Unban,
    Purge,
    Lock,
    Unlock,
    Hide,
    Unhide,
    Move,
    Reason,
    ViewLogs,
    IdentifyUser,
    ViewAvatar,
    ViewCase,
    DeleteCase,
    ManageBannedWords,
    CheckBotPermissions,
    DirectMessage,
    ViewLeaderboard,
    ViewStats,
    ManageRoles,
    ListRoleMembers,
    ManageSuggestions,
    ActOnSuggestion,
}

impl ModerationAction {
    /// Every action, in declaration order.
    pub const ALL: [Self; 27] = [
        Self::Ban,
        Self::Kick,
        Self::Mute,
        Self::Unmute,
        Self::Warn,
        Self::Unban,
        Self::Purge,
        Self::Lock,
        Self::Unlock,
        Self::Hide,
        Self::Unhide,
        Self::Move,
        Self::Reason,
        Self::ViewLogs,
        Self::IdentifyUser,
        Self::ViewAvatar,
        Self::ViewCase,
        Self::DeleteCase,
        Self::ManageBannedWords,
        Self::CheckBotPermissions,
        Self::DirectMessage,
        Self::ViewLeaderboard,
        Self::ViewStats,
        Self::ManageRoles,
        Self::ListRoleMembers,
        Self::ManageSuggestions,
        Self::ActOnSuggestion,
    ];

    /// The most junior tier whose profile includes this action, or `None`
    /// if no tier grants it (native fallback only).
    #[must_use]
    pub const fn minimum_tier(self) -> Option<RoleTier> {
        match self {
            // Staff: warnings, timeouts, and read-only lookups
            Self::Mute
            | Self::Unmute
            | Self::Warn
            | Self::Reason
            | Self::ViewLogs
            | Self::IdentifyUser
            | Self::ViewAvatar
            | Self::ViewCase
            | Self::CheckBotPermissions
            | Self::ViewLeaderboard
            | Self::ViewStats
            | Self::ListRoleMembers => Some(RoleTier::Staff),

            // Moderator: membership and channel state changes, case edits
            Self::Ban
            | Self::Kick
            | Self::Unban
            | Self::Purge
            | Self::Lock
            | Self::Unlock
            | Self::Hide
            | Self::Unhide
            | Self::Move
            | Self::DeleteCase
            | Self::DirectMessage
            | Self::ManageSuggestions
            | Self::ActOnSuggestion => Some(RoleTier::Moderator),

            // Senior moderator only
            Self::ManageRoles | Self::ManageBannedWords => Some(RoleTier::SeniorModerator),
        }
    }

    /// The native permission flag that grants this action when no custom
    /// tier does. Actions without a mapping are tier-gated only.
    #[must_use]
    pub const fn native_fallback(self) -> Option<NativePermissions> {
        match self {
            Self::Ban | Self::Unban => Some(NativePermissions::BAN_MEMBERS),
            Self::Kick => Some(NativePermissions::KICK_MEMBERS),
            Self::Mute | Self::Unmute | Self::Warn => Some(NativePermissions::TIMEOUT_MEMBERS),
            Self::Purge => Some(NativePermissions::MANAGE_MESSAGES),
            Self::Lock | Self::Unlock | Self::Hide | Self::Unhide => {
                Some(NativePermissions::MANAGE_CHANNELS)
            }
            Self::Move => Some(NativePermissions::MOVE_MEMBERS),
            Self::Reason | Self::ViewLogs | Self::ViewCase => {
                Some(NativePermissions::VIEW_AUDIT_LOG)
            }
            Self::DeleteCase | Self::ManageBannedWords => Some(NativePermissions::MANAGE_GUILD),
            Self::ManageRoles | Self::ListRoleMembers => Some(NativePermissions::MANAGE_ROLES),
            Self::IdentifyUser
            | Self::ViewAvatar
            | Self::CheckBotPermissions
            | Self::DirectMessage
            | Self::ViewLeaderboard
            | Self::ViewStats
            | Self::ManageSuggestions
            | Self::ActOnSuggestion => None,
        }
    }

    /// Kebab-case command tag, matching the wire form used by the bot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Kick => "kick",
            Self::Mute => "mute",
            Self::Unmute => "unmute",
            Self::Warn => "warn",
            Self::Unban => "unban",
            Self::Purge => "purge",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::Hide => "hide",
            Self::Unhide => "unhide",
            Self::Move => "move",
            Self::Reason => "reason",
            Self::ViewLogs => "view-logs",
            Self::IdentifyUser => "identify-user",
            Self::ViewAvatar => "view-avatar",
            Self::ViewCase => "view-case",
            Self::DeleteCase => "delete-case",
            Self::ManageBannedWords => "manage-banned-words",
            Self::CheckBotPermissions => "check-bot-permissions",
            Self::DirectMessage => "direct-message",
            Self::ViewLeaderboard => "view-leaderboard",
            Self::ViewStats => "view-stats",
            Self::ManageRoles => "manage-roles",
            Self::ListRoleMembers => "list-role-members",
            Self::ManageSuggestions => "manage-suggestions",
            Self::ActOnSuggestion => "act-on-suggestion",
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationAction {
    type Err = AuthorizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| AuthorizationError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(RoleTier::SeniorModerator > RoleTier::Moderator);
        assert!(RoleTier::Moderator > RoleTier::Staff);
    }

    #[test]
    fn test_precedence_is_senior_first() {
        assert_eq!(
            RoleTier::PRECEDENCE,
            [
                RoleTier::SeniorModerator,
                RoleTier::Moderator,
                RoleTier::Staff
            ]
        );
    }

    #[test]
    fn test_staff_profile_is_subset_of_moderator() {
        let staff: HashSet<_> = RoleTier::Staff.profile().into_iter().collect();
        let moderator: HashSet<_> = RoleTier::Moderator.profile().into_iter().collect();

        assert!(staff.is_subset(&moderator));
        assert!(staff.len() < moderator.len());
    }

    #[test]
    fn test_moderator_profile_is_subset_of_senior_moderator() {
        let moderator: HashSet<_> = RoleTier::Moderator.profile().into_iter().collect();
        let senior: HashSet<_> = RoleTier::SeniorModerator.profile().into_iter().collect();

        assert!(moderator.is_subset(&senior));
        assert!(moderator.len() < senior.len());
    }

    #[test]
    fn test_every_tiered_action_appears_in_all_senior_profiles() {
        for action in ModerationAction::ALL {
            let Some(minimum) = action.minimum_tier() else {
                continue;
            };
            for tier in RoleTier::PRECEDENCE {
                assert_eq!(
                    tier.grants(action),
                    tier >= minimum,
                    "{action} should be granted by every tier at or above {minimum:?}"
                );
            }
        }
    }

    #[test]
    fn test_ban_requires_moderator() {
        assert!(RoleTier::SeniorModerator.grants(ModerationAction::Ban));
        assert!(RoleTier::Moderator.grants(ModerationAction::Ban));
        assert!(!RoleTier::Staff.grants(ModerationAction::Ban));
    }

    #[test]
    fn test_manage_roles_is_senior_moderator_exclusive() {
        assert!(RoleTier::SeniorModerator.grants(ModerationAction::ManageRoles));
        assert!(!RoleTier::Moderator.grants(ModerationAction::ManageRoles));
        assert!(!RoleTier::Staff.grants(ModerationAction::ManageRoles));
    }

    #[test]
    fn test_staff_can_warn_and_look_up() {
        assert!(RoleTier::Staff.grants(ModerationAction::Warn));
        assert!(RoleTier::Staff.grants(ModerationAction::Mute));
        assert!(RoleTier::Staff.grants(ModerationAction::ViewCase));
        assert!(!RoleTier::Staff.grants(ModerationAction::Purge));
    }

    #[test]
    fn test_native_fallback_spot_checks() {
        assert_eq!(
            ModerationAction::Ban.native_fallback(),
            Some(NativePermissions::BAN_MEMBERS)
        );
        assert_eq!(
            ModerationAction::Lock.native_fallback(),
            Some(NativePermissions::MANAGE_CHANNELS)
        );
        assert_eq!(ModerationAction::DirectMessage.native_fallback(), None);
        assert_eq!(ModerationAction::ViewLeaderboard.native_fallback(), None);
    }

    #[test]
    fn test_every_action_is_reachable() {
        // No action may be both tierless and without a native fallback;
        // that would make it impossible to authorize for anyone but admins.
        for action in ModerationAction::ALL {
            assert!(
                action.minimum_tier().is_some() || action.native_fallback().is_some(),
                "{action} is unreachable for non-administrators"
            );
        }
    }

    #[test]
    fn test_command_tag_roundtrip() {
        for action in ModerationAction::ALL {
            let parsed: ModerationAction = action.as_str().parse().unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn test_unknown_command_tag_is_rejected() {
        let err = "self-destruct".parse::<ModerationAction>().unwrap_err();
        assert!(matches!(err, AuthorizationError::UnknownAction(_)));
        assert!(err.to_string().contains("self-destruct"));
    }

    #[test]
    fn test_serde_uses_kebab_case_tags() {
        let json = serde_json::to_string(&ModerationAction::ManageBannedWords).unwrap();
        assert_eq!(json, "\"manage-banned-words\"");

        let parsed: ModerationAction = serde_json::from_str("\"view-logs\"").unwrap();
        assert_eq!(parsed, ModerationAction::ViewLogs);
    }

    #[test]
    fn test_tier_db_roundtrip() {
        for tier in RoleTier::PRECEDENCE {
            assert_eq!(RoleTier::try_from(tier.to_db()).unwrap(), tier);
        }
    }

    #[test]
    fn test_unknown_tier_value_is_rejected() {
        let err = RoleTier::try_from(7_i16).unwrap_err();
        assert!(matches!(err, AuthorizationError::UnknownTier(7)));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RoleTier::SeniorModerator.to_string(), "Senior Moderator");
        assert_eq!(ModerationAction::ActOnSuggestion.to_string(), "act-on-suggestion");
    }
}
