//! Platform-native permission bits.
//!
//! The platform hands the bot a permission bitmask for every actor. The
//! engine only ever asks two questions of it: "is this bit set?" and
//! "is this actor an administrator?". The mask is otherwise opaque.

use bitflags::bitflags;

bitflags! {
    /// Native platform permissions represented as a 64-bit bitfield.
    ///
    /// Stored as BIGINT when persisted, so only the low 63 bits are usable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct NativePermissions: u64 {
        /// Full platform-level control. Overrides every other check.
        const ADMINISTRATOR   = 1 << 0;
        /// Permission to ban and unban members
        const BAN_MEMBERS     = 1 << 1;
        /// Permission to kick members
        const KICK_MEMBERS    = 1 << 2;
        /// Permission to timeout (mute) members
        const TIMEOUT_MEMBERS = 1 << 3;
        /// Permission to delete other members' messages
        const MANAGE_MESSAGES = 1 << 4;
        /// Permission to edit channels (lock, hide)
        const MANAGE_CHANNELS = 1 << 5;
        /// Permission to create, edit, and assign roles
        const MANAGE_ROLES    = 1 << 6;
        /// Permission to move members between voice channels
        const MOVE_MEMBERS    = 1 << 7;
        /// Permission to view the audit log and case history
        const VIEW_AUDIT_LOG  = 1 << 8;
        /// Permission to modify community-wide settings
        const MANAGE_GUILD    = 1 << 9;
    }
}

impl NativePermissions {
    /// Create permissions from a database BIGINT value.
    ///
    /// Unknown bits are silently dropped for forward compatibility.
    #[must_use]
    pub const fn from_db(value: i64) -> Self {
        Self::from_bits_truncate(value as u64)
    }

    /// Convert permissions to a database BIGINT value.
    #[must_use]
    pub const fn to_db(self) -> i64 {
        self.bits() as i64
    }

    /// Check if this permission set includes the specified permission(s).
    #[must_use]
    pub const fn has(self, permission: Self) -> bool {
        self.contains(permission)
    }

    /// Check whether the administrator bit is set.
    ///
    /// Administrators bypass every tier and fallback check.
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        self.contains(Self::ADMINISTRATOR)
    }
}

impl Default for NativePermissions {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<i64> for NativePermissions {
    fn from(value: i64) -> Self {
        Self::from_db(value)
    }
}
