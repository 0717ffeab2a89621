//! Warden Core
//!
//! Authorization resolution engine for the Warden moderation bot. Decides,
//! for a given actor and requested moderation action inside a community,
//! whether the action is permitted. Command transport, embed rendering, and
//! the moderation side effects themselves live in the bot layer above.

pub mod authz;
pub mod config;
