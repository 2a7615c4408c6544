//! # bantools-core
//!
//! Domain layer containing restriction records, value objects, and the
//! collaborator traits the engine depends on. This crate has no I/O.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{BanRecord, PendingConfirmation, PendingKey, RestrictionRecord, SoftBanRecord};
pub use error::DomainError;
pub use traits::{
    BanStore, NoProtection, OnlinePlayer, ProtectionPolicy, RepoResult, SessionDirectory,
};
pub use value_objects::{
    format_instant, format_remaining, name_key, parse_ban_duration, BanDuration,
    DurationFallback, ParsedDuration, PlayerIdentity, PlayerName,
};
