//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
///
/// The Display text is the message shown to the administrator.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Target Validation
    // =========================================================================
    #[error("Player name cannot be empty")]
    EmptyTarget,

    #[error("Invalid player name format: {0}")]
    InvalidTarget(String),

    #[error("{0}")]
    ProtectedTarget(String),

    // =========================================================================
    // Duplicate Active Records
    // =========================================================================
    #[error("Player {name} is already banned! {details}")]
    AlreadyBanned { name: String, details: String },

    #[error("Player {name} is already temporarily banned! Remaining time: {remaining}")]
    AlreadySoftBanned { name: String, remaining: String },

    // =========================================================================
    // Not Found
    // =========================================================================
    #[error("Player {0} has no ban record!")]
    NoBanRecord(String),

    #[error("Player {0} is not banned or already unbanned!")]
    AlreadyUnbanned(String),

    #[error("Player {0} does not have an active temporary ban record!")]
    NoActiveSoftBan(String),

    // =========================================================================
    // Persistence
    // =========================================================================
    #[error("Ban storage corrupted: {0}")]
    PersistenceCorrupted(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Stable error code for logs and command replies
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTarget => "EMPTY_TARGET",
            Self::InvalidTarget(_) => "INVALID_TARGET",
            Self::ProtectedTarget(_) => "PROTECTED_TARGET",
            Self::AlreadyBanned { .. } => "ALREADY_BANNED",
            Self::AlreadySoftBanned { .. } => "ALREADY_SOFT_BANNED",
            Self::NoBanRecord(_) => "NO_BAN_RECORD",
            Self::AlreadyUnbanned(_) => "ALREADY_UNBANNED",
            Self::NoActiveSoftBan(_) => "NO_ACTIVE_SOFT_BAN",
            Self::PersistenceCorrupted(_) => "PERSISTENCE_CORRUPTED",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Name failed format constraints
    pub fn is_invalid_target(&self) -> bool {
        matches!(self, Self::EmptyTarget | Self::InvalidTarget(_))
    }

    /// Target is protected by the whitelist
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::ProtectedTarget(_))
    }

    /// An active record already exists
    pub fn is_duplicate_active(&self) -> bool {
        matches!(self, Self::AlreadyBanned { .. } | Self::AlreadySoftBanned { .. })
    }

    /// No active record exists for the target
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoBanRecord(_) | Self::AlreadyUnbanned(_) | Self::NoActiveSoftBan(_)
        )
    }

    /// Failure of the persistence layer rather than of the request
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::PersistenceCorrupted(_) | Self::StorageError(_))
    }

    /// Rejections the administrator can act on
    pub fn is_rejection(&self) -> bool {
        self.is_invalid_target()
            || self.is_protected()
            || self.is_duplicate_active()
            || self.is_not_found()
    }
}
