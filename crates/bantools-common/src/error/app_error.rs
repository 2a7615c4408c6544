//! Application error types
//!
//! Unified error handling for the process: startup, storage, and domain
//! failures all end up here before they reach the console or exit code.

use crate::config::ConfigError;
use bantools_core::DomainError;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Get error code for log lines and console replies
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Process exit code (sysexits.h values where one fits)
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            // EX_CONFIG
            Self::Config(_) => 78,
            // EX_IOERR
            Self::Storage(_) | Self::Io(_) => 74,
            Self::Domain(e) if e.is_persistence() => 74,
            Self::Domain(_) | Self::Internal(_) => 1,
        }
    }

    /// Check if an administrator caused this (bad target, duplicate, missing record)
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_rejection())
    }

    /// Create a storage error
    #[must_use]
    pub fn storage(msg: impl fmt::Display) -> Self {
        Self::Storage(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
