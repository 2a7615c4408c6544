//! Persistence port for ban and soft-ban records
//!
//! Implementations own the durable copy and are the source of truth at
//! startup. Maps are keyed by lowercase player name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::entities::{BanRecord, SoftBanRecord};
use crate::error::DomainError;

/// Result type for persistence operations
pub type RepoResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait BanStore: Send + Sync {
    /// All ban records, active or not
    async fn load_all_bans(&self) -> RepoResult<HashMap<String, BanRecord>>;

    /// All soft-ban records, active or not
    async fn load_all_soft_bans(&self) -> RepoResult<HashMap<String, SoftBanRecord>>;

    /// Insert or replace a ban record
    async fn save_ban(&self, record: &BanRecord) -> RepoResult<()>;

    /// Insert or replace a soft-ban record
    async fn save_soft_ban(&self, record: &SoftBanRecord) -> RepoResult<()>;

    /// Flip the active flag; `false` when no record exists
    async fn set_ban_active(&self, name: &str, active: bool) -> RepoResult<bool>;

    /// Flip the active flag; `false` when no record exists
    async fn set_soft_ban_active(&self, name: &str, active: bool) -> RepoResult<bool>;

    /// Mark every active soft ban that ended before `now` inactive
    async fn deactivate_expired_soft_bans(&self, now: DateTime<Utc>) -> RepoResult<usize>;

    /// Re-read the durable copy, picking up external edits
    async fn refresh(&self) -> RepoResult<()> {
        Ok(())
    }
}
