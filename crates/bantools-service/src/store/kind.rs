//! Per-record-type glue between a `RecordStore` and the persistence port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use bantools_core::traits::{BanStore, RepoResult};
use bantools_core::{BanRecord, DomainError, RestrictionRecord, SoftBanRecord};

/// A record type a `RecordStore` can hold
#[async_trait]
pub trait RecordKind: RestrictionRecord {
    /// Human label for log lines
    const LABEL: &'static str;

    async fn load_all(store: &dyn BanStore) -> RepoResult<HashMap<String, Self>>;

    async fn persist(store: &dyn BanStore, record: &Self) -> RepoResult<()>;

    async fn persist_active(store: &dyn BanStore, name: &str, active: bool) -> RepoResult<bool>;

    /// Rejection for inserting over a record that is still in force
    fn duplicate_error(existing: &Self, now: DateTime<Utc>) -> DomainError;

    /// Rejection for deactivating a name with no active record
    fn not_found_error(name: &str, record_exists: bool) -> DomainError;
}

#[async_trait]
impl RecordKind for BanRecord {
    const LABEL: &'static str = "ban";

    async fn load_all(store: &dyn BanStore) -> RepoResult<HashMap<String, Self>> {
        store.load_all_bans().await
    }

    async fn persist(store: &dyn BanStore, record: &Self) -> RepoResult<()> {
        store.save_ban(record).await
    }

    async fn persist_active(store: &dyn BanStore, name: &str, active: bool) -> RepoResult<bool> {
        store.set_ban_active(name, active).await
    }

    fn duplicate_error(existing: &Self, _now: DateTime<Utc>) -> DomainError {
        DomainError::AlreadyBanned {
            name: existing.name.clone(),
            details: existing.describe(),
        }
    }

    fn not_found_error(name: &str, record_exists: bool) -> DomainError {
        if record_exists {
            DomainError::AlreadyUnbanned(name.to_string())
        } else {
            DomainError::NoBanRecord(name.to_string())
        }
    }
}

#[async_trait]
impl RecordKind for SoftBanRecord {
    const LABEL: &'static str = "soft ban";

    async fn load_all(store: &dyn BanStore) -> RepoResult<HashMap<String, Self>> {
        store.load_all_soft_bans().await
    }

    async fn persist(store: &dyn BanStore, record: &Self) -> RepoResult<()> {
        store.save_soft_ban(record).await
    }

    async fn persist_active(store: &dyn BanStore, name: &str, active: bool) -> RepoResult<bool> {
        store.set_soft_ban_active(name, active).await
    }

    fn duplicate_error(existing: &Self, now: DateTime<Utc>) -> DomainError {
        DomainError::AlreadySoftBanned {
            name: existing.name.clone(),
            remaining: existing.remaining_formatted(now),
        }
    }

    fn not_found_error(name: &str, _record_exists: bool) -> DomainError {
        DomainError::NoActiveSoftBan(name.to_string())
    }
}
