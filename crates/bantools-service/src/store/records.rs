//! Record stores
//!
//! `RecordStore` keeps the active subset of one record type in memory and
//! writes through the persistence port. Every mutation is persisted first
//! and then the index is rebuilt from the port; a failed write leaves the
//! index exactly as it was.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use bantools_core::traits::{BanStore, RepoResult};
use bantools_core::{name_key, BanRecord, PlayerIdentity, SoftBanRecord};

use super::index::ActiveIndex;
use super::kind::RecordKind;
use super::matcher::{find_match, MatchKind};

/// Active bans
pub type BanRecordStore = RecordStore<BanRecord>;
/// Active soft bans
pub type SoftBanRecordStore = RecordStore<SoftBanRecord>;

/// Store of one record type
pub struct RecordStore<R: RecordKind> {
    persistence: Arc<dyn BanStore>,
    index: ActiveIndex<R>,
    /// Serializes write-then-reload sequences
    write_lock: Mutex<()>,
}

impl<R: RecordKind> RecordStore<R> {
    /// Create an empty store; call `load_active` before use
    pub fn new(persistence: Arc<dyn BanStore>) -> Self {
        Self {
            persistence,
            index: ActiveIndex::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Rebuild the active index from persistence
    ///
    /// Returns the number of records in force at `now`.
    pub async fn load_active(&self, now: DateTime<Utc>) -> RepoResult<usize> {
        let _guard = self.write_lock.lock().await;
        self.rebuild(now).await
    }

    /// `load_active` at the current time
    pub async fn reload(&self) -> RepoResult<usize> {
        self.load_active(Utc::now()).await
    }

    async fn rebuild(&self, now: DateTime<Utc>) -> RepoResult<usize> {
        let active: HashMap<String, R> = R::load_all(self.persistence.as_ref())
            .await?
            .into_values()
            .filter(|record| record.is_in_force_at(now))
            .map(|record| (record.key(), record))
            .collect();

        let count = active.len();
        self.index.replace(active);
        debug!(kind = R::LABEL, count, "Active index rebuilt");
        Ok(count)
    }

    /// Persist a new record
    ///
    /// # Errors
    /// The kind's duplicate error when a record for the same name is still in
    /// force; `StorageError` when the write fails.
    #[instrument(skip(self, record), fields(kind = R::LABEL, player = %record.name()))]
    pub async fn insert(&self, record: R, now: DateTime<Utc>) -> RepoResult<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(existing) = self.find_active(record.name(), now) {
            return Err(R::duplicate_error(&existing, now));
        }

        R::persist(self.persistence.as_ref(), &record).await?;
        self.rebuild(now).await?;
        Ok(())
    }

    /// Mark the active record for `name` inactive and return it
    ///
    /// # Errors
    /// The kind's not-found error when nothing is in force for `name`.
    #[instrument(skip(self), fields(kind = R::LABEL))]
    pub async fn set_inactive(&self, name: &str, now: DateTime<Utc>) -> RepoResult<R> {
        let _guard = self.write_lock.lock().await;

        let Some(mut record) = self.find_active(name, now) else {
            let exists = self.find_by_name(name).await?.is_some();
            return Err(R::not_found_error(name, exists));
        };

        if !R::persist_active(self.persistence.as_ref(), name, false).await? {
            return Err(R::not_found_error(name, false));
        }
        self.rebuild(now).await?;

        record.set_active(false);
        Ok(record)
    }

    /// Fill in unknown id/address on the stored record for `name`
    ///
    /// Returns `true` when something was learned and written.
    #[instrument(skip(self, identity), fields(kind = R::LABEL))]
    pub async fn update_identity(&self, name: &str, identity: &PlayerIdentity) -> RepoResult<bool> {
        let _guard = self.write_lock.lock().await;

        let Some(mut record) = self.find_by_name(name).await? else {
            return Ok(false);
        };
        if !record.learn_identity(identity) {
            return Ok(false);
        }

        R::persist(self.persistence.as_ref(), &record).await?;
        self.rebuild(Utc::now()).await?;

        info!(
            kind = R::LABEL,
            player = %record.name(),
            id = ?record.id(),
            address = ?record.address(),
            "Learned identity for offline record"
        );
        Ok(true)
    }

    /// Stored record for `name`, active or not
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<R>> {
        let mut all = R::load_all(self.persistence.as_ref()).await?;
        Ok(all.remove(&name_key(name)))
    }

    /// Record for `name` that is in force at `now`
    pub fn find_active(&self, name: &str, now: DateTime<Utc>) -> Option<R> {
        self.index
            .get(name)
            .filter(|record| record.is_in_force_at(now))
    }

    /// Stored record for `name` that is no longer active
    pub async fn find_inactive(&self, name: &str) -> RepoResult<Option<R>> {
        Ok(self
            .find_by_name(name)
            .await?
            .filter(|record| !record.is_active()))
    }

    /// The record in force that applies to `identity`, if any
    pub fn find_match(&self, identity: &PlayerIdentity, now: DateTime<Utc>) -> Option<(R, MatchKind)> {
        let snapshot = self.index.snapshot();
        find_match(snapshot.values(), identity, now).map(|(record, kind)| (record.clone(), kind))
    }

    /// Names of records in force at `now`, sorted case-insensitively
    pub fn list_active(&self, now: DateTime<Utc>) -> Vec<String> {
        let snapshot = self.index.snapshot();
        let mut names: Vec<String> = snapshot
            .values()
            .filter(|record| record.is_in_force_at(now))
            .map(|record| record.name().to_string())
            .collect();
        names.sort_by_key(|name| name_key(name));
        names
    }

    pub fn active_count(&self) -> usize {
        self.index.len()
    }

    pub fn persistence(&self) -> &Arc<dyn BanStore> {
        &self.persistence
    }
}

impl RecordStore<SoftBanRecord> {
    /// Deactivate soft bans that ended before `now`, then rebuild the index
    pub async fn retire_expired(&self, now: DateTime<Utc>) -> RepoResult<usize> {
        let _guard = self.write_lock.lock().await;
        let retired = self.persistence.deactivate_expired_soft_bans(now).await?;
        self.rebuild(now).await?;
        Ok(retired)
    }
}
