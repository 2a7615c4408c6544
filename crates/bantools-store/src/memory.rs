//! In-memory implementation of BanStore
//!
//! Nothing survives a restart. Used for tests and the `memory` backend.

use async_trait::async_trait;
use bantools_core::traits::{BanStore, RepoResult};
use bantools_core::{name_key, BanRecord, SoftBanRecord};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Volatile implementation of BanStore
#[derive(Default)]
pub struct InMemoryBanStore {
    bans: RwLock<HashMap<String, BanRecord>>,
    soft_bans: RwLock<HashMap<String, SoftBanRecord>>,
}

impl InMemoryBanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BanStore for InMemoryBanStore {
    async fn load_all_bans(&self) -> RepoResult<HashMap<String, BanRecord>> {
        Ok(self.bans.read().clone())
    }

    async fn load_all_soft_bans(&self) -> RepoResult<HashMap<String, SoftBanRecord>> {
        Ok(self.soft_bans.read().clone())
    }

    async fn save_ban(&self, record: &BanRecord) -> RepoResult<()> {
        self.bans.write().insert(name_key(&record.name), record.clone());
        Ok(())
    }

    async fn save_soft_ban(&self, record: &SoftBanRecord) -> RepoResult<()> {
        self.soft_bans
            .write()
            .insert(name_key(&record.name), record.clone());
        Ok(())
    }

    async fn set_ban_active(&self, name: &str, active: bool) -> RepoResult<bool> {
        Ok(self
            .bans
            .write()
            .get_mut(&name_key(name))
            .map(|record| record.active = active)
            .is_some())
    }

    async fn set_soft_ban_active(&self, name: &str, active: bool) -> RepoResult<bool> {
        Ok(self
            .soft_bans
            .write()
            .get_mut(&name_key(name))
            .map(|record| record.active = active)
            .is_some())
    }

    async fn deactivate_expired_soft_bans(&self, now: DateTime<Utc>) -> RepoResult<usize> {
        let mut soft_bans = self.soft_bans.write();
        let mut count = 0;
        for record in soft_bans.values_mut() {
            if record.active && record.expires_at <= now {
                record.active = false;
                count += 1;
            }
        }
        Ok(count)
    }
}
