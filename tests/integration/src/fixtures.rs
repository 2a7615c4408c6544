//! Test fixtures and doubles
//!
//! Provides a session directory that records kicks and a store wrapper that
//! can be told to fail writes.

use async_trait::async_trait;
use bantools_core::{
    name_key, BanRecord, BanStore, DomainError, OnlinePlayer, PlayerIdentity, RepoResult,
    SessionDirectory, SoftBanRecord,
};
use bantools_store::InMemoryBanStore;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A valid player name nobody else in the test run uses
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}{}", unique_suffix())
}

/// Identity as seen on connect
pub fn identity(username: &str, id: &str, address: &str) -> PlayerIdentity {
    PlayerIdentity::new(Some(id), Some(address), username)
}

/// A kick observed by [`RecordingSessions`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kick {
    pub name: String,
    pub message: String,
}

/// Session directory that records every disconnect
#[derive(Default)]
pub struct RecordingSessions {
    online: Mutex<Vec<OnlinePlayer>>,
    kicks: Mutex<Vec<Kick>>,
}

impl RecordingSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, name: &str, id: &str, address: &str) {
        self.online.lock().push(OnlinePlayer {
            name: name.to_string(),
            id: id.to_string(),
            address: address.to_string(),
        });
    }

    pub fn kicks(&self) -> Vec<Kick> {
        self.kicks.lock().clone()
    }

    pub fn is_online(&self, name: &str) -> bool {
        self.find_online(name).is_some()
    }
}

impl SessionDirectory for RecordingSessions {
    fn find_online(&self, name: &str) -> Option<OnlinePlayer> {
        self.online
            .lock()
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn disconnect(&self, name: &str, message: &str) -> usize {
        let mut online = self.online.lock();
        let before = online.len();
        online.retain(|p| !p.name.eq_ignore_ascii_case(name));
        let closed = before - online.len();

        if closed > 0 {
            self.kicks.lock().push(Kick {
                name: name_key(name),
                message: message.to_string(),
            });
        }
        closed
    }

    fn all_online_names(&self) -> Vec<String> {
        self.online.lock().iter().map(|p| p.name.clone()).collect()
    }
}

/// In-memory store whose writes can be switched to fail
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryBanStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryBanStore {
        &self.inner
    }

    fn check(&self) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(DomainError::StorageError("disk full".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BanStore for FlakyStore {
    async fn load_all_bans(&self) -> RepoResult<HashMap<String, BanRecord>> {
        self.inner.load_all_bans().await
    }

    async fn load_all_soft_bans(&self) -> RepoResult<HashMap<String, SoftBanRecord>> {
        self.inner.load_all_soft_bans().await
    }

    async fn save_ban(&self, record: &BanRecord) -> RepoResult<()> {
        self.check()?;
        self.inner.save_ban(record).await
    }

    async fn save_soft_ban(&self, record: &SoftBanRecord) -> RepoResult<()> {
        self.check()?;
        self.inner.save_soft_ban(record).await
    }

    async fn set_ban_active(&self, name: &str, active: bool) -> RepoResult<bool> {
        self.check()?;
        self.inner.set_ban_active(name, active).await
    }

    async fn set_soft_ban_active(&self, name: &str, active: bool) -> RepoResult<bool> {
        self.check()?;
        self.inner.set_soft_ban_active(name, active).await
    }

    async fn deactivate_expired_soft_bans(&self, now: DateTime<Utc>) -> RepoResult<usize> {
        self.check()?;
        self.inner.deactivate_expired_soft_bans(now).await
    }
}
