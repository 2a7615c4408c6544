//! Test helpers for integration tests
//!
//! Builds a loaded `BanEngine` over test doubles.

use std::sync::Arc;

use bantools_common::{AppConfig, WhitelistConfig};
use bantools_core::{BanStore, ProtectionPolicy, SessionDirectory};
use bantools_service::{BanEngine, BanEngineBuilder, RestrictionSettings, Whitelist};
use bantools_store::InMemoryBanStore;
use chrono::Duration;

use crate::fixtures::RecordingSessions;

/// Engine plus the doubles it was built over
pub struct TestEngine {
    pub engine: BanEngine,
    pub store: Arc<dyn BanStore>,
    pub sessions: Arc<RecordingSessions>,
    pub whitelist: Arc<Whitelist>,
}

impl TestEngine {
    /// Engine over an empty in-memory store, default settings
    pub async fn start() -> Self {
        Self::start_with(Arc::new(InMemoryBanStore::new()), RestrictionSettings::default()).await
    }

    /// Engine whose soft-ban confirmations expire after `timeout`
    pub async fn with_confirmation_timeout(timeout: Duration) -> Self {
        let settings = RestrictionSettings {
            confirmation_timeout: timeout,
            ..RestrictionSettings::default()
        };
        Self::start_with(Arc::new(InMemoryBanStore::new()), settings).await
    }

    /// Engine over `store`, loaded from whatever it already holds
    pub async fn start_with(store: Arc<dyn BanStore>, settings: RestrictionSettings) -> Self {
        let sessions = Arc::new(RecordingSessions::new());
        let whitelist = Arc::new(Whitelist::from_config(&test_whitelist()));

        let engine = BanEngineBuilder::new()
            .persistence(Arc::clone(&store))
            .sessions(Arc::clone(&sessions) as Arc<dyn SessionDirectory>)
            .protection(Arc::clone(&whitelist) as Arc<dyn ProtectionPolicy>)
            .settings(settings)
            .build()
            .expect("engine builds");
        engine.load().await.expect("engine loads");

        Self {
            engine,
            store,
            sessions,
            whitelist,
        }
    }
}

/// Whitelist protecting `Admin` and `Owner`
pub fn test_whitelist() -> WhitelistConfig {
    WhitelistConfig {
        enabled: true,
        players: vec!["Admin".to_string(), "Owner".to_string()],
        protection_message: "This player is protected".to_string(),
    }
}

/// Default configuration with in-memory storage
pub fn memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = bantools_common::StorageBackend::Memory;
    config.whitelist = test_whitelist();
    config
}
