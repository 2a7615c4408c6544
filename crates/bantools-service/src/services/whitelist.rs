//! Whitelist - players no administrator action may touch

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

use bantools_common::WhitelistConfig;
use bantools_core::{name_key, ProtectionPolicy};

struct WhitelistState {
    enabled: bool,
    /// lowercase name -> name as configured
    players: HashMap<String, String>,
    protection_message: String,
}

impl WhitelistState {
    fn from_config(config: &WhitelistConfig) -> Self {
        Self {
            enabled: config.enabled,
            players: config
                .players
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(|name| (name_key(name), name.to_string()))
                .collect(),
            protection_message: config.protection_message.clone(),
        }
    }
}

/// Protected-player list
///
/// Additions and removals are in-memory only; `reload` replaces them with
/// the configured list.
pub struct Whitelist {
    state: RwLock<WhitelistState>,
}

impl Whitelist {
    pub fn from_config(config: &WhitelistConfig) -> Self {
        let whitelist = Self {
            state: RwLock::new(WhitelistState::from_config(config)),
        };
        whitelist.log_loaded();
        whitelist
    }

    /// Re-read enablement, players and message
    pub fn reload(&self, config: &WhitelistConfig) {
        *self.state.write() = WhitelistState::from_config(config);
        self.log_loaded();
    }

    fn log_loaded(&self) {
        let state = self.state.read();
        info!(
            enabled = state.enabled,
            protected = state.players.len(),
            "Whitelist loaded"
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.state.read().enabled
    }

    /// Case-insensitive; always `false` while disabled
    pub fn is_whitelisted(&self, name: &str) -> bool {
        let state = self.state.read();
        state.enabled && state.players.contains_key(&name_key(name))
    }

    pub fn add(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let added = self
            .state
            .write()
            .players
            .insert(name_key(name), name.to_string())
            .is_none();
        if added {
            info!(player = %name, "Player added to in-memory whitelist");
        }
        added
    }

    pub fn remove(&self, name: &str) -> bool {
        let removed = self.state.write().players.remove(&name_key(name)).is_some();
        if removed {
            info!(player = %name, "Player removed from in-memory whitelist");
        }
        removed
    }

    /// Protected names as configured, sorted
    pub fn players(&self) -> Vec<String> {
        let mut players: Vec<String> = self.state.read().players.values().cloned().collect();
        players.sort();
        players
    }

    pub fn protection_message(&self) -> String {
        self.state.read().protection_message.clone()
    }
}

impl ProtectionPolicy for Whitelist {
    fn check_protected(&self, name: &str) -> Option<String> {
        self.is_whitelisted(name).then(|| self.protection_message())
    }
}
