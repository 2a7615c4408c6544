//! Online player directory
//!
//! Sessions keyed by session ID, with a lowercase-name index so lookups and
//! kicks are case-insensitive.

use super::{PlayerSession, SessionEvent};
use bantools_core::{name_key, OnlinePlayer, SessionDirectory};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// All connected players
pub struct OnlinePlayers {
    /// Active sessions by session ID
    sessions: DashMap<u64, Arc<PlayerSession>>,

    /// Lowercase name to session IDs
    by_name: DashMap<String, HashSet<u64>>,

    next_id: AtomicU64,
}

impl OnlinePlayers {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            by_name: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a player that passed the login check
    pub fn add_session(
        &self,
        player: OnlinePlayer,
        sender: mpsc::Sender<SessionEvent>,
    ) -> Arc<PlayerSession> {
        let session_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let key = name_key(&player.name);
        let session = PlayerSession::new(session_id, player, sender);

        self.sessions.insert(session_id, Arc::clone(&session));
        self.by_name.entry(key).or_default().insert(session_id);

        tracing::debug!(
            session_id,
            player = %session.username(),
            "Session added"
        );

        session
    }

    /// Forget a session
    pub fn remove_session(&self, session_id: u64) -> Option<Arc<PlayerSession>> {
        let (_, session) = self.sessions.remove(&session_id)?;

        let key = name_key(session.username());
        self.by_name.alter(&key, |_, mut ids| {
            ids.remove(&session_id);
            ids
        });
        self.by_name.remove_if(&key, |_, ids| ids.is_empty());

        tracing::debug!(session_id, player = %session.username(), "Session removed");
        Some(session)
    }

    pub fn get_session(&self, session_id: u64) -> Option<Arc<PlayerSession>> {
        self.sessions.get(&session_id).map(|r| Arc::clone(r.value()))
    }

    /// Every session for `name`, case-insensitive
    pub fn sessions_for(&self, name: &str) -> Vec<Arc<PlayerSession>> {
        self.by_name
            .get(&name_key(name))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.sessions.get(id).map(|s| Arc::clone(s.value())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn player_count(&self) -> usize {
        self.by_name.len()
    }

    /// Drop sessions whose connection task has gone away
    pub fn cleanup_closed_sessions(&self) -> usize {
        let closed: Vec<u64> = self
            .sessions
            .iter()
            .filter(|r| r.is_closing())
            .map(|r| *r.key())
            .collect();

        let count = closed.len();
        for session_id in closed {
            self.remove_session(session_id);
        }

        if count > 0 {
            tracing::info!(count, "Cleaned up closed sessions");
        }
        count
    }
}

impl SessionDirectory for OnlinePlayers {
    fn find_online(&self, name: &str) -> Option<OnlinePlayer> {
        self.sessions_for(name)
            .into_iter()
            .filter(|s| !s.is_closing())
            .min_by_key(|s| s.session_id())
            .map(|s| s.to_online_player())
    }

    fn disconnect(&self, name: &str, message: &str) -> usize {
        let mut closed = 0;
        for session in self.sessions_for(name) {
            if session.disconnect(message) {
                closed += 1;
            }
            self.remove_session(session.session_id());
        }
        closed
    }

    fn all_online_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .sessions
            .iter()
            .map(|s| s.username().to_string())
            .collect();
        names.sort_by_key(|name| name_key(name));
        names.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        names
    }
}

impl Default for OnlinePlayers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OnlinePlayers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnlinePlayers")
            .field("sessions", &self.sessions.len())
            .field("players", &self.by_name.len())
            .finish()
    }
}
