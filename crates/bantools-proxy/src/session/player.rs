//! A single connected player

use bantools_core::{OnlinePlayer, PlayerIdentity};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Events pushed to a session's connection task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Close the connection, showing `message` to the player
    Disconnect { message: String },
}

/// A connected player
pub struct PlayerSession {
    /// Unique session ID
    session_id: u64,

    /// Name, id and address reported at login
    player: OnlinePlayer,

    /// Channel to the connection task
    sender: mpsc::Sender<SessionEvent>,

    /// Set once a disconnect has been requested
    closing: AtomicBool,

    connected_at: DateTime<Utc>,
}

impl PlayerSession {
    pub fn new(
        session_id: u64,
        player: OnlinePlayer,
        sender: mpsc::Sender<SessionEvent>,
    ) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            player,
            sender,
            closing: AtomicBool::new(false),
            connected_at: Utc::now(),
        })
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn username(&self) -> &str {
        &self.player.name
    }

    /// Identity as the login check sees it
    pub fn identity(&self) -> PlayerIdentity {
        PlayerIdentity::new(
            Some(self.player.id.as_str()),
            Some(self.player.address.as_str()),
            self.player.name.as_str(),
        )
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Snapshot handed to the engine
    pub fn to_online_player(&self) -> OnlinePlayer {
        self.player.clone()
    }

    /// Ask the connection task to close
    ///
    /// Returns false if a disconnect was already requested or the task is gone.
    pub fn disconnect(&self, message: &str) -> bool {
        if self.closing.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.sender
            .try_send(SessionEvent::Disconnect {
                message: message.to_string(),
            })
            .is_ok()
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst) || self.sender.is_closed()
    }
}

impl std::fmt::Debug for PlayerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerSession")
            .field("session_id", &self.session_id)
            .field("username", &self.player.name)
            .field("closing", &self.is_closing())
            .finish()
    }
}
