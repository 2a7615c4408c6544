//! Login guard - decides whether a connecting player may join

use bantools_core::{OnlinePlayer, PlayerIdentity};
use bantools_service::BanEngine;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use crate::session::{OnlinePlayers, PlayerSession, SessionEvent};

/// Outcome of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginDecision {
    Allow,
    /// Refuse the connection with this message
    Deny(String),
}

impl LoginDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Runs the restriction check for every connection
#[derive(Clone)]
pub struct LoginGuard {
    engine: Arc<BanEngine>,
    players: Arc<OnlinePlayers>,
}

impl LoginGuard {
    pub fn new(engine: Arc<BanEngine>, players: Arc<OnlinePlayers>) -> Self {
        Self { engine, players }
    }

    /// Check a connecting identity against bans and soft bans
    pub async fn check(&self, identity: &PlayerIdentity) -> LoginDecision {
        match self.engine.check_connection(identity).await {
            Some(restriction) => {
                info!(player = %identity.username, "Refused restricted login");
                LoginDecision::Deny(restriction.message(Utc::now()))
            }
            None => LoginDecision::Allow,
        }
    }

    /// Check and, when allowed, register the session
    pub async fn login(
        &self,
        player: OnlinePlayer,
        sender: mpsc::Sender<SessionEvent>,
    ) -> Result<Arc<PlayerSession>, String> {
        let identity = PlayerIdentity::new(
            Some(player.id.as_str()),
            Some(player.address.as_str()),
            player.name.as_str(),
        );
        match self.check(&identity).await {
            LoginDecision::Allow => {
                let session = self.players.add_session(player, sender);
                info!(player = %session.username(), session_id = session.session_id(), "Player joined");
                Ok(session)
            }
            LoginDecision::Deny(message) => Err(message),
        }
    }

    /// Handle a player leaving
    pub fn logout(&self, session_id: u64) -> bool {
        match self.players.remove_session(session_id) {
            Some(session) => {
                info!(player = %session.username(), session_id, "Player left");
                true
            }
            None => false,
        }
    }

    pub fn players(&self) -> &Arc<OnlinePlayers> {
        &self.players
    }
}
