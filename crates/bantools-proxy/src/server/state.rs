//! Proxy state
//!
//! Shared handles wired together at startup.

use crate::command::CommandDispatcher;
use crate::login::LoginGuard;
use crate::session::OnlinePlayers;
use bantools_common::AppConfig;
use bantools_service::{BanEngine, ExpirationScheduler, Whitelist};
use std::sync::Arc;

/// Proxy application state
#[derive(Clone)]
pub struct ProxyState {
    /// Restriction engine
    engine: Arc<BanEngine>,
    /// Connected players
    players: Arc<OnlinePlayers>,
    /// Protected players
    whitelist: Arc<Whitelist>,
    /// Connection-time check
    login: LoginGuard,
    /// Admin command entry point
    dispatcher: Arc<CommandDispatcher>,
    /// Background expiration sweep
    scheduler: Arc<ExpirationScheduler>,
    /// Configuration read at startup
    config: Arc<AppConfig>,
}

impl ProxyState {
    pub fn new(
        engine: Arc<BanEngine>,
        players: Arc<OnlinePlayers>,
        whitelist: Arc<Whitelist>,
        dispatcher: CommandDispatcher,
        scheduler: ExpirationScheduler,
        config: AppConfig,
    ) -> Self {
        Self {
            login: LoginGuard::new(Arc::clone(&engine), Arc::clone(&players)),
            engine,
            players,
            whitelist,
            dispatcher: Arc::new(dispatcher),
            scheduler: Arc::new(scheduler),
            config: Arc::new(config),
        }
    }

    pub fn engine(&self) -> &Arc<BanEngine> {
        &self.engine
    }

    pub fn players(&self) -> &Arc<OnlinePlayers> {
        &self.players
    }

    pub fn whitelist(&self) -> &Arc<Whitelist> {
        &self.whitelist
    }

    pub fn login(&self) -> &LoginGuard {
        &self.login
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn scheduler(&self) -> &Arc<ExpirationScheduler> {
        &self.scheduler
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for ProxyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyState")
            .field("players", &self.players)
            .field("scheduler_running", &self.scheduler.is_running())
            .field("config", &"AppConfig")
            .finish()
    }
}
