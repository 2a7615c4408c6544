//! Proxy setup
//!
//! Builds the persistence adapter, engine and command surface from
//! configuration, then runs the console until shutdown.

mod console;
mod state;

pub use console::{run_console, ConsoleAction};
pub use state::ProxyState;

use crate::command::CommandDispatcher;
use crate::session::OnlinePlayers;
use bantools_common::{AppConfig, AppError, StorageBackend};
use bantools_core::{BanStore, ProtectionPolicy, SessionDirectory};
use bantools_service::{BanEngineBuilder, RestrictionSettings, Whitelist};
use bantools_store::{FileBanStore, InMemoryBanStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Open the configured persistence adapter
pub async fn create_store(config: &AppConfig) -> Result<Arc<dyn BanStore>, AppError> {
    match config.storage.backend {
        StorageBackend::File => {
            tracing::info!(path = %config.storage.path.display(), "Opening ban file...");
            let store = FileBanStore::open(config.storage.path.clone()).await?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, records will not survive a restart");
            Ok(Arc::new(InMemoryBanStore::new()))
        }
    }
}

/// Initialize all dependencies and create `ProxyState`
///
/// Active records are loaded before this returns; the scheduler is not
/// started yet.
pub async fn create_proxy_state(
    config: AppConfig,
    config_path: PathBuf,
) -> Result<ProxyState, AppError> {
    let persistence = create_store(&config).await?;

    let players = OnlinePlayers::new_shared();
    let whitelist = Arc::new(Whitelist::from_config(&config.whitelist));

    let engine = BanEngineBuilder::new()
        .persistence(persistence)
        .sessions(Arc::clone(&players) as Arc<dyn SessionDirectory>)
        .protection(Arc::clone(&whitelist) as Arc<dyn ProtectionPolicy>)
        .settings(RestrictionSettings::from_config(&config))
        .build()?;
    engine.load().await?;

    let engine = Arc::new(engine);
    let scheduler = engine.scheduler(Duration::from_secs(config.scheduler.sweep_interval_secs));
    let dispatcher =
        CommandDispatcher::new(Arc::clone(&engine), Arc::clone(&whitelist), config_path);

    Ok(ProxyState::new(
        engine,
        players,
        whitelist,
        dispatcher,
        scheduler,
        config,
    ))
}

/// Run the proxy with configuration until the console closes or ctrl-c
pub async fn run(config: AppConfig, config_path: PathBuf) -> Result<(), AppError> {
    let state = create_proxy_state(config, config_path).await?;

    let sweeper = state.scheduler().start()?;
    tracing::info!(
        bans = state.engine().list_active_bans().len(),
        soft_bans = state.engine().list_active_soft_bans().len(),
        "BanTools ready"
    );

    let result = run_console(&state, tokio::io::stdin()).await;

    state.scheduler().stop();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "Expiration scheduler task ended abnormally");
    }
    tracing::info!("BanTools stopped");

    result
}
