//! BanTools proxy entry point
//!
//! Run with:
//! ```bash
//! cargo run -p bantools-proxy
//! ```
//!
//! Configuration is loaded from `bantools.toml` (or `BANTOOLS_CONFIG`) and
//! `BANTOOLS__*` environment variables. Admin commands are read from stdin.

use bantools_common::{try_init_tracing_with_config, AppConfig, AppError, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, code = e.error_code(), "BanTools failed");
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;
    let config_path = AppConfig::resolve_path();

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::from_logging(&config.logging)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        storage = ?config.storage.backend,
        path = %config.storage.path.display(),
        whitelist = config.whitelist.enabled,
        "Configuration loaded"
    );

    bantools_proxy::run(config, config_path).await
}
