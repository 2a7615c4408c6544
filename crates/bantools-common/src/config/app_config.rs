//! Application configuration structs
//!
//! Loads configuration from built-in defaults, an optional TOML file, and
//! `BANTOOLS__`-prefixed environment variables (highest precedence).

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_VAR: &str = "BANTOOLS_CONFIG";
/// Config file read when `BANTOOLS_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "bantools.toml";
/// Prefix for environment overrides, e.g. `BANTOOLS__SOFT_BAN__DURATION_MINUTES`
pub const ENV_PREFIX: &str = "BANTOOLS";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: DefaultReasons,
    #[serde(default)]
    pub soft_ban: SoftBanConfig,
    #[serde(default)]
    pub whitelist: WhitelistConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reasons used when an administrator gives none
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultReasons {
    #[serde(default = "default_ban_reason")]
    pub ban_reason: String,
    #[serde(default = "default_kick_reason")]
    pub kick_reason: String,
    #[serde(default = "default_soft_ban_reason")]
    pub soft_ban_reason: String,
}

/// Soft ban timing and confirmation prompt
#[derive(Debug, Clone, Deserialize)]
pub struct SoftBanConfig {
    #[serde(default = "default_soft_ban_minutes")]
    pub duration_minutes: u32,
    #[serde(default = "default_confirmation_timeout_minutes")]
    pub confirmation_timeout_minutes: u32,
    #[serde(default = "default_confirmation_message")]
    pub confirmation_message: String,
}

/// Protected players
#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_whitelist_players")]
    pub players: Vec<String>,
    #[serde(default = "default_protection_message")]
    pub protection_message: String,
}

/// Where records are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// Record storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

/// Expiration sweep configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Log output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_ban_reason() -> String {
    "Violation of server rules".to_string()
}

fn default_kick_reason() -> String {
    "Kicked by an administrator".to_string()
}

fn default_soft_ban_reason() -> String {
    "Temporarily kicked, please try again later".to_string()
}

fn default_soft_ban_minutes() -> u32 {
    30
}

fn default_confirmation_timeout_minutes() -> u32 {
    3
}

fn default_confirmation_message() -> String {
    "This action will temporarily kick the player; they cannot rejoin for thirty minutes. \
     Please check the surroundings of AFK players. To confirm, re-enter the command."
        .to_string()
}

fn default_true() -> bool {
    true
}

fn default_whitelist_players() -> Vec<String> {
    vec!["Admin".to_string(), "Owner".to_string()]
}

fn default_protection_message() -> String {
    "This player is protected by the whitelist and cannot be modified!".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data/bans.json")
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DefaultReasons {
    fn default() -> Self {
        Self {
            ban_reason: default_ban_reason(),
            kick_reason: default_kick_reason(),
            soft_ban_reason: default_soft_ban_reason(),
        }
    }
}

impl Default for SoftBanConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_soft_ban_minutes(),
            confirmation_timeout_minutes: default_confirmation_timeout_minutes(),
            confirmation_message: default_confirmation_message(),
        }
    }
}

impl Default for WhitelistConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            players: default_whitelist_players(),
            protection_message: default_protection_message(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, the config file, and the environment
    ///
    /// # Errors
    /// Returns an error if a source cannot be parsed or a value is out of range
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::load_from(&Self::resolve_path())
    }

    /// Config file named by `BANTOOLS_CONFIG`, or `bantools.toml`
    pub fn resolve_path() -> PathBuf {
        env::var(CONFIG_PATH_VAR)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
    }

    /// Load configuration from a specific file (missing file is allowed)
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("whitelist.players"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.soft_ban.duration_minutes == 0 {
            return Err(ConfigError::InvalidValue(
                "soft_ban.duration_minutes",
                "must be at least 1".to_string(),
            ));
        }
        if self.soft_ban.confirmation_timeout_minutes == 0 {
            return Err(ConfigError::InvalidValue(
                "soft_ban.confirmation_timeout_minutes",
                "must be at least 1".to_string(),
            ));
        }
        if self.scheduler.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "scheduler.sweep_interval_secs",
                "must be at least 1".to_string(),
            ));
        }

        let reasons = [
            ("defaults.ban_reason", &self.defaults.ban_reason),
            ("defaults.kick_reason", &self.defaults.kick_reason),
            ("defaults.soft_ban_reason", &self.defaults.soft_ban_reason),
        ];
        for (key, value) in reasons {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue(key, "must not be empty".to_string()));
            }
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
