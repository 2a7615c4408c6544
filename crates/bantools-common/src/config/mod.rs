//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, ConfigError, DefaultReasons, LoggingConfig, SchedulerConfig, SoftBanConfig,
    StorageBackend, StorageConfig, WhitelistConfig, CONFIG_PATH_VAR, DEFAULT_CONFIG_FILE,
    ENV_PREFIX,
};
