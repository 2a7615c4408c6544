//! Restriction settings derived from configuration

use bantools_common::AppConfig;
use chrono::Duration;

/// Defaults and timings the engine needs from configuration
#[derive(Debug, Clone)]
pub struct RestrictionSettings {
    pub ban_reason: String,
    pub kick_reason: String,
    pub soft_ban_reason: String,
    pub soft_ban_duration: Duration,
    pub confirmation_timeout: Duration,
    pub confirmation_message: String,
}

impl RestrictionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ban_reason: config.defaults.ban_reason.clone(),
            kick_reason: config.defaults.kick_reason.clone(),
            soft_ban_reason: config.defaults.soft_ban_reason.clone(),
            soft_ban_duration: Duration::minutes(i64::from(config.soft_ban.duration_minutes)),
            confirmation_timeout: Duration::minutes(i64::from(
                config.soft_ban.confirmation_timeout_minutes,
            )),
            confirmation_message: config.soft_ban.confirmation_message.clone(),
        }
    }

    pub fn ban_reason_or(&self, reason: Option<&str>) -> String {
        or_default(reason, &self.ban_reason)
    }

    pub fn kick_reason_or(&self, reason: Option<&str>) -> String {
        or_default(reason, &self.kick_reason)
    }

    pub fn soft_ban_reason_or(&self, reason: Option<&str>) -> String {
        or_default(reason, &self.soft_ban_reason)
    }

    pub fn soft_ban_minutes(&self) -> i64 {
        self.soft_ban_duration.num_minutes()
    }
}

impl Default for RestrictionSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

fn or_default(reason: Option<&str>, default: &str) -> String {
    match reason.map(str::trim) {
        Some(given) if !given.is_empty() => given.to_string(),
        _ => default.to_string(),
    }
}
