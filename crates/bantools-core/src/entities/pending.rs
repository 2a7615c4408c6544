//! Pending confirmation - first step of a two-step soft ban

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::value_objects::{name_key, PlayerName};

/// Composite key: one pending entry per (administrator, target) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingKey {
    admin: String,
    target: String,
}

impl PendingKey {
    pub fn new(admin: &str, target: &PlayerName) -> Self {
        Self {
            admin: name_key(admin),
            target: target.key(),
        }
    }

    pub fn admin(&self) -> &str {
        &self.admin
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for PendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.admin, self.target)
    }
}

/// An unconfirmed soft-ban request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub admin: String,
    pub target: PlayerName,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
}

impl PendingConfirmation {
    pub fn new(
        admin: impl Into<String>,
        target: PlayerName,
        reason: impl Into<String>,
        timeout: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            admin: admin.into(),
            target,
            reason: reason.into(),
            created_at: now,
            expire_at: now + timeout,
        }
    }

    pub fn key(&self) -> PendingKey {
        PendingKey::new(&self.admin, &self.target)
    }

    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expire_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_case_insensitive() {
        let target = PlayerName::parse("Steve").unwrap();
        let a = PendingKey::new("Console", &target);
        let b = PendingKey::new("console", &PlayerName::parse("STEVE").unwrap());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "console:steve");
    }

    #[test]
    fn test_distinct_admins_distinct_keys() {
        let target = PlayerName::parse("Steve").unwrap();
        assert_ne!(PendingKey::new("A", &target), PendingKey::new("B", &target));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let pending = PendingConfirmation::new(
            "A",
            PlayerName::parse("P").unwrap(),
            "x",
            Duration::minutes(3),
            now,
        );
        assert!(!pending.is_expired_at(now));
        assert!(pending.is_expired_at(now + Duration::minutes(3)));
        assert_eq!(pending.key().admin(), "a");
    }
}
