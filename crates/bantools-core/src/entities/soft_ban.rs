//! Soft ban record - a short, always time-bounded restriction

use chrono::{DateTime, Duration, Utc};

use super::record::RestrictionRecord;
use crate::value_objects::{format_remaining, PlayerName};

/// Soft ban record entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftBanRecord {
    pub name: String,
    pub id: Option<String>,
    pub address: Option<String>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
}

impl SoftBanRecord {
    /// Create an active soft ban lasting `duration` from `now`
    pub fn new(
        name: &PlayerName,
        reason: impl Into<String>,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.as_str().to_string(),
            id: None,
            address: None,
            reason: reason.into(),
            created_at: now,
            expires_at: now + duration,
            active: true,
        }
    }

    /// Attach the identity of a currently connected player
    pub fn with_identity(mut self, id: impl Into<String>, address: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self.address = Some(address.into());
        self
    }

    /// Whole minutes left, never negative
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_minutes().max(0)
    }

    pub fn remaining_formatted(&self, now: DateTime<Utc>) -> String {
        format_remaining(self.expires_at, now)
    }

    /// Message shown to a player refused at connection time
    pub fn restriction_message(&self, now: DateTime<Utc>) -> String {
        format!(
            "You have been temporarily banned!\nReason: {}\nTime remaining: {}",
            self.reason,
            self.remaining_formatted(now)
        )
    }
}

impl RestrictionRecord for SoftBanRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|v| !v.is_empty())
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|v| !v.is_empty())
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        Some(self.expires_at)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn identity_slots(&mut self) -> (&mut Option<String>, &mut Option<String>) {
        (&mut self.id, &mut self.address)
    }
}
