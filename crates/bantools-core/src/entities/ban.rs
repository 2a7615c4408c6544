//! Ban record - a permanent or time-bounded restriction

use chrono::{DateTime, Utc};

use super::record::RestrictionRecord;
use crate::value_objects::{format_instant, BanDuration, PlayerName};

/// Ban record entity
///
/// `id` and `address` stay `None` for offline bans until the player next
/// connects. Records are never deleted; unbanning clears `active`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRecord {
    pub name: String,
    pub id: Option<String>,
    pub address: Option<String>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl BanRecord {
    /// Create an active ban starting at `now`
    pub fn new(
        name: &PlayerName,
        reason: impl Into<String>,
        duration: BanDuration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.as_str().to_string(),
            id: None,
            address: None,
            reason: reason.into(),
            created_at: now,
            expires_at: duration.expires_at(),
            active: true,
        }
    }

    /// Attach an already-known identity (player online at ban time)
    pub fn with_identity(mut self, id: impl Into<String>, address: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self.address = Some(address.into());
        self
    }

    #[inline]
    pub fn is_permanent(&self) -> bool {
        self.expires_at.is_none()
    }

    /// Summary used when rejecting a duplicate ban
    pub fn describe(&self) -> String {
        match self.expires_at {
            None => format!("Reason: {}, duration: permanent ban", self.reason),
            Some(at) => format!("Reason: {}, duration: until {}", self.reason, format_instant(at)),
        }
    }

    /// Message shown to a player refused at connection time
    pub fn restriction_message(&self) -> String {
        match self.expires_at {
            None => format!("You have been permanently banned!\nReason: {}", self.reason),
            Some(at) => format!(
                "You are banned until {}\nReason: {}",
                format_instant(at),
                self.reason
            ),
        }
    }
}

impl RestrictionRecord for BanRecord {
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
        self.expires_at
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
