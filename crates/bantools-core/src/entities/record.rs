//! Behaviour shared by ban and soft-ban records

use chrono::{DateTime, Utc};

use crate::value_objects::{name_key, PlayerIdentity};

/// A stored restriction that can be matched against a player identity.
pub trait RestrictionRecord: Clone + Send + Sync + 'static {
    /// Player name as recorded
    fn name(&self) -> &str;

    /// Known stable id, `None` until observed
    fn id(&self) -> Option<&str>;

    /// Known network address, `None` until observed
    fn address(&self) -> Option<&str>;

    fn reason(&self) -> &str;

    /// End instant, `None` for permanent records
    fn expires_at(&self) -> Option<DateTime<Utc>>;

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    /// Mutable access to the identity fields
    fn identity_slots(&mut self) -> (&mut Option<String>, &mut Option<String>);

    /// Lowercase primary key
    fn key(&self) -> String {
        name_key(self.name())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }

    /// Active and not yet expired
    fn is_in_force_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && !self.is_expired_at(now)
    }

    /// Fill in unknown id/address from an observed identity.
    ///
    /// Returns `true` when anything changed. Fields that are already known
    /// are never overwritten.
    fn learn_identity(&mut self, identity: &PlayerIdentity) -> bool {
        let (id, address) = self.identity_slots();
        let mut changed = false;

        if id.as_deref().is_none_or(str::is_empty) {
            if let Some(seen) = &identity.id {
                *id = Some(seen.clone());
                changed = true;
            }
        }
        if address.as_deref().is_none_or(str::is_empty) {
            if let Some(seen) = &identity.address {
                *address = Some(seen.clone());
                changed = true;
            }
        }

        changed
    }

    /// Whether either identity field is still unknown
    fn needs_identity(&self) -> bool {
        self.id().is_none() || self.address().is_none()
    }
}
