//! Identity matching
//!
//! A record applies to a connection when the name matches (case-insensitive),
//! or when a known id or address is equal to the connection's. Unknown id
//! and address never match. Records that are inactive or past their end
//! time never match, whatever the last sweep did.

use chrono::{DateTime, Utc};

use bantools_core::{PlayerIdentity, RestrictionRecord};

/// Which identity field produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Name,
    Id,
    Address,
}

/// Match a single record against an identity
pub fn match_record<R: RestrictionRecord>(
    record: &R,
    identity: &PlayerIdentity,
    now: DateTime<Utc>,
) -> Option<MatchKind> {
    if !record.is_in_force_at(now) {
        return None;
    }

    if record.name().eq_ignore_ascii_case(identity.username.trim()) {
        return Some(MatchKind::Name);
    }
    if record.id().is_some() && record.id() == identity.id.as_deref() {
        return Some(MatchKind::Id);
    }
    if record.address().is_some() && record.address() == identity.address.as_deref() {
        return Some(MatchKind::Address);
    }
    None
}

/// Find the record that applies to `identity`
///
/// A name match anywhere in the set wins over an id or address match on
/// another record.
pub fn find_match<'a, R, I>(
    records: I,
    identity: &PlayerIdentity,
    now: DateTime<Utc>,
) -> Option<(&'a R, MatchKind)>
where
    R: RestrictionRecord,
    I: IntoIterator<Item = &'a R>,
{
    let mut fallback = None;

    for record in records {
        match match_record(record, identity, now) {
            Some(MatchKind::Name) => return Some((record, MatchKind::Name)),
            Some(kind) if fallback.is_none() => fallback = Some((record, kind)),
            _ => {}
        }
    }

    fallback
}
