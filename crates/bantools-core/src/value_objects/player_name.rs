//! Player name - validated, case-insensitive player identifier

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A validated player name.
///
/// Names are 1-16 characters of ASCII letters, digits or underscore. The
/// original spelling is kept for display; comparisons use [`PlayerName::key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Maximum name length accepted by the proxy
    pub const MAX_LEN: usize = 16;

    /// Parse and validate a player name, trimming surrounding whitespace
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyTarget);
        }
        if !is_valid_name(trimmed) {
            return Err(DomainError::InvalidTarget(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The name as originally spelled
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase lookup key
    pub fn key(&self) -> String {
        name_key(&self.0)
    }

    /// Case-insensitive comparison against a raw name
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

/// Lowercase lookup key for any raw name
pub fn name_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

fn is_valid_name(name: &str) -> bool {
    name.len() <= PlayerName::MAX_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl PartialEq for PlayerName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for PlayerName {}

impl std::hash::Hash for PlayerName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl std::str::FromStr for PlayerName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
