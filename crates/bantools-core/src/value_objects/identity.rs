//! Player identity - the (id, address, name) triple seen at connection time

use serde::{Deserialize, Serialize};

/// Identity presented by a connecting or online player.
///
/// Empty strings are normalised to `None`; an unknown field never matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: Option<String>,
    pub address: Option<String>,
    pub username: String,
}

impl PlayerIdentity {
    /// Create an identity, discarding blank id/address values
    pub fn new(
        id: Option<impl Into<String>>,
        address: Option<impl Into<String>>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: non_blank(id.map(Into::into)),
            address: non_blank(address.map(Into::into)),
            username: username.into(),
        }
    }

    /// Identity known only by name (offline player)
    pub fn name_only(username: impl Into<String>) -> Self {
        Self {
            id: None,
            address: None,
            username: username.into(),
        }
    }

    /// Whether both id and address are known
    pub fn is_complete(&self) -> bool {
        self.id.is_some() && self.address.is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
