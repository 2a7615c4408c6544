//! Top-level ban document

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::record::{StoredBan, StoredSoftBan};

/// Current document layout version
pub const FORMAT_VERSION: u8 = 1;

/// The whole persisted state, keyed by lowercase player name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanDocument {
    pub format_version: u8,
    #[serde(default)]
    pub bans: BTreeMap<String, StoredBan>,
    #[serde(default)]
    pub soft_bans: BTreeMap<String, StoredSoftBan>,
}

impl Default for BanDocument {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            bans: BTreeMap::new(),
            soft_bans: BTreeMap::new(),
        }
    }
}
