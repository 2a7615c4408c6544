//! Recovery of damaged ban documents
//!
//! Two kinds of damage are handled here. A document whose records were
//! written as dotted root keys (`Steve.reason`, `soft_bans.Alex.active`)
//! is rebuilt into nested sections. Individual records that fail to decode
//! are skipped so the rest of the document still loads.

use bantools_core::name_key;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::models::{BanDocument, StoredBan, StoredSoftBan, FORMAT_VERSION};

/// Field names a stored record may carry
pub const RECORD_FIELDS: [&str; 7] = [
    "name",
    "id",
    "address",
    "reason",
    "created_at",
    "expires_at",
    "active",
];

const BANS: &str = "bans";
const SOFT_BANS: &str = "soft_bans";

/// Result of decoding a document root
#[derive(Debug, Default)]
pub struct Decoded {
    pub document: BanDocument,
    /// Records (or whole sections) dropped because they could not be read
    pub skipped: usize,
}

/// Whether any root key looks like `<player>.<field>`
pub fn is_flattened(root: &Map<String, Value>) -> bool {
    root.keys().any(|key| split_flattened_key(key).is_some())
}

/// Split `[section.]player.field` into its parts
fn split_flattened_key(key: &str) -> Option<(&str, &str, &str)> {
    let (rest, field) = key.rsplit_once('.')?;
    if !RECORD_FIELDS.contains(&field) {
        return None;
    }

    let (section, player) = match rest.split_once('.') {
        Some((section, player)) if section == BANS || section == SOFT_BANS => (section, player),
        _ => (BANS, rest),
    };

    if player.is_empty() || player.contains('.') {
        return None;
    }
    Some((section, player, field))
}

/// Rebuild dotted root keys into nested sections
///
/// Records already present in an intact section win over rebuilt ones.
/// Unrelated root keys are carried over unchanged.
pub fn unflatten(root: Map<String, Value>) -> Map<String, Value> {
    let mut rebuilt: BTreeMap<(String, String), Map<String, Value>> = BTreeMap::new();
    let mut repaired = Map::new();

    for (key, value) in root {
        let parts = split_flattened_key(&key)
            .map(|(section, player, field)| (section.to_string(), player.to_string(), field.to_string()));

        match parts {
            Some((section, player, field)) => {
                rebuilt.entry((section, player)).or_default().insert(field, value);
            }
            None => {
                repaired.insert(key, value);
            }
        }
    }

    for ((section, player), fields) in rebuilt {
        let slot = repaired
            .entry(section)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(records) = slot {
            let key = name_key(&player);
            if !records.keys().any(|existing| name_key(existing) == key) {
                records.insert(player, Value::Object(fields));
            }
        }
    }

    repaired
}

/// Decode both sections, skipping records that cannot be read
pub fn decode_document(root: &Map<String, Value>) -> Decoded {
    let mut skipped = 0;
    let bans = decode_section::<StoredBan>(root, BANS, &mut skipped);
    let soft_bans = decode_section::<StoredSoftBan>(root, SOFT_BANS, &mut skipped);

    Decoded {
        document: BanDocument {
            format_version: FORMAT_VERSION,
            bans,
            soft_bans,
        },
        skipped,
    }
}

fn decode_section<M: DeserializeOwned>(
    root: &Map<String, Value>,
    section: &str,
    skipped: &mut usize,
) -> BTreeMap<String, M> {
    let mut out = BTreeMap::new();

    let Some(value) = root.get(section) else {
        return out;
    };
    let Some(records) = value.as_object() else {
        warn!(section, "Section is not an object, ignoring it");
        *skipped += 1;
        return out;
    };

    for (key, raw) in records {
        match decode_record::<M>(key, raw) {
            Ok(model) => {
                out.insert(name_key(key), model);
            }
            Err(e) => {
                warn!(section, player = %key, error = %e, "Skipping unreadable record");
                *skipped += 1;
            }
        }
    }

    out
}

/// Decode one record, taking the name from its map key when missing
pub fn decode_record<M: DeserializeOwned>(key: &str, raw: &Value) -> Result<M, serde_json::Error> {
    let mut value = raw.clone();
    if let Value::Object(fields) = &mut value {
        let missing = fields
            .get("name")
            .and_then(Value::as_str)
            .is_none_or(str::is_empty);
        if missing {
            fields.insert("name".to_string(), Value::String(key.to_string()));
        }
    }
    serde_json::from_value(value)
}

/// Where an unreadable document is moved before being recreated
pub fn backup_path(path: &Path, epoch_ms: i64) -> PathBuf {
    let file_name = path
        .file_name()
        .map_or_else(|| "bans.json".into(), |n| n.to_string_lossy());
    path.with_file_name(format!("{file_name}.backup.{epoch_ms}"))
}
