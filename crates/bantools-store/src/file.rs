//! JSON file implementation of BanStore
//!
//! The whole document is cached in memory and rewritten on every change.
//! Writes go to a sibling temp file which is then renamed over the target.

use async_trait::async_trait;
use bantools_core::traits::{BanStore, RepoResult};
use bantools_core::{name_key, BanRecord, SoftBanRecord};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::error::{corrupted, map_io_error, map_json_error};
use crate::models::{BanDocument, StoredBan, StoredSoftBan};
use crate::repair::{backup_path, decode_document, is_flattened, unflatten};

/// Single-file implementation of BanStore
pub struct FileBanStore {
    path: PathBuf,
    document: Mutex<BanDocument>,
}

impl FileBanStore {
    /// Open (creating or repairing as needed) the document at `path`
    ///
    /// # Errors
    /// `PersistenceCorrupted` when a damaged document cannot be replaced,
    /// `StorageError` for other I/O failures.
    pub async fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        let document = load_document(&path).await?;
        info!(
            path = %path.display(),
            bans = document.bans.len(),
            soft_bans = document.soft_bans.len(),
            "Ban document loaded"
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the document and persist it.
    ///
    /// The cached document is only replaced once the write succeeded.
    async fn update<T>(&self, change: impl FnOnce(&mut BanDocument) -> (T, bool)) -> RepoResult<T> {
        let mut current = self.document.lock().await;
        let mut next = current.clone();
        let (result, dirty) = change(&mut next);

        if dirty {
            write_document(&self.path, &next).await?;
            *current = next;
        }
        Ok(result)
    }
}

#[async_trait]
impl BanStore for FileBanStore {
    async fn load_all_bans(&self) -> RepoResult<HashMap<String, BanRecord>> {
        let document = self.document.lock().await;
        Ok(document
            .bans
            .iter()
            .map(|(key, model)| (key.clone(), BanRecord::from(model.clone())))
            .collect())
    }

    async fn load_all_soft_bans(&self) -> RepoResult<HashMap<String, SoftBanRecord>> {
        let document = self.document.lock().await;
        Ok(document
            .soft_bans
            .iter()
            .map(|(key, model)| (key.clone(), SoftBanRecord::from(model.clone())))
            .collect())
    }

    #[instrument(skip(self, record), fields(player = %record.name))]
    async fn save_ban(&self, record: &BanRecord) -> RepoResult<()> {
        let model = StoredBan::from(record);
        self.update(|doc| {
            doc.bans.insert(name_key(&record.name), model);
            ((), true)
        })
        .await
    }

    #[instrument(skip(self, record), fields(player = %record.name))]
    async fn save_soft_ban(&self, record: &SoftBanRecord) -> RepoResult<()> {
        let model = StoredSoftBan::from(record);
        self.update(|doc| {
            doc.soft_bans.insert(name_key(&record.name), model);
            ((), true)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_ban_active(&self, name: &str, active: bool) -> RepoResult<bool> {
        let key = name_key(name);
        self.update(|doc| match doc.bans.get_mut(&key) {
            Some(model) => {
                model.active = active;
                (true, true)
            }
            None => (false, false),
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_soft_ban_active(&self, name: &str, active: bool) -> RepoResult<bool> {
        let key = name_key(name);
        self.update(|doc| match doc.soft_bans.get_mut(&key) {
            Some(model) => {
                model.active = active;
                (true, true)
            }
            None => (false, false),
        })
        .await
    }

    async fn deactivate_expired_soft_bans(&self, now: DateTime<Utc>) -> RepoResult<usize> {
        self.update(|doc| {
            let mut count = 0;
            for model in doc.soft_bans.values_mut() {
                if model.active && model.expires_at <= now {
                    model.active = false;
                    count += 1;
                }
            }
            (count, count > 0)
        })
        .await
    }

    async fn refresh(&self) -> RepoResult<()> {
        let mut current = self.document.lock().await;
        *current = load_document(&self.path).await?;
        Ok(())
    }
}

/// Read the document, creating or repairing it when needed
async fn load_document(path: &Path) -> RepoResult<BanDocument> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "Ban document not found, creating an empty one");
            let document = BanDocument::default();
            write_document(path, &document).await?;
            return Ok(document);
        }
        Err(e) => return Err(map_io_error(path, e)),
    };

    let root = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(root)) => root,
        Ok(_) => return quarantine(path, "root is not an object").await,
        Err(e) => return quarantine(path, e).await,
    };

    if is_flattened(&root) {
        return repair_flattened(path, root).await;
    }

    let decoded = decode_document(&root);
    if decoded.skipped > 0 {
        let backup = back_up(path).await?;
        warn!(
            path = %path.display(),
            backup = %backup.display(),
            skipped = decoded.skipped,
            "Some records could not be read and were skipped"
        );
    }
    Ok(decoded.document)
}

/// Copy the document aside before anything rewrites it
async fn back_up(path: &Path) -> RepoResult<PathBuf> {
    let backup = backup_path(path, Utc::now().timestamp_millis());
    tokio::fs::copy(path, &backup)
        .await
        .map_err(|e| corrupted(path, format!("could not back up damaged document: {e}")))?;
    Ok(backup)
}

/// Move an unreadable document aside and start from an empty one
async fn quarantine(path: &Path, reason: impl std::fmt::Display) -> RepoResult<BanDocument> {
    let backup = backup_path(path, Utc::now().timestamp_millis());
    warn!(
        path = %path.display(),
        backup = %backup.display(),
        %reason,
        "Ban document is unreadable, moving it aside"
    );

    tokio::fs::rename(path, &backup)
        .await
        .map_err(|e| corrupted(path, format!("could not back up damaged document: {e}")))?;

    let document = BanDocument::default();
    write_document(path, &document)
        .await
        .map_err(|e| corrupted(path, format!("could not recreate document: {e}")))?;
    Ok(document)
}

async fn repair_flattened(path: &Path, root: Map<String, Value>) -> RepoResult<BanDocument> {
    let backup = back_up(path).await?;
    warn!(
        path = %path.display(),
        backup = %backup.display(),
        "Ban document has flattened keys, rebuilding it"
    );

    let decoded = decode_document(&unflatten(root));
    write_document(path, &decoded.document)
        .await
        .map_err(|e| corrupted(path, format!("could not save repaired document: {e}")))?;

    info!(
        bans = decoded.document.bans.len(),
        soft_bans = decoded.document.soft_bans.len(),
        skipped = decoded.skipped,
        "Ban document repaired"
    );
    Ok(decoded.document)
}

/// Atomically replace the document on disk
async fn write_document(path: &Path, document: &BanDocument) -> RepoResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| map_io_error(parent, e))?;
    }

    let json = serde_json::to_vec_pretty(document).map_err(map_json_error)?;

    let file_name = path
        .file_name()
        .map_or_else(|| "bans.json".into(), |n| n.to_string_lossy());
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    if let Err(e) = tokio::fs::write(&tmp_path, &json).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(map_io_error(&tmp_path, e));
    }

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(map_io_error(path, e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bantools_core::{BanDuration, PlayerName, RestrictionRecord};
    use chrono::Duration;

    fn steve() -> PlayerName {
        PlayerName::parse("Steve").unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bans.json");

        let store = FileBanStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert!(store.load_all_bans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bans.json");
        let now = Utc::now();

        let store = FileBanStore::open(&path).await.unwrap();
        let ban = BanRecord::new(&steve(), "griefing", BanDuration::Permanent, now)
            .with_identity("uuid-1", "10.0.0.1");
        store.save_ban(&ban).await.unwrap();
        let soft = SoftBanRecord::new(&steve(), "afk", Duration::minutes(30), now);
        store.save_soft_ban(&soft).await.unwrap();
        drop(store);

        let reopened = FileBanStore::open(&path).await.unwrap();
        let bans = reopened.load_all_bans().await.unwrap();
        let loaded = &bans["steve"];
        assert_eq!(loaded.name, "Steve");
        assert_eq!(loaded.id(), Some("uuid-1"));
        assert!(loaded.is_permanent());
        // Stored with millisecond precision
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            now.timestamp_millis()
        );
        assert!(reopened.load_all_soft_bans().await.unwrap()["steve"].active);
    }

    #[tokio::test]
    async fn test_set_active_unknown_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBanStore::open(dir.path().join("bans.json")).await.unwrap();
        assert!(!store.set_ban_active("nobody", false).await.unwrap());
    }

    #[tokio::test]
    async fn test_deactivate_expired() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBanStore::open(dir.path().join("bans.json")).await.unwrap();
        let now = Utc::now();

        let past = SoftBanRecord::new(&steve(), "afk", Duration::minutes(1), now - Duration::minutes(5));
        store.save_soft_ban(&past).await.unwrap();
        let alex = PlayerName::parse("Alex").unwrap();
        let live = SoftBanRecord::new(&alex, "afk", Duration::minutes(30), now);
        store.save_soft_ban(&live).await.unwrap();

        assert_eq!(store.deactivate_expired_soft_bans(now).await.unwrap(), 1);
        let soft = store.load_all_soft_bans().await.unwrap();
        assert!(!soft["steve"].active);
        assert!(soft["alex"].active);
    }

    #[tokio::test]
    async fn test_garbage_is_quarantined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bans.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileBanStore::open(&path).await.unwrap();
        assert!(store.load_all_bans().await.unwrap().is_empty());

        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("bans.json.backup."))
            .collect();
        assert_eq!(backups.len(), 1);
    }
}
