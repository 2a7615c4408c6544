//! BanRecord entity <-> model mapper

use bantools_core::BanRecord;

use crate::models::StoredBan;

impl From<StoredBan> for BanRecord {
    fn from(model: StoredBan) -> Self {
        BanRecord {
            name: model.name,
            id: model.id.filter(|v| !v.is_empty()),
            address: model.address.filter(|v| !v.is_empty()),
            reason: model.reason,
            created_at: model.created_at,
            expires_at: model.expires_at,
            active: model.active,
        }
    }
}

impl From<&BanRecord> for StoredBan {
    fn from(record: &BanRecord) -> Self {
        StoredBan {
            name: record.name.clone(),
            id: record.id.clone(),
            address: record.address.clone(),
            reason: record.reason.clone(),
            created_at: record.created_at,
            expires_at: record.expires_at,
            active: record.active,
        }
    }
}
