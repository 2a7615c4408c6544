//! SoftBanRecord entity <-> model mapper

use bantools_core::SoftBanRecord;

use crate::models::StoredSoftBan;

impl From<StoredSoftBan> for SoftBanRecord {
    fn from(model: StoredSoftBan) -> Self {
        SoftBanRecord {
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

impl From<&SoftBanRecord> for StoredSoftBan {
    fn from(record: &SoftBanRecord) -> Self {
        StoredSoftBan {
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
