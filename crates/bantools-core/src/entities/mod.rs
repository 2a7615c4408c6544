//! Domain entities - restriction records and pending confirmations

mod ban;
mod pending;
mod record;
mod soft_ban;

pub use ban::BanRecord;
pub use pending::{PendingConfirmation, PendingKey};
pub use record::RestrictionRecord;
pub use soft_ban::SoftBanRecord;
