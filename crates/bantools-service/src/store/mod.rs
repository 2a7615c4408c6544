//! In-memory record stores backed by the persistence port
//!
//! Each store owns an atomically swapped index of active records and
//! serializes its own write-then-reload sequences.

mod index;
mod kind;
pub mod matcher;
mod records;

pub use index::ActiveIndex;
pub use kind::RecordKind;
pub use matcher::{find_match, match_record, MatchKind};
pub use records::{BanRecordStore, RecordStore, SoftBanRecordStore};
