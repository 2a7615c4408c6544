//! Persisted document models
//!
//! These structs define the on-disk JSON layout. They are deliberately
//! separate from the domain entities so the file format can evolve on its own.

mod document;
mod record;

pub use document::{BanDocument, FORMAT_VERSION};
pub use record::{StoredBan, StoredSoftBan};
