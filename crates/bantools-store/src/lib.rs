//! # bantools-store
//!
//! Storage layer implementing the `BanStore` trait from `bantools-core`.
//!
//! ## Overview
//!
//! - JSON document models with serde derives
//! - Entity ↔ model mappers
//! - `FileBanStore`: durable single-file store with atomic writes and
//!   repair of corrupted documents
//! - `InMemoryBanStore`: volatile store for tests and dry runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bantools_store::FileBanStore;
//! use bantools_core::BanStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileBanStore::open("data/bans.json").await?;
//!     let bans = store.load_all_bans().await?;
//!     Ok(())
//! }
//! ```

mod error;
pub mod file;
pub mod mappers;
pub mod memory;
pub mod models;
pub mod repair;

// Re-export commonly used types
pub use file::FileBanStore;
pub use memory::InMemoryBanStore;
pub use models::{BanDocument, StoredBan, StoredSoftBan, FORMAT_VERSION};
