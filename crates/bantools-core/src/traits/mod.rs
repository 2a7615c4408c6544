//! Collaborator traits (ports) - what the core needs from the outside
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

mod protection;
mod session;
mod store;

pub use protection::{NoProtection, ProtectionPolicy};
pub use session::{OnlinePlayer, SessionDirectory};
pub use store::{BanStore, RepoResult};
