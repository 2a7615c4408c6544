//! Online player sessions
//!
//! Tracks connected players so the engine can capture identities and
//! disconnect restricted players.

mod directory;
mod player;

pub use directory::OnlinePlayers;
pub use player::{PlayerSession, SessionEvent};
