//! Session directory - the proxy's view of who is online

/// A connected player as seen by the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlinePlayer {
    pub name: String,
    pub id: String,
    pub address: String,
}

pub trait SessionDirectory: Send + Sync {
    /// Look up an online player by name (case-insensitive)
    fn find_online(&self, name: &str) -> Option<OnlinePlayer>;

    /// Disconnect every session with this name; returns how many were closed
    fn disconnect(&self, name: &str, message: &str) -> usize;

    /// Names of all online players
    fn all_online_names(&self) -> Vec<String>;
}
