//! # bantools-proxy
//!
//! Proxy-facing side of BanTools: the online-player directory, the login
//! guard, the `bt` admin command surface, and the console runner.

pub mod command;
pub mod login;
pub mod server;
pub mod session;

pub use command::{CommandDispatcher, CommandReply, ReplyKind};
pub use login::{LoginDecision, LoginGuard};
pub use server::{create_proxy_state, create_store, run, ProxyState};
pub use session::{OnlinePlayers, PlayerSession, SessionEvent};
