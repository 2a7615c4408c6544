//! Admin console
//!
//! Reads one command per line. `bt ...` lines go to the dispatcher as the
//! `console` admin; a few console-only lines simulate player traffic.

use super::ProxyState;
use crate::command::{CommandReply, ReplyKind};
use crate::session::SessionEvent;
use bantools_common::AppError;
use bantools_core::{OnlinePlayer, SessionDirectory};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

/// Name used for commands typed at the console
pub const CONSOLE_ADMIN: &str = "console";

/// A console line, before dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    /// `connect <name> <id> <address>`
    Connect(OnlinePlayer),
    /// `leave <name>`
    Leave(String),
    /// `who`
    Who,
    /// `complete <partial line>`
    Complete(String),
    /// `stop`, `quit` or `exit`
    Stop,
    /// Anything else is an admin command
    Command(String),
}

impl ConsoleAction {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_start();
        if line.trim_end().is_empty() {
            return None;
        }

        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line.trim_end(), ""));
        let action = match head.to_ascii_lowercase().as_str() {
            "connect" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                [name, id, address] => Self::Connect(OnlinePlayer {
                    name: (*name).to_string(),
                    id: (*id).to_string(),
                    address: (*address).to_string(),
                }),
                _ => Self::Command(line.trim_end().to_string()),
            },
            "leave" if !rest.trim().is_empty() => Self::Leave(rest.trim().to_string()),
            "who" => Self::Who,
            "complete" => Self::Complete(rest.to_string()),
            "stop" | "quit" | "exit" => Self::Stop,
            _ => Self::Command(line.trim_end().to_string()),
        };
        Some(action)
    }
}

/// Read console lines until end of input, `stop`, or ctrl-c
pub async fn run_console<R>(state: &ProxyState, input: R) -> Result<(), AppError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("Shutdown signal received");
                break;
            }
        };

        let Some(line) = line else {
            tracing::info!("Console input closed");
            break;
        };

        match ConsoleAction::parse(&line) {
            Some(ConsoleAction::Stop) => break,
            Some(action) => handle_action(state, action).await,
            None => {}
        }
    }

    Ok(())
}

async fn handle_action(state: &ProxyState, action: ConsoleAction) {
    match action {
        ConsoleAction::Connect(player) => connect(state, player).await,
        ConsoleAction::Leave(name) => {
            let sessions = state.players().sessions_for(&name);
            if sessions.is_empty() {
                println!("{name} is not online");
            }
            for session in sessions {
                state.login().logout(session.session_id());
            }
        }
        ConsoleAction::Who => {
            let names = state.players().all_online_names();
            println!("Online ({}): {}", names.len(), names.join(", "));
        }
        ConsoleAction::Complete(partial) => {
            println!("{}", state.dispatcher().complete(&partial).join("  "));
        }
        ConsoleAction::Command(line) => {
            let reply = state.dispatcher().dispatch(CONSOLE_ADMIN, &line).await;
            print_reply(&reply);
        }
        ConsoleAction::Stop => {}
    }
}

/// Simulated login; the session lives until it is disconnected or leaves
async fn connect(state: &ProxyState, player: OnlinePlayer) {
    let (tx, mut rx) = mpsc::channel(4);
    let name = player.name.clone();

    match state.login().login(player, tx).await {
        Ok(session) => {
            println!("{name} joined");
            let session_id = session.session_id();
            drop(session);

            // Ends when the player is kicked or the session is dropped on leave
            let players = Arc::clone(state.players());
            tokio::spawn(async move {
                if let Some(SessionEvent::Disconnect { message }) = rx.recv().await {
                    println!("{name} was disconnected: {message}");
                }
                players.remove_session(session_id);
            });
        }
        Err(message) => println!("{name} was refused: {message}"),
    }
}

fn print_reply(reply: &CommandReply) {
    let marker = match reply.kind {
        ReplyKind::Success => "+",
        ReplyKind::Info => "*",
        ReplyKind::Error => "!",
    };
    for line in &reply.lines {
        println!("[{marker}] {line}");
    }
}
