//! Admin command dispatcher
//!
//! Runs parsed commands against the engine and turns every outcome into a
//! reply for the administrator. Rejections carry the error's own message.

use bantools_common::AppConfig;
use bantools_service::{BanEngine, ServiceError, SoftBanStep, Whitelist};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::parser::{
    help_lines, parse_command, split_line, AdminCommand, ListTarget, ParseError, WhitelistAction,
};
use super::suggest::suggest;

/// Tone of a reply, mapped to a colour by chat front-ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Success,
    Info,
    Error,
}

/// Lines sent back to the administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub kind: ReplyKind,
    pub lines: Vec<String>,
}

impl CommandReply {
    pub fn success(line: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Success,
            lines: vec![line.into()],
        }
    }

    pub fn info(line: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Info,
            lines: vec![line.into()],
        }
    }

    pub fn error(line: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Error,
            lines: vec![line.into()],
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == ReplyKind::Success
    }

    /// First line, empty when there is none
    pub fn text(&self) -> &str {
        self.lines.first().map_or("", String::as_str)
    }
}

impl From<ServiceError> for CommandReply {
    fn from(err: ServiceError) -> Self {
        if !err.is_rejection() {
            error!(error = %err, code = err.error_code(), "Command failed");
        }
        Self::error(err.to_string())
    }
}

impl From<ParseError> for CommandReply {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Usage(usage) => Self::error(usage),
            ParseError::UnknownCommand(_) => Self {
                kind: ReplyKind::Error,
                lines: help_lines(),
            },
        }
    }
}

/// Entry point for `bt` commands from the console or in-game admins
pub struct CommandDispatcher {
    engine: Arc<BanEngine>,
    whitelist: Arc<Whitelist>,
    config_path: PathBuf,
}

impl CommandDispatcher {
    pub fn new(engine: Arc<BanEngine>, whitelist: Arc<Whitelist>, config_path: PathBuf) -> Self {
        Self {
            engine,
            whitelist,
            config_path,
        }
    }

    /// Parse and run one command line on behalf of `admin`
    pub async fn dispatch(&self, admin: &str, line: &str) -> CommandReply {
        match parse_command(&split_line(line)) {
            Ok(command) => self.execute(admin, command).await,
            Err(e) => e.into(),
        }
    }

    /// Completions for a partially typed line
    pub fn complete(&self, line: &str) -> Vec<String> {
        let mut args = split_line(line);
        if line.ends_with(char::is_whitespace) {
            args.push("");
        }
        suggest(&self.engine, &self.whitelist, &args)
    }

    pub async fn execute(&self, admin: &str, command: AdminCommand) -> CommandReply {
        info!(admin, command = ?command, "Admin command");

        match command {
            AdminCommand::Ban {
                player,
                reason,
                duration,
            } => match self
                .engine
                .ban(&player, reason.as_deref(), duration.as_deref())
                .await
            {
                Ok(record) => CommandReply::success(format!("Successfully banned player: {}", record.name)),
                Err(e) => e.into(),
            },
            AdminCommand::Unban { player } => match self.engine.unban(&player).await {
                Ok(record) => CommandReply::success(format!("Player unbanned: {}", record.name)),
                Err(e) => e.into(),
            },
            AdminCommand::SoftBan { player, reason } => {
                match self
                    .engine
                    .soft_ban_step(admin, &player, reason.as_deref())
                    .await
                {
                    Ok(step @ SoftBanStep::Executed { .. }) => CommandReply::success(step.message()),
                    Ok(step) => CommandReply::info(step.message()),
                    Err(e) => e.into(),
                }
            }
            AdminCommand::RemoveSoftBan { player } => {
                match self.engine.remove_soft_ban(&player).await {
                    Ok(record) => CommandReply::success(format!(
                        "Successfully removed temporary ban: {}",
                        record.name
                    )),
                    Err(e) => e.into(),
                }
            }
            AdminCommand::Kick { player, reason } => {
                match self.engine.kick(&player, reason.as_deref()) {
                    Ok(0) => CommandReply::info(format!("Player is not online: {player}")),
                    Ok(_) => CommandReply::success(format!("Successfully kicked player: {player}")),
                    Err(e) => e.into(),
                }
            }
            AdminCommand::List(target) => self.list(target),
            AdminCommand::Whitelist(action) => self.whitelist_action(action),
            AdminCommand::Reload => self.reload().await,
            AdminCommand::Help => CommandReply {
                kind: ReplyKind::Info,
                lines: help_lines(),
            },
        }
    }

    fn list(&self, target: ListTarget) -> CommandReply {
        let mut lines = Vec::new();
        if matches!(target, ListTarget::All | ListTarget::Bans) {
            lines.push(summary_line("Active bans", &self.engine.list_active_bans()));
        }
        if matches!(target, ListTarget::All | ListTarget::SoftBans) {
            lines.push(summary_line(
                "Active temporary bans",
                &self.engine.list_active_soft_bans(),
            ));
        }
        CommandReply {
            kind: ReplyKind::Info,
            lines,
        }
    }

    fn whitelist_action(&self, action: WhitelistAction) -> CommandReply {
        match action {
            WhitelistAction::List => {
                let mut reply = CommandReply::info(summary_line(
                    "Protected players",
                    &self.whitelist.players(),
                ));
                if !self.whitelist.is_enabled() {
                    reply.lines.push("Whitelist protection is disabled".to_string());
                }
                reply
            }
            WhitelistAction::Add(player) => {
                if self.whitelist.add(&player) {
                    CommandReply::success(format!("Added to whitelist: {player}"))
                } else {
                    CommandReply::error(format!("Already whitelisted: {player}"))
                }
            }
            WhitelistAction::Remove(player) => {
                if self.whitelist.remove(&player) {
                    CommandReply::success(format!("Removed from whitelist: {player}"))
                } else {
                    CommandReply::error(format!("Not on the whitelist: {player}"))
                }
            }
        }
    }

    /// Re-read configuration and the ban file
    ///
    /// Default reasons and soft-ban timings are fixed at startup; reload
    /// refreshes the whitelist and the stored records.
    async fn reload(&self) -> CommandReply {
        let config = match AppConfig::load_from(&self.config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %self.config_path.display(), error = %e, "Reload rejected");
                return CommandReply::error(format!("Configuration not reloaded: {e}"));
            }
        };
        self.whitelist.reload(&config.whitelist);

        match self.engine.reload().await {
            Ok((bans, soft_bans)) => CommandReply::success(format!(
                "Configuration reloaded ({bans} bans, {soft_bans} temporary bans active)"
            )),
            Err(e) => e.into(),
        }
    }

    pub fn engine(&self) -> &Arc<BanEngine> {
        &self.engine
    }

    pub fn whitelist(&self) -> &Arc<Whitelist> {
        &self.whitelist
    }
}

fn summary_line(label: &str, names: &[String]) -> String {
    if names.is_empty() {
        format!("{label}: none")
    } else {
        format!("{label} ({}): {}", names.len(), names.join(", "))
    }
}
