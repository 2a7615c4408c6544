//! Admin command parsing
//!
//! Input is the argument list after the `bt` root command, split on
//! whitespace. Reasons for `softban` and `kick` take the rest of the line;
//! `ban` takes single-word reason and duration arguments.

use thiserror::Error;

pub const ROOT_COMMANDS: [&str; 2] = ["bt", "bantools"];

pub const SUBCOMMANDS: [&str; 9] = [
    "ban",
    "unban",
    "softban",
    "unsoftban",
    "kick",
    "list",
    "whitelist",
    "reload",
    "help",
];

pub const BAN_USAGE: &str = "Ban usage: bt ban <player> [reason] [duration]";
pub const UNBAN_USAGE: &str = "Unban usage: bt unban <player>";
pub const SOFT_BAN_USAGE: &str = "Temporary ban usage: bt softban <player> [reason]";
pub const UNSOFT_BAN_USAGE: &str = "Remove temporary ban usage: bt unsoftban <player>";
pub const KICK_USAGE: &str = "Kick usage: bt kick <player> [reason]";
pub const LIST_USAGE: &str = "List usage: bt list [bans|softbans]";
pub const WHITELIST_USAGE: &str = "Whitelist usage: bt whitelist [list|add <player>|remove <player>]";
pub const RELOAD_USAGE: &str = "bt reload - Reload configuration and ban records";

/// Which active records `list` shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    All,
    Bans,
    SoftBans,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhitelistAction {
    List,
    Add(String),
    Remove(String),
}

/// A parsed administrator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Ban {
        player: String,
        reason: Option<String>,
        duration: Option<String>,
    },
    Unban {
        player: String,
    },
    SoftBan {
        player: String,
        reason: Option<String>,
    },
    RemoveSoftBan {
        player: String,
    },
    Kick {
        player: String,
        reason: Option<String>,
    },
    List(ListTarget),
    Whitelist(WhitelistAction),
    Reload,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Known subcommand used with the wrong arguments
    #[error("{0}")]
    Usage(&'static str),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Split a console or chat line into arguments, dropping a leading `/`
/// and the root command if present
pub fn split_line(line: &str) -> Vec<&str> {
    let mut args: Vec<&str> = line.trim().trim_start_matches('/').split_whitespace().collect();
    if args
        .first()
        .is_some_and(|first| ROOT_COMMANDS.iter().any(|root| first.eq_ignore_ascii_case(root)))
    {
        args.remove(0);
    }
    args
}

/// Parse the arguments after the root command
pub fn parse_command(args: &[&str]) -> Result<AdminCommand, ParseError> {
    let Some((sub, rest)) = args.split_first() else {
        return Ok(AdminCommand::Help);
    };

    match sub.to_ascii_lowercase().as_str() {
        "ban" => match rest {
            [player, tail @ ..] => Ok(AdminCommand::Ban {
                player: (*player).to_string(),
                reason: tail.first().map(|r| (*r).to_string()),
                duration: tail.get(1).map(|d| (*d).to_string()),
            }),
            [] => Err(ParseError::Usage(BAN_USAGE)),
        },
        "unban" => single_player(rest, UNBAN_USAGE).map(|player| AdminCommand::Unban { player }),
        "softban" | "fakeban" => match rest {
            [player, tail @ ..] => Ok(AdminCommand::SoftBan {
                player: (*player).to_string(),
                reason: joined(tail),
            }),
            [] => Err(ParseError::Usage(SOFT_BAN_USAGE)),
        },
        "unsoftban" | "unfakeban" => single_player(rest, UNSOFT_BAN_USAGE)
            .map(|player| AdminCommand::RemoveSoftBan { player }),
        "kick" => match rest {
            [player, tail @ ..] => Ok(AdminCommand::Kick {
                player: (*player).to_string(),
                reason: joined(tail),
            }),
            [] => Err(ParseError::Usage(KICK_USAGE)),
        },
        "list" => match rest {
            [] => Ok(AdminCommand::List(ListTarget::All)),
            [target] => match target.to_ascii_lowercase().as_str() {
                "bans" => Ok(AdminCommand::List(ListTarget::Bans)),
                "softbans" | "fakebans" => Ok(AdminCommand::List(ListTarget::SoftBans)),
                _ => Err(ParseError::Usage(LIST_USAGE)),
            },
            _ => Err(ParseError::Usage(LIST_USAGE)),
        },
        "whitelist" => match rest {
            [] => Ok(AdminCommand::Whitelist(WhitelistAction::List)),
            [action] if action.eq_ignore_ascii_case("list") => {
                Ok(AdminCommand::Whitelist(WhitelistAction::List))
            }
            [action, player] if action.eq_ignore_ascii_case("add") => Ok(
                AdminCommand::Whitelist(WhitelistAction::Add((*player).to_string())),
            ),
            [action, player] if action.eq_ignore_ascii_case("remove") => Ok(
                AdminCommand::Whitelist(WhitelistAction::Remove((*player).to_string())),
            ),
            _ => Err(ParseError::Usage(WHITELIST_USAGE)),
        },
        "reload" => Ok(AdminCommand::Reload),
        "help" => Ok(AdminCommand::Help),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

/// Usage lines shown by `help`
pub fn help_lines() -> Vec<String> {
    [
        "BanTools usage",
        BAN_USAGE,
        UNBAN_USAGE,
        SOFT_BAN_USAGE,
        UNSOFT_BAN_USAGE,
        KICK_USAGE,
        LIST_USAGE,
        WHITELIST_USAGE,
        RELOAD_USAGE,
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn single_player(rest: &[&str], usage: &'static str) -> Result<String, ParseError> {
    match rest {
        [player] => Ok((*player).to_string()),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn joined(words: &[&str]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}
