//! Tab completion for admin commands

use bantools_service::{BanEngine, Whitelist};

use super::parser::SUBCOMMANDS;

pub const REASON_SUGGESTIONS: [&str; 5] = [
    "Violation of server rules",
    "Cheating",
    "Griefing",
    "AFK",
    "Inappropriate language",
];

pub const DURATION_SUGGESTIONS: [&str; 5] = ["1d", "3d", "7d", "30d", "permanent"];

/// Completions for the last argument in `args`
///
/// `args` excludes the root command; the last element is the partial word
/// being typed and may be empty.
pub fn suggest(engine: &BanEngine, whitelist: &Whitelist, args: &[&str]) -> Vec<String> {
    let (sub, position) = match args {
        [] => return starting_with(SUBCOMMANDS, ""),
        [partial] => return starting_with(SUBCOMMANDS, partial),
        [sub, ..] => (sub.to_ascii_lowercase(), args.len()),
    };
    let partial = args.last().copied().unwrap_or_default();

    match (sub.as_str(), position) {
        ("ban" | "softban" | "fakeban" | "kick", 2) => engine
            .sessions()
            .all_online_names()
            .into_iter()
            .filter(|name| has_prefix(name, partial))
            .filter(|name| !whitelist.is_whitelisted(name))
            .collect(),
        ("ban" | "softban" | "fakeban" | "kick", 3) => {
            REASON_SUGGESTIONS.iter().map(ToString::to_string).collect()
        }
        ("ban", 4) => starting_with(DURATION_SUGGESTIONS, partial),
        ("unban", 2) => filter_names(engine.list_active_bans(), partial),
        ("unsoftban" | "unfakeban", 2) => filter_names(engine.list_active_soft_bans(), partial),
        ("list", 2) => starting_with(["bans", "softbans"], partial),
        ("whitelist", 2) => starting_with(["list", "add", "remove"], partial),
        ("whitelist", 3) if args[1].eq_ignore_ascii_case("remove") => {
            filter_names(whitelist.players(), partial)
        }
        _ => Vec::new(),
    }
}

fn starting_with<const N: usize>(options: [&str; N], partial: &str) -> Vec<String> {
    options
        .iter()
        .filter(|option| has_prefix(option, partial))
        .map(ToString::to_string)
        .collect()
}

fn filter_names(names: Vec<String>, partial: &str) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| has_prefix(name, partial))
        .collect()
}

fn has_prefix(candidate: &str, partial: &str) -> bool {
    candidate
        .to_ascii_lowercase()
        .starts_with(&partial.to_ascii_lowercase())
}
