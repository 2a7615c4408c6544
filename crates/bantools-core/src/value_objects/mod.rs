//! Value objects - immutable types that represent domain concepts

mod duration;
mod identity;
mod player_name;

pub use duration::{
    format_instant, format_remaining, parse_ban_duration, BanDuration, DurationFallback,
    ParsedDuration, FALLBACK_BAN_DAYS, MAX_BAN_DAYS, PERMANENT_KEYWORD,
};
pub use identity::PlayerIdentity;
pub use player_name::{name_key, PlayerName};
