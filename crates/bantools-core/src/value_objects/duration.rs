//! Ban duration parsing and time formatting
//!
//! Accepted inputs:
//! - blank or `permanent` for a permanent ban
//! - `<n>d` for `n` days, 1 ≤ n ≤ 3650
//! - `<from>-<yyyy/mm/dd>`, an absolute end date after a dash
//!
//! Anything else resolves to a one-day ban. The fallback is reported through
//! [`ParsedDuration::fallback`] so callers can log it.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::fmt;

/// Longest accepted ban in days (ten years)
pub const MAX_BAN_DAYS: i64 = 3650;

/// Ban length applied when the input cannot be used
pub const FALLBACK_BAN_DAYS: i64 = 1;

/// Keyword for a permanent ban
pub const PERMANENT_KEYWORD: &str = "permanent";

const DATE_FORMAT: &str = "%Y/%m/%d";
const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M";

/// How long a ban lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanDuration {
    Permanent,
    Until(DateTime<Utc>),
}

impl BanDuration {
    /// End instant, `None` when permanent
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Permanent => None,
            Self::Until(at) => Some(*at),
        }
    }

    #[inline]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent)
    }
}

/// Why a duration input was replaced by the one-day fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationFallback {
    DaysOutOfRange(i64),
    MalformedDays(String),
    MalformedRange(String),
    InvalidDate(String),
    DateNotInFuture(String),
    Unrecognized(String),
}

impl fmt::Display for DurationFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DaysOutOfRange(days) => {
                write!(f, "{days} days is outside 1..={MAX_BAN_DAYS}")
            }
            Self::MalformedDays(raw) => write!(f, "cannot read day count from '{raw}'"),
            Self::MalformedRange(raw) => write!(f, "date range '{raw}' must have one dash"),
            Self::InvalidDate(raw) => write!(f, "'{raw}' is not a yyyy/mm/dd date"),
            Self::DateNotInFuture(raw) => write!(f, "end date '{raw}' is not in the future"),
            Self::Unrecognized(raw) => write!(f, "unrecognized duration '{raw}'"),
        }
    }
}

/// Result of parsing a duration input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDuration {
    pub duration: BanDuration,
    pub fallback: Option<DurationFallback>,
}

impl ParsedDuration {
    fn exact(duration: BanDuration) -> Self {
        Self {
            duration,
            fallback: None,
        }
    }

    fn fallback(now: DateTime<Utc>, reason: DurationFallback) -> Self {
        Self {
            duration: BanDuration::Until(now + Duration::days(FALLBACK_BAN_DAYS)),
            fallback: Some(reason),
        }
    }
}

/// Parse a ban duration relative to `now`
pub fn parse_ban_duration(input: Option<&str>, now: DateTime<Utc>) -> ParsedDuration {
    let raw = input.map(str::trim).unwrap_or_default();

    if raw.is_empty() || raw.eq_ignore_ascii_case(PERMANENT_KEYWORD) {
        return ParsedDuration::exact(BanDuration::Permanent);
    }

    if let Some(days) = raw.strip_suffix(['d', 'D']) {
        return match days.parse::<i64>() {
            Ok(days) if (1..=MAX_BAN_DAYS).contains(&days) => {
                ParsedDuration::exact(BanDuration::Until(now + Duration::days(days)))
            }
            Ok(days) => ParsedDuration::fallback(now, DurationFallback::DaysOutOfRange(days)),
            Err(_) => {
                ParsedDuration::fallback(now, DurationFallback::MalformedDays(raw.to_string()))
            }
        };
    }

    if raw.contains('-') {
        let parts: Vec<&str> = raw.split('-').collect();
        let [_, end] = parts.as_slice() else {
            return ParsedDuration::fallback(now, DurationFallback::MalformedRange(raw.to_string()));
        };
        let end = end.trim();
        return match parse_end_date(end) {
            Some(at) if at > now => ParsedDuration::exact(BanDuration::Until(at)),
            Some(_) => {
                ParsedDuration::fallback(now, DurationFallback::DateNotInFuture(end.to_string()))
            }
            None => ParsedDuration::fallback(now, DurationFallback::InvalidDate(end.to_string())),
        };
    }

    ParsedDuration::fallback(now, DurationFallback::Unrecognized(raw.to_string()))
}

/// Midnight UTC of a `yyyy/mm/dd` date
fn parse_end_date(raw: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Utc.from_local_datetime(&midnight).single()
}

/// Format an instant as `yyyy/MM/dd HH:mm` (UTC)
pub fn format_instant(at: DateTime<Utc>) -> String {
    at.format(DISPLAY_FORMAT).to_string()
}

/// Human-readable time left until `until`
pub fn format_remaining(until: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = until - now;
    if remaining <= Duration::zero() {
        return "Expired".to_string();
    }

    let total_minutes = remaining.num_minutes();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours} hours {minutes} minutes")
    } else {
        format!("{minutes} minutes")
    }
}
