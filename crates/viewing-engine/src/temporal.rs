//! Timestamp parsing and human-readable formatting.
//!
//! Appointment snapshots arrive as RFC 3339 strings and are compared as UTC
//! instants. Calendar-day bucketing and user-facing text happen in a caller
//! supplied IANA timezone, since "the same day" depends on where the agent is.
//! Nothing here reads the system clock.
//!
//! # Functions
//!
//! - [`parse_rfc3339`] — Parse an RFC 3339 timestamp into a UTC instant
//! - [`parse_timezone`] — Parse an IANA timezone name
//! - [`parse_gap`] — Parse a short duration such as `"30m"` or `"1h15m"`
//! - [`local_day`] — The calendar date of an instant in a timezone
//! - [`format_local_range`] — Render an interval for a conflict message
//! - [`format_minutes`] — Render a minute count as "3 hours, 25 minutes"

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::ViewingError;
use crate::interval::TimeInterval;

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse an RFC 3339 datetime string into `DateTime<Utc>`.
///
/// # Errors
///
/// Returns [`ViewingError::InvalidDatetime`] if the string cannot be parsed.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, ViewingError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ViewingError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone string into `Tz`.
///
/// # Errors
///
/// Returns [`ViewingError::InvalidTimezone`] for unknown names.
pub fn parse_timezone(s: &str) -> Result<Tz, ViewingError> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| ViewingError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse a non-negative gap length.
///
/// Accepts `h`, `m` and `s` components (`"30m"`, `"1h15m"`, `"90s"`). A bare
/// number is read as minutes.
///
/// # Errors
///
/// Returns [`ViewingError::InvalidDuration`] for empty input, unknown units,
/// a unit with no number in front of it, or a total too large for `Duration`.
pub fn parse_gap(s: &str) -> Result<Duration, ViewingError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ViewingError::InvalidDuration("empty duration".to_string()));
    }

    if let Ok(minutes) = s.parse::<i64>() {
        if minutes < 0 {
            return Err(ViewingError::InvalidDuration(format!(
                "gap must not be negative: '{s}'"
            )));
        }
        return Duration::try_minutes(minutes).ok_or_else(|| too_long(s));
    }

    let mut total_seconds = 0i64;
    let mut num_buf = String::new();

    for ch in s.chars() {
        if ch.is_ascii_digit() {
            num_buf.push(ch);
            continue;
        }
        if num_buf.is_empty() {
            return Err(ViewingError::InvalidDuration(format!(
                "expected number before '{ch}' in '{s}'"
            )));
        }
        let n: i64 = num_buf
            .parse()
            .map_err(|_| ViewingError::InvalidDuration(format!("invalid number in '{s}'")))?;
        num_buf.clear();

        let unit_seconds = match ch {
            'h' | 'H' => 3600,
            'm' | 'M' => 60,
            's' | 'S' => 1,
            _ => {
                return Err(ViewingError::InvalidDuration(format!(
                    "unknown unit '{ch}' in '{s}'"
                )));
            }
        };
        total_seconds = n
            .checked_mul(unit_seconds)
            .and_then(|secs| total_seconds.checked_add(secs))
            .ok_or_else(|| too_long(s))?;
    }

    if !num_buf.is_empty() {
        return Err(ViewingError::InvalidDuration(format!(
            "number without unit at end of '{s}'"
        )));
    }

    Duration::try_seconds(total_seconds).ok_or_else(|| too_long(s))
}

fn too_long(s: &str) -> ViewingError {
    ViewingError::InvalidDuration(format!("gap out of range: '{s}'"))
}

// ── Calendar days ───────────────────────────────────────────────────────────

/// The local calendar date of `instant` in `tz`.
pub fn local_day(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

// ── Formatting ──────────────────────────────────────────────────────────────

/// Render an interval in `tz` as `"2026-03-16 10:00 - 10:35"`.
///
/// The end carries its own date only when it falls on a different local day.
pub fn format_local_range(interval: &TimeInterval, tz: &Tz) -> String {
    let start = interval.start.with_timezone(tz);
    let end = interval.end.with_timezone(tz);
    if start.date_naive() == end.date_naive() {
        format!("{} - {}", start.format("%Y-%m-%d %H:%M"), end.format("%H:%M"))
    } else {
        format!(
            "{} - {}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Render a minute count as `"1 day, 2 hours, 5 minutes"`.
///
/// The sign is dropped; zero renders as `"0 minutes"`.
pub fn format_minutes(total: i64) -> String {
    let span = Duration::try_minutes(total.saturating_abs()).unwrap_or(Duration::MAX);
    let components = [
        (span.num_days(), "day"),
        (span.num_hours() % 24, "hour"),
        (span.num_minutes() % 60, "minute"),
    ];

    let parts: Vec<String> = components
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{n} {unit}{}", if *n == 1 { "" } else { "s" }))
        .collect();
    if parts.is_empty() {
        return "0 minutes".to_string();
    }
    parts.join(", ")
}
