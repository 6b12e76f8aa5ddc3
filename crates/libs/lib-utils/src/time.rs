//! # Time Utilities
//!
//! Utilities for time formatting and TTL parsing using chrono.

use chrono::{DateTime, Duration, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Parse a time-to-live expression into a [`Duration`].
///
/// Accepts a bare number of seconds (`"3600"`) or a number followed by a
/// single unit: `s`, `m`, `h`, `d` or `w` (`"15m"`, `"1h"`, `"7d"`).
/// The value must be strictly positive.
pub fn parse_ttl(ttl: &str) -> Result<Duration, Error> {
    let ttl = ttl.trim();
    let err = || Error::FailToTtlParse(ttl.to_string());

    let split = ttl
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(ttl.len());
    let (amount, unit) = ttl.split_at(split);

    let amount: i64 = amount.parse().map_err(|_| err())?;
    if amount <= 0 {
        return Err(err());
    }

    let seconds_per_unit = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 60 * 60 * 24,
        "w" => 60 * 60 * 24 * 7,
        _ => return Err(err()),
    };

    amount
        .checked_mul(seconds_per_unit)
        .and_then(Duration::try_seconds)
        .ok_or_else(err)
}

// region:    --- Error
#[derive(Debug, PartialEq)]
pub enum Error {
    FailToTtlParse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
