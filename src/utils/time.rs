//! Time-to-live values.
//!
//! A time-to-live is written as `<integer><unit>`, e.g. `30s`, `10 minutes`
//! or `2h`. The unit is kept alongside the value so a parsed setting prints
//! back the way it was configured.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::error::TimeParseError;

/// Unit of a [`TimeToLive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    /// Resolve a unit name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let unit = match name.to_ascii_lowercase().as_str() {
            "ns" | "nanos" | "nanosecond" | "nanoseconds" => Self::Nanoseconds,
            "us" | "micros" | "microsecond" | "microseconds" => Self::Microseconds,
            "ms" | "millis" | "millisecond" | "milliseconds" => Self::Milliseconds,
            "s" | "sec" | "secs" | "second" | "seconds" => Self::Seconds,
            "m" | "min" | "mins" | "minute" | "minutes" => Self::Minutes,
            "h" | "hr" | "hrs" | "hour" | "hours" => Self::Hours,
            "d" | "day" | "days" => Self::Days,
            "w" | "week" | "weeks" => Self::Weeks,
            _ => return None,
        };
        Some(unit)
    }

    /// Short suffix used when printing.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Microseconds => "us",
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
            Self::Minutes => "m",
            Self::Hours => "h",
            Self::Days => "d",
            Self::Weeks => "w",
        }
    }

    /// Nanoseconds in one unit.
    fn nanos(self) -> u128 {
        const SEC: u128 = 1_000_000_000;
        match self {
            Self::Nanoseconds => 1,
            Self::Microseconds => 1_000,
            Self::Milliseconds => 1_000_000,
            Self::Seconds => SEC,
            Self::Minutes => 60 * SEC,
            Self::Hours => 3_600 * SEC,
            Self::Days => 86_400 * SEC,
            Self::Weeks => 604_800 * SEC,
        }
    }
}

/// A time-to-live expressed as a value and a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeToLive {
    value: u64,
    unit: TimeUnit,
}

impl TimeToLive {
    /// Create a time-to-live, rejecting values that do not fit a [`Duration`].
    pub fn new(value: u64, unit: TimeUnit) -> Result<Self, TimeParseError> {
        let ttl = Self { value, unit };
        let nanos = u128::from(value) * unit.nanos();
        if nanos / 1_000_000_000 > u128::from(u64::MAX) {
            return Err(TimeParseError::Overflow(ttl.to_string()));
        }
        Ok(ttl)
    }

    pub const fn seconds(value: u32) -> Self {
        Self {
            value: value as u64,
            unit: TimeUnit::Seconds,
        }
    }

    pub const fn minutes(value: u32) -> Self {
        Self {
            value: value as u64,
            unit: TimeUnit::Minutes,
        }
    }

    pub const fn hours(value: u32) -> Self {
        Self {
            value: value as u64,
            unit: TimeUnit::Hours,
        }
    }

    pub const fn days(value: u32) -> Self {
        Self {
            value: value as u64,
            unit: TimeUnit::Days,
        }
    }

    /// Parse a time-to-live string (e.g., "30s", "10 minutes", "2h").
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TimeParseError::Empty);
        }

        let split = input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(input.len());
        let (digits, unit) = input.split_at(split);
        if digits.is_empty() {
            return Err(TimeParseError::MissingValue(input.to_string()));
        }

        let value: u64 = digits
            .parse()
            .map_err(|_| TimeParseError::InvalidValue(digits.to_string()))?;

        let unit = unit.trim();
        let unit =
            TimeUnit::from_name(unit).ok_or_else(|| TimeParseError::UnknownUnit(unit.to_string()))?;

        Self::new(value, unit)
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Convert to a [`Duration`].
    pub fn as_duration(&self) -> Duration {
        let nanos = u128::from(self.value) * self.unit.nanos();
        let secs = (nanos / 1_000_000_000) as u64;
        let subsec = (nanos % 1_000_000_000) as u32;
        Duration::new(secs, subsec)
    }
}

impl fmt::Display for TimeToLive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for TimeToLive {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeToLive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
