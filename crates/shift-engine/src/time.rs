//! Time-of-day values with minute granularity.
//!
//! Shift boundaries are compared as integer minute offsets from midnight, so
//! `"08:00" < "12:30"` is a plain integer comparison rather than a string one.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ShiftError, ShiftField};

/// Minutes in a day. Valid offsets are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day, stored as minutes since midnight (0-1439).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from a minute offset. Returns `None` for offsets past 23:59.
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(TimeOfDay(minutes))
        } else {
            None
        }
    }

    /// Build from hour and minute. Returns `None` when either is out of range.
    pub const fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay(hour * 60 + minute))
        } else {
            None
        }
    }

    pub const fn minutes(self) -> u16 {
        self.0
    }

    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// True when the minute component is a multiple of `grid_minutes`.
    ///
    /// A grid of 30 admits `:00` and `:30`; a grid of 15 admits the quarters.
    pub fn is_on_grid(self, grid_minutes: u16) -> bool {
        grid_minutes != 0 && self.minute() % grid_minutes == 0
    }

    /// Parse a strict `HH:MM` 24-hour string.
    ///
    /// Exactly two digits on each side of the colon; no whitespace, no
    /// seconds. `field` is reported back in the error.
    pub fn parse_field(s: &str, field: ShiftField) -> Result<Self> {
        parse_hm(s).ok_or_else(|| ShiftError::InvalidTimeFormat {
            field,
            value: s.to_string(),
        })
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // Offsets are always < 1440, so the conversion cannot fail.
        NaiveTime::from_num_seconds_from_midnight_opt(u32::from(self.0) * 60, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Seconds and fractions are truncated.
    fn from(t: NaiveTime) -> Self {
        TimeOfDay((t.hour() * 60 + t.minute()) as u16)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hm(s).ok_or_else(|| ShiftError::InvalidTime(s.to_string()))
    }
}

fn parse_hm(s: &str) -> Option<TimeOfDay> {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digit = |b: u8| {
        if b.is_ascii_digit() {
            Some(u16::from(b - b'0'))
        } else {
            None
        }
    };

    let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
    let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;

    TimeOfDay::from_hm(hour, minute)
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts `"HH:MM"` strings and integer minute offsets.
impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TimeOfDayVisitor;

        impl Visitor<'_> for TimeOfDayVisitor {
            type Value = TimeOfDay;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an \"HH:MM\" string or a minute offset from midnight")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<TimeOfDay, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<TimeOfDay, E> {
                u16::try_from(v)
                    .ok()
                    .and_then(TimeOfDay::from_minutes)
                    .ok_or_else(|| E::custom(format!("minute offset {} is past 23:59", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<TimeOfDay, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("negative minute offset {}", v)))
                    .and_then(|v| self.visit_u64(v))
            }
        }

        deserializer.deserialize_any(TimeOfDayVisitor)
    }
}
