//! Shift values: the raw request shape, the validated shift, its canonical key,
//! and the stored form carrying the caller's identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::day::DaySet;
use crate::error::{Result, ShiftError, ShiftField};
use crate::time::TimeOfDay;

/// An unvalidated shift as it arrives in a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShift {
    pub check_in: String,
    pub check_out: String,
    pub days: Vec<String>,
}

impl RawShift {
    pub fn new<S: AsRef<str>>(check_in: &str, check_out: &str, days: &[S]) -> Self {
        RawShift {
            check_in: check_in.to_string(),
            check_out: check_out.to_string(),
            days: days.iter().map(|d| d.as_ref().to_string()).collect(),
        }
    }
}

impl From<&Shift> for RawShift {
    fn from(shift: &Shift) -> Self {
        RawShift {
            check_in: shift.check_in.to_string(),
            check_out: shift.check_out.to_string(),
            days: shift.days.iter().map(|d| d.as_str().to_string()).collect(),
        }
    }
}

/// A partial edit of a stored shift: absent fields keep their stored value.
///
/// A full [`RawShift`] payload is also a valid patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShiftPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<String>>,
}

impl ShiftPatch {
    pub fn is_empty(&self) -> bool {
        self.check_in.is_none() && self.check_out.is_none() && self.days.is_none()
    }

    /// Fill the absent fields from `base`.
    pub fn merge(&self, base: &Shift) -> RawShift {
        let stored = RawShift::from(base);
        RawShift {
            check_in: self.check_in.clone().unwrap_or(stored.check_in),
            check_out: self.check_out.clone().unwrap_or(stored.check_out),
            days: self.days.clone().unwrap_or(stored.days),
        }
    }

    /// The patch as a full request shift, when every field is present.
    ///
    /// # Errors
    /// `MissingField` naming the first absent field.
    pub fn into_raw(self) -> Result<RawShift> {
        let missing = |field| ShiftError::MissingField { field };
        Ok(RawShift {
            check_in: self.check_in.ok_or_else(|| missing(ShiftField::CheckIn))?,
            check_out: self.check_out.ok_or_else(|| missing(ShiftField::CheckOut))?,
            days: self.days.ok_or_else(|| missing(ShiftField::Days))?,
        })
    }
}

impl From<RawShift> for ShiftPatch {
    fn from(raw: RawShift) -> Self {
        ShiftPatch {
            check_in: Some(raw.check_in),
            check_out: Some(raw.check_out),
            days: Some(raw.days),
        }
    }
}

/// A recurring weekly interval `[check_in, check_out)` on a set of weekdays.
///
/// A `Shift` always satisfies `check_in < check_out` and has a non-empty day
/// set. Grid and window rules depend on configuration and are applied by
/// [`crate::validate::validate_shift`].
///
/// The derived ordering (check-in, then check-out, then days) is the
/// canonical sort order used for set comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawShift")]
pub struct Shift {
    check_in: TimeOfDay,
    check_out: TimeOfDay,
    days: DaySet,
}

impl Shift {
    /// # Errors
    /// `EmptyDaySet` when `days` is empty, `CheckInNotBeforeCheckOut` when
    /// `check_out <= check_in`.
    pub fn new(check_in: TimeOfDay, check_out: TimeOfDay, days: DaySet) -> Result<Self> {
        if days.is_empty() {
            return Err(ShiftError::EmptyDaySet);
        }
        if check_out <= check_in {
            return Err(ShiftError::CheckInNotBeforeCheckOut {
                check_in,
                check_out,
            });
        }
        Ok(Shift {
            check_in,
            check_out,
            days,
        })
    }

    /// Parse textual fields without any configuration rules applied.
    pub fn parse<S: AsRef<str>>(check_in: &str, check_out: &str, days: &[S]) -> Result<Self> {
        let check_in = TimeOfDay::parse_field(check_in, ShiftField::CheckIn)?;
        let check_out = TimeOfDay::parse_field(check_out, ShiftField::CheckOut)?;
        let days = DaySet::parse(days)?;
        Shift::new(check_in, check_out, days)
    }

    pub fn check_in(&self) -> TimeOfDay {
        self.check_in
    }

    pub fn check_out(&self) -> TimeOfDay {
        self.check_out
    }

    pub fn days(&self) -> DaySet {
        self.days
    }

    /// Length of one occurrence, in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.check_out.minutes() - self.check_in.minutes()
    }

    pub fn key(&self) -> ShiftKey {
        ShiftKey(*self)
    }
}

impl TryFrom<RawShift> for Shift {
    type Error = ShiftError;

    fn try_from(raw: RawShift) -> Result<Self> {
        Shift::parse(&raw.check_in, &raw.check_out, raw.days.as_slice())
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} on {}", self.check_in, self.check_out, self.days)
    }
}

/// Canonical identity of a shift, rendered as `08:00|12:00|monday,wednesday`.
///
/// Two shifts have the same key iff they are duplicates: equal times and an
/// equal day set, regardless of how the days were ordered in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftKey(Shift);

impl ShiftKey {
    pub fn shift(&self) -> &Shift {
        &self.0
    }
}

impl From<ShiftKey> for Shift {
    fn from(key: ShiftKey) -> Self {
        key.0
    }
}

impl fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.0.check_in, self.0.check_out, self.0.days)
    }
}

impl FromStr for ShiftKey {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('|');
        let (Some(check_in), Some(check_out), Some(days), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ShiftError::InvalidSignature(s.to_string()));
        };
        let days: Vec<&str> = if days.is_empty() {
            Vec::new()
        } else {
            days.split(',').collect()
        };
        Shift::parse(check_in, check_out, days.as_slice()).map(ShiftKey)
    }
}

impl Serialize for ShiftKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShiftKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A shift the caller has already persisted, tagged with its storage id.
///
/// The engine never interprets `Id`; it only compares ids to skip the shift
/// under edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredShift<Id> {
    pub id: Id,
    #[serde(flatten)]
    pub shift: Shift,
}

impl<Id> StoredShift<Id> {
    pub fn new(id: Id, shift: Shift) -> Self {
        StoredShift { id, shift }
    }
}
