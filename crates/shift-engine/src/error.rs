//! Error types for shift-engine operations.

use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::config::TimeWindow;
use crate::time::TimeOfDay;

/// The shift field an input error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftField {
    CheckIn,
    CheckOut,
    Days,
}

impl ShiftField {
    /// Wire name of the field, as it appears in request payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftField::CheckIn => "checkIn",
            ShiftField::CheckOut => "checkOut",
            ShiftField::Days => "days",
        }
    }
}

impl fmt::Display for ShiftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShiftError {
    /// Not `HH:MM`, or minutes off the configured grid.
    #[error("{field} has an invalid time format: '{value}'")]
    InvalidTimeFormat { field: ShiftField, value: String },

    /// A time outside any shift field, such as a config window bound.
    #[error("Invalid time: '{0}' (expected HH:MM)")]
    InvalidTime(String),

    /// A patch left a field empty and there is no stored shift to fill it from.
    #[error("{field} is required")]
    MissingField { field: ShiftField },

    #[error("Invalid day: '{0}' (expected monday through sunday)")]
    InvalidDay(String),

    #[error("{field} {time} is outside the allowed window {window}")]
    InvalidTimeRange {
        field: ShiftField,
        time: TimeOfDay,
        window: TimeWindow,
    },

    #[error("checkIn must be earlier than checkOut (got {check_in} - {check_out})")]
    CheckInNotBeforeCheckOut {
        check_in: TimeOfDay,
        check_out: TimeOfDay,
    },

    #[error("days must contain at least one weekday")]
    EmptyDaySet,

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Appointment must start before it ends (got {start} - {end})")]
    InvalidAppointment {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Invalid shift signature: '{0}'")]
    InvalidSignature(String),
}

impl ShiftError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ShiftError::InvalidTimeFormat { .. } => "invalidTimeFormat",
            ShiftError::InvalidTime(_) => "invalidTime",
            ShiftError::MissingField { .. } => "missingField",
            ShiftError::InvalidDay(_) => "invalidDay",
            ShiftError::InvalidTimeRange { .. } => "invalidTimeRange",
            ShiftError::CheckInNotBeforeCheckOut { .. } => "checkInNotBeforeCheckOut",
            ShiftError::EmptyDaySet => "emptyDaySet",
            ShiftError::InvalidConfig(_) => "invalidConfig",
            ShiftError::InvalidAppointment { .. } => "invalidAppointment",
            ShiftError::InvalidSignature(_) => "invalidSignature",
        }
    }

    /// The offending request field, when the error is about one.
    pub fn field(&self) -> Option<ShiftField> {
        match self {
            ShiftError::InvalidTimeFormat { field, .. }
            | ShiftError::InvalidTimeRange { field, .. }
            | ShiftError::MissingField { field } => Some(*field),
            ShiftError::CheckInNotBeforeCheckOut { .. } => Some(ShiftField::CheckOut),
            ShiftError::InvalidDay(_) | ShiftError::EmptyDaySet => Some(ShiftField::Days),
            _ => None,
        }
    }
}

/// Serialized as `{ "kind", "field", "message" }` for JSON boundaries.
impl Serialize for ShiftError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ShiftError", 3)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("field", &self.field().map(ShiftField::as_str))?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

pub type Result<T> = std::result::Result<T, ShiftError>;
