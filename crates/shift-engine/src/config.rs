//! Engine configuration: time grid, allowed windows and empty-set policy.
//!
//! Medics and assistants use different grids (30 vs 15 minutes) and
//! different rules about clearing a schedule; [`EngineConfig::for_role`]
//! returns the preset for each.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftError};
use crate::time::TimeOfDay;

/// Inclusive bounds for a shift boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub min: TimeOfDay,
    pub max: TimeOfDay,
}

impl TimeWindow {
    pub fn contains(&self, t: TimeOfDay) -> bool {
        self.min <= t && t <= self.max
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// What to do when an operation would leave an owner with no shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptySetPolicy {
    /// An owner must always keep at least one shift.
    #[default]
    RejectEmptyResult,
    /// Submitting an empty schedule clears every stored shift.
    AllowBulkClear,
}

/// The kind of profile a shift set belongs to. Only used to pick a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerRole {
    Medic,
    Assistant,
}

impl FromStr for OwnerRole {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "medic" => Ok(OwnerRole::Medic),
            "assistant" => Ok(OwnerRole::Assistant),
            other => Err(ShiftError::InvalidConfig(format!(
                "unknown owner role '{}' (expected medic or assistant)",
                other
            ))),
        }
    }
}

const fn preset_time(hour: u16, minute: u16) -> TimeOfDay {
    match TimeOfDay::from_hm(hour, minute) {
        Some(t) => t,
        None => panic!("preset time out of range"),
    }
}

const PRESET_CHECK_IN: TimeWindow = TimeWindow {
    min: preset_time(6, 0),
    max: preset_time(19, 0),
};

const PRESET_CHECK_OUT: TimeWindow = TimeWindow {
    min: preset_time(7, 0),
    max: preset_time(20, 0),
};

/// Tunable rules the engine validates shifts against.
///
/// Deserializing an `EngineConfig` fills absent fields from the medic preset.
/// To layer a partial file over another role's preset, deserialize
/// [`ConfigOverrides`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Allowed minute granularity. Must be positive and divide 60.
    pub time_grid_minutes: u16,
    pub check_in_window: TimeWindow,
    pub check_out_window: TimeWindow,
    pub empty_set_policy: EmptySetPolicy,
}

impl EngineConfig {
    /// Preset for an owner role.
    ///
    /// | Role      | Grid | Check-in    | Check-out   | Empty set         |
    /// |-----------|------|-------------|-------------|-------------------|
    /// | medic     | 30   | 06:00-19:00 | 07:00-20:00 | reject            |
    /// | assistant | 15   | 06:00-19:00 | 07:00-20:00 | allow bulk clear  |
    pub fn for_role(role: OwnerRole) -> Self {
        match role {
            OwnerRole::Medic => EngineConfig {
                time_grid_minutes: 30,
                check_in_window: PRESET_CHECK_IN,
                check_out_window: PRESET_CHECK_OUT,
                empty_set_policy: EmptySetPolicy::RejectEmptyResult,
            },
            OwnerRole::Assistant => EngineConfig {
                time_grid_minutes: 15,
                check_in_window: PRESET_CHECK_IN,
                check_out_window: PRESET_CHECK_OUT,
                empty_set_policy: EmptySetPolicy::AllowBulkClear,
            },
        }
    }

    /// Check internal consistency of the configuration.
    ///
    /// # Errors
    /// Returns `ShiftError::InvalidConfig` when the grid is zero or does not
    /// divide an hour, or when a window has `min > max`.
    pub fn validate(&self) -> Result<()> {
        if self.time_grid_minutes == 0 || 60 % self.time_grid_minutes != 0 {
            return Err(ShiftError::InvalidConfig(format!(
                "timeGridMinutes must divide 60, got {}",
                self.time_grid_minutes
            )));
        }
        for (name, window) in [
            ("checkInWindow", &self.check_in_window),
            ("checkOutWindow", &self.check_out_window),
        ] {
            if window.min > window.max {
                return Err(ShiftError::InvalidConfig(format!(
                    "{} is inverted: {}",
                    name, window
                )));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::for_role(OwnerRole::Medic)
    }
}

/// A partial configuration applied on top of a role preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_grid_minutes: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_window: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_window: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_set_policy: Option<EmptySetPolicy>,
}

impl ConfigOverrides {
    /// `base` with every present field replaced. The result is not validated.
    pub fn apply(&self, base: EngineConfig) -> EngineConfig {
        EngineConfig {
            time_grid_minutes: self.time_grid_minutes.unwrap_or(base.time_grid_minutes),
            check_in_window: self.check_in_window.unwrap_or(base.check_in_window),
            check_out_window: self.check_out_window.unwrap_or(base.check_out_window),
            empty_set_policy: self.empty_set_policy.unwrap_or(base.empty_set_policy),
        }
    }
}
