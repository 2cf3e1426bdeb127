//! Single-shift validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. format: both times are `HH:MM` on the configured grid, every day is known
//! 2. field rules: the day set is non-empty, each time sits in its window
//! 3. cross-field: check-out is strictly after check-in

use crate::config::{EngineConfig, TimeWindow};
use crate::day::DaySet;
use crate::error::{Result, ShiftError, ShiftField};
use crate::shift::{RawShift, Shift};
use crate::time::TimeOfDay;

/// Validate one request shift against `config`, producing a normalized [`Shift`].
///
/// # Errors
/// `InvalidTimeFormat`, `InvalidDay`, `EmptyDaySet`, `InvalidTimeRange` or
/// `CheckInNotBeforeCheckOut`, whichever the pipeline hits first.
pub fn validate_shift(raw: &RawShift, config: &EngineConfig) -> Result<Shift> {
    let check_in = parse_on_grid(&raw.check_in, ShiftField::CheckIn, config.time_grid_minutes)?;
    let check_out = parse_on_grid(&raw.check_out, ShiftField::CheckOut, config.time_grid_minutes)?;
    let days = DaySet::parse(raw.days.as_slice())?;

    if days.is_empty() {
        return Err(ShiftError::EmptyDaySet);
    }
    check_window(check_in, ShiftField::CheckIn, config.check_in_window)?;
    check_window(check_out, ShiftField::CheckOut, config.check_out_window)?;

    Shift::new(check_in, check_out, days)
}

/// Validate every shift of a batch.
///
/// On failure returns the index of the first invalid shift with its reason.
pub fn validate_batch(
    raws: &[RawShift],
    config: &EngineConfig,
) -> std::result::Result<Vec<Shift>, (usize, ShiftError)> {
    raws.iter()
        .enumerate()
        .map(|(i, raw)| validate_shift(raw, config).map_err(|e| (i, e)))
        .collect()
}

fn parse_on_grid(value: &str, field: ShiftField, grid_minutes: u16) -> Result<TimeOfDay> {
    let time = TimeOfDay::parse_field(value, field)?;
    if !time.is_on_grid(grid_minutes) {
        return Err(ShiftError::InvalidTimeFormat {
            field,
            value: value.to_string(),
        });
    }
    Ok(time)
}

fn check_window(time: TimeOfDay, field: ShiftField, window: TimeWindow) -> Result<()> {
    if window.contains(time) {
        Ok(())
    } else {
        Err(ShiftError::InvalidTimeRange {
            field,
            time,
            window,
        })
    }
}
