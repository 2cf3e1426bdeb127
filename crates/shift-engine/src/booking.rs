//! Appointments booked against a medic's working hours.
//!
//! An appointment is bookable when one of the owner's shifts covers it (same
//! weekday, inside `[check_in, check_out)`) and it does not intersect another
//! booking of the same owner. Touching appointments do not clash.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::day::Day;
use crate::error::{Result, ShiftError};
use crate::shift::Shift;

/// A concrete appointment `[start, end)` in the clinic's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AppointmentSpan")]
pub struct Appointment {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct AppointmentSpan {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<AppointmentSpan> for Appointment {
    type Error = ShiftError;

    fn try_from(span: AppointmentSpan) -> Result<Self> {
        Appointment::new(span.start, span.end)
    }
}

impl Appointment {
    /// # Errors
    /// Returns `ShiftError::InvalidAppointment` unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(ShiftError::InvalidAppointment { start, end });
        }
        Ok(Appointment { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn overlaps(&self, other: &Appointment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An appointment already booked, tagged with its storage id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking<Id> {
    pub id: Id,
    #[serde(flatten)]
    pub appointment: Appointment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "camelCase")]
pub enum BookingVerdict<Id> {
    /// Inside `shift` and free of clashes.
    Bookable { shift: Shift },
    OutsideWorkingHours,
    Clash { with: Booking<Id> },
}

impl<Id> BookingVerdict<Id> {
    pub fn is_bookable(&self) -> bool {
        matches!(self, BookingVerdict::Bookable { .. })
    }
}

/// The first shift that fully covers `appointment`, if any.
///
/// Appointments spanning midnight are never covered. Seconds round outward:
/// an appointment ending at 12:00:30 needs a shift running past 12:00.
pub fn covering_shift<'a>(appointment: &Appointment, shifts: &'a [Shift]) -> Option<&'a Shift> {
    if appointment.start.date() != appointment.end.date() {
        return None;
    }

    let day = Day::from(appointment.start.weekday());
    let start_minute = appointment.start.num_seconds_from_midnight() / 60;
    let end_minute = appointment.end.num_seconds_from_midnight().div_ceil(60);

    shifts.iter().find(|shift| {
        shift.days().contains(day)
            && u32::from(shift.check_in().minutes()) <= start_minute
            && end_minute <= u32::from(shift.check_out().minutes())
    })
}

/// Find a booking that intersects `candidate`, skipping the one whose id is `exclude`.
pub fn find_clash<'a, Id: PartialEq>(
    candidate: &Appointment,
    bookings: &'a [Booking<Id>],
    exclude: Option<&Id>,
) -> Option<&'a Booking<Id>> {
    bookings
        .iter()
        .filter(|b| exclude != Some(&b.id))
        .find(|b| candidate.overlaps(&b.appointment))
}

/// Decide whether `candidate` can be booked for an owner with `shifts` and `bookings`.
///
/// Working hours are checked before clashes. `exclude` is the id of the
/// booking being rescheduled, if any.
pub fn check_booking<Id: PartialEq + Clone>(
    candidate: &Appointment,
    shifts: &[Shift],
    bookings: &[Booking<Id>],
    exclude: Option<&Id>,
) -> BookingVerdict<Id> {
    let Some(shift) = covering_shift(candidate, shifts) else {
        return BookingVerdict::OutsideWorkingHours;
    };

    match find_clash(candidate, bookings, exclude) {
        Some(booking) => BookingVerdict::Clash {
            with: booking.clone(),
        },
        None => BookingVerdict::Bookable { shift: *shift },
    }
}
