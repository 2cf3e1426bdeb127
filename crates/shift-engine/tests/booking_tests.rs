//! Tests for booking appointments against working hours and other bookings.

use chrono::NaiveDateTime;
use shift_engine::booking::{covering_shift, find_clash};
use shift_engine::{check_booking, Appointment, Booking, BookingVerdict, Shift, ShiftError};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn dt(s: &str) -> NaiveDateTime {
    s.parse().unwrap()
}

/// 2026-03-16 is a Monday.
fn appt(start: &str, end: &str) -> Appointment {
    Appointment::new(dt(start), dt(end)).unwrap()
}

fn shift(check_in: &str, check_out: &str, days: &[&str]) -> Shift {
    Shift::parse(check_in, check_out, days).unwrap()
}

fn booking(id: u32, start: &str, end: &str) -> Booking<u32> {
    Booking {
        id,
        appointment: appt(start, end),
    }
}

fn hours() -> Vec<Shift> {
    vec![
        shift("08:00", "12:00", &["monday", "wednesday"]),
        shift("14:00", "18:00", &["tuesday"]),
    ]
}

// ── Appointment ─────────────────────────────────────────────────────────────

#[test]
fn appointment_must_start_before_end() {
    let err = Appointment::new(dt("2026-03-16T10:00:00"), dt("2026-03-16T10:00:00")).unwrap_err();
    assert!(matches!(err, ShiftError::InvalidAppointment { .. }));
}

#[test]
fn appointment_json_is_validated() {
    let ok: Appointment =
        serde_json::from_str(r#"{"start":"2026-03-16T09:00:00","end":"2026-03-16T09:30:00"}"#)
            .unwrap();
    assert_eq!(ok.start(), dt("2026-03-16T09:00:00"));

    let reversed = serde_json::from_str::<Appointment>(
        r#"{"start":"2026-03-16T10:00:00","end":"2026-03-16T09:30:00"}"#,
    );
    assert!(reversed.is_err());
}

// ── Working hours ───────────────────────────────────────────────────────────

#[test]
fn appointment_inside_shift_is_covered() {
    let a = appt("2026-03-16T09:00:00", "2026-03-16T09:30:00");
    assert_eq!(covering_shift(&a, &hours()), Some(&hours()[0]));
}

#[test]
fn appointment_filling_whole_shift_is_covered() {
    let a = appt("2026-03-16T08:00:00", "2026-03-16T12:00:00");
    assert!(covering_shift(&a, &hours()).is_some());
}

#[test]
fn appointment_past_check_out_is_not_covered() {
    let a = appt("2026-03-16T11:30:00", "2026-03-16T12:01:00");
    assert!(covering_shift(&a, &hours()).is_none());

    let seconds_over = appt("2026-03-16T11:30:00", "2026-03-16T12:00:30");
    assert!(covering_shift(&seconds_over, &hours()).is_none());
}

#[test]
fn appointment_on_wrong_weekday_is_not_covered() {
    // 2026-03-17 is a Tuesday: tuesday hours are 14:00-18:00.
    let morning = appt("2026-03-17T09:00:00", "2026-03-17T09:30:00");
    assert!(covering_shift(&morning, &hours()).is_none());

    let afternoon = appt("2026-03-17T15:00:00", "2026-03-17T15:30:00");
    assert_eq!(covering_shift(&afternoon, &hours()), Some(&hours()[1]));
}

#[test]
fn appointment_across_midnight_is_never_covered() {
    let all_day = vec![shift("00:00", "23:59", &["monday", "tuesday"])];
    let a = appt("2026-03-16T23:30:00", "2026-03-17T00:30:00");
    assert!(covering_shift(&a, &all_day).is_none());
}

// ── Clashes ─────────────────────────────────────────────────────────────────

#[test]
fn touching_bookings_do_not_clash() {
    let booked = vec![booking(1, "2026-03-16T09:00:00", "2026-03-16T09:30:00")];
    let next = appt("2026-03-16T09:30:00", "2026-03-16T10:00:00");

    assert!(find_clash(&next, &booked, None).is_none());
}

#[test]
fn overlapping_booking_clashes_unless_excluded() {
    let booked = vec![booking(1, "2026-03-16T09:00:00", "2026-03-16T10:00:00")];
    let moved = appt("2026-03-16T09:30:00", "2026-03-16T10:30:00");

    assert_eq!(find_clash(&moved, &booked, None).map(|b| b.id), Some(1));
    assert!(find_clash(&moved, &booked, Some(&1)).is_none());
}

// ── Verdict ─────────────────────────────────────────────────────────────────

#[test]
fn check_booking_verdicts() {
    let booked = vec![booking(1, "2026-03-16T09:00:00", "2026-03-16T10:00:00")];

    let free = appt("2026-03-16T10:00:00", "2026-03-16T10:30:00");
    let verdict = check_booking(&free, &hours(), &booked, None);
    assert!(verdict.is_bookable());
    assert_eq!(verdict, BookingVerdict::Bookable { shift: hours()[0] });

    let clash = appt("2026-03-16T09:45:00", "2026-03-16T10:15:00");
    assert!(matches!(
        check_booking(&clash, &hours(), &booked, None),
        BookingVerdict::Clash { with } if with.id == 1
    ));

    let late = appt("2026-03-16T17:00:00", "2026-03-16T17:30:00");
    assert_eq!(
        check_booking(&late, &hours(), &booked, None),
        BookingVerdict::OutsideWorkingHours
    );
}

#[test]
fn working_hours_checked_before_clashes() {
    let booked = vec![booking(1, "2026-03-16T19:00:00", "2026-03-16T20:00:00")];
    let a = appt("2026-03-16T19:00:00", "2026-03-16T19:30:00");

    assert_eq!(
        check_booking(&a, &hours(), &booked, None),
        BookingVerdict::OutsideWorkingHours
    );
}
