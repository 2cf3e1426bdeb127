//! # shift-engine
//!
//! Conflict detection and reconciliation for recurring weekly work shifts.
//!
//! A shift is a weekly interval (`checkIn`–`checkOut`) on a set of weekdays,
//! owned by one medic or assistant profile. Before storing shifts for an
//! owner, a service loads the owner's current shifts and asks the engine
//! whether the operation is valid. The engine is pure: it never touches
//! storage, never logs and never blocks.
//!
//! ```rust
//! use shift_engine::{OwnerRole, RawShift, ShiftEngine, StoredShift, Verdict};
//!
//! let engine = ShiftEngine::for_role(OwnerRole::Medic);
//! let existing = vec![StoredShift::new(
//!     1,
//!     engine.validate(&RawShift::new("08:00", "12:00", &["monday", "wednesday"])).unwrap(),
//! )];
//!
//! let clash = RawShift::new("10:00", "14:00", &["wednesday"]);
//! assert!(matches!(
//!     engine.check_create(&[clash], &existing),
//!     Verdict::OverlapConflict { .. }
//! ));
//!
//! let fine = RawShift::new("13:00", "17:00", &["tuesday"]);
//! assert_eq!(engine.check_create(&[fine], &existing), Verdict::Valid);
//! ```
//!
//! ## Modules
//!
//! - [`time`] — `HH:MM` parsing and minute-offset times of day
//! - [`day`] — weekday symbols and normalized day sets
//! - [`shift`] — raw, validated, keyed and stored shifts
//! - [`config`] — time grid, allowed windows, empty-set policy, role presets
//! - [`validate`] — single-shift validation pipeline
//! - [`conflict`] — duplicate and overlap detection
//! - [`reconcile`] — add/remove delta between desired and stored sets
//! - [`equality`] — order-insensitive whole-set comparison
//! - [`engine`] — verdicts for create, update, patch, replace and remove
//! - [`booking`] — appointments against working hours and other bookings
//! - [`error`] — Error types

pub mod booking;
pub mod config;
pub mod conflict;
pub mod day;
pub mod engine;
pub mod equality;
pub mod error;
pub mod reconcile;
pub mod shift;
pub mod time;
pub mod validate;

pub use booking::{check_booking, Appointment, Booking, BookingVerdict};
pub use config::{ConfigOverrides, EmptySetPolicy, EngineConfig, OwnerRole, TimeWindow};
pub use conflict::{
    find_conflicts, find_duplicate, find_overlap, has_duplicates, has_overlaps, overlaps,
};
pub use day::{Day, DaySet};
pub use engine::{ReplacePlan, ShiftEngine, ShiftRef, Verdict};
pub use equality::shift_sets_equal;
pub use error::{ShiftError, ShiftField};
pub use reconcile::{reconcile, Reconciliation};
pub use shift::{RawShift, Shift, ShiftKey, ShiftPatch, StoredShift};
pub use time::TimeOfDay;
pub use validate::validate_shift;
