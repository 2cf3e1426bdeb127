//! Whole-set equality between two shift lists.

use crate::shift::Shift;

/// Render a shift list as a canonical string.
///
/// Shifts are sorted by key and joined with `;`, each as its
/// `checkIn|checkOut|days` signature with days in week order. Two lists with
/// the same signature describe the same schedule.
pub fn canonical_signature(shifts: &[Shift]) -> String {
    let mut keys: Vec<_> = shifts.iter().map(Shift::key).collect();
    keys.sort();
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// True when both lists describe the same schedule, ignoring list order and
/// the order days were given in.
pub fn shift_sets_equal(a: &[Shift], b: &[Shift]) -> bool {
    a.len() == b.len() && canonical_signature(a) == canonical_signature(b)
}
