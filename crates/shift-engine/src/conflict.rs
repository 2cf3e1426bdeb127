//! Detect duplicate and overlapping shifts.
//!
//! Two shifts overlap when they share at least one weekday and their time
//! ranges intersect: `a.check_in < b.check_out && b.check_in < a.check_out`.
//! Back-to-back shifts (one ends exactly when the other starts) are NOT
//! conflicts. Two shifts are duplicates when times and day sets are equal.

use std::collections::HashMap;

use serde::Serialize;

use crate::day::DaySet;
use crate::shift::{Shift, StoredShift};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    Duplicate,
    Overlap,
}

/// A detected conflict between a candidate shift and a stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftConflict<Id> {
    pub kind: ConflictKind,
    /// Position of the candidate in the list passed to [`find_conflicts`].
    pub candidate_index: usize,
    pub candidate: Shift,
    pub existing: StoredShift<Id>,
    /// Weekdays on which the two shifts collide.
    pub shared_days: DaySet,
    /// Minutes of intersection on each shared day.
    pub overlap_minutes: u16,
}

pub fn is_duplicate(a: &Shift, b: &Shift) -> bool {
    a.key() == b.key()
}

/// True when `a` and `b` share a weekday and their half-open intervals intersect.
pub fn overlaps(a: &Shift, b: &Shift) -> bool {
    a.days().intersects(b.days()) && a.check_in() < b.check_out() && b.check_in() < a.check_out()
}

/// Minutes both shifts are active on one shared day, or 0 when they do not overlap.
///
/// The overlap is `min(a.out, b.out) - max(a.in, b.in)`.
pub fn overlap_minutes(a: &Shift, b: &Shift) -> u16 {
    if !overlaps(a, b) {
        return 0;
    }
    let start = a.check_in().max(b.check_in());
    let end = a.check_out().min(b.check_out());
    end.minutes() - start.minutes()
}

/// Find a stored shift that duplicates `candidate`, skipping the one whose id is `exclude`.
pub fn find_duplicate<'a, Id: PartialEq>(
    candidate: &Shift,
    others: &'a [StoredShift<Id>],
    exclude: Option<&Id>,
) -> Option<&'a StoredShift<Id>> {
    others
        .iter()
        .filter(|s| exclude != Some(&s.id))
        .find(|s| is_duplicate(candidate, &s.shift))
}

/// Find a stored shift that overlaps `candidate`, skipping the one whose id is `exclude`.
pub fn find_overlap<'a, Id: PartialEq>(
    candidate: &Shift,
    others: &'a [StoredShift<Id>],
    exclude: Option<&Id>,
) -> Option<&'a StoredShift<Id>> {
    others
        .iter()
        .filter(|s| exclude != Some(&s.id))
        .find(|s| overlaps(candidate, &s.shift))
}

/// Indices `(first, later)` of the first repeated shift within a batch.
pub fn find_duplicate_pair(batch: &[Shift]) -> Option<(usize, usize)> {
    let mut seen: HashMap<Shift, usize> = HashMap::with_capacity(batch.len());
    for (i, shift) in batch.iter().enumerate() {
        if let Some(&first) = seen.get(shift) {
            return Some((first, i));
        }
        seen.insert(*shift, i);
    }
    None
}

/// Indices `(i, j)` with `i < j` of the first overlapping pair within a batch.
pub fn find_overlap_pair(batch: &[Shift]) -> Option<(usize, usize)> {
    for (i, a) in batch.iter().enumerate() {
        for (j, b) in batch.iter().enumerate().skip(i + 1) {
            if overlaps(a, b) {
                return Some((i, j));
            }
        }
    }
    None
}

pub fn has_duplicates(batch: &[Shift]) -> bool {
    find_duplicate_pair(batch).is_some()
}

pub fn has_overlaps(batch: &[Shift]) -> bool {
    find_overlap_pair(batch).is_some()
}

/// Find every conflicting (candidate, stored) pair.
///
/// A duplicate is reported once as `Duplicate`, not additionally as an
/// `Overlap`. Results are ordered by candidate, then by stored position.
pub fn find_conflicts<Id: Clone>(
    candidates: &[Shift],
    existing: &[StoredShift<Id>],
) -> Vec<ShiftConflict<Id>> {
    let mut conflicts = Vec::new();

    for (candidate_index, candidate) in candidates.iter().enumerate() {
        for stored in existing {
            if !overlaps(candidate, &stored.shift) {
                continue;
            }
            let kind = if is_duplicate(candidate, &stored.shift) {
                ConflictKind::Duplicate
            } else {
                ConflictKind::Overlap
            };
            conflicts.push(ShiftConflict {
                kind,
                candidate_index,
                candidate: *candidate,
                existing: stored.clone(),
                shared_days: candidate.days().intersection(stored.shift.days()),
                overlap_minutes: overlap_minutes(candidate, &stored.shift),
            });
        }
    }

    conflicts
}
