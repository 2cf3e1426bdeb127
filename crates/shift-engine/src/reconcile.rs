//! Compute the add/remove delta between a desired shift set and the stored one.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::shift::{Shift, ShiftKey, StoredShift};

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation<Id> {
    /// Desired keys with no stored counterpart, in key order.
    pub to_add: Vec<ShiftKey>,
    /// Stored shifts that are no longer desired, in storage order.
    pub to_remove: Vec<StoredShift<Id>>,
    /// Stored shifts that stay as they are, in storage order.
    pub unchanged: Vec<StoredShift<Id>>,
}

impl<Id> Reconciliation<Id> {
    /// True when applying this reconciliation would not change storage.
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Keys of the removed shifts, in the same order as `to_remove`.
    pub fn removed_keys(&self) -> Vec<ShiftKey> {
        self.to_remove.iter().map(|s| s.shift.key()).collect()
    }

    /// The shift set that results from applying the delta, in key order.
    pub fn resulting_shifts(&self) -> Vec<Shift> {
        let mut shifts: Vec<Shift> = self
            .unchanged
            .iter()
            .map(|s| s.shift)
            .chain(self.to_add.iter().map(|k| Shift::from(*k)))
            .collect();
        shifts.sort();
        shifts
    }
}

/// Diff `desired` against `current`.
///
/// Every stored shift lands in exactly one of `unchanged` or `to_remove`. If
/// `current` holds the same key twice, only the first occurrence is kept and
/// the repeat is scheduled for removal, which restores the duplicate invariant.
pub fn reconcile<Id: Clone>(
    desired: &BTreeSet<ShiftKey>,
    current: &[StoredShift<Id>],
) -> Reconciliation<Id> {
    let mut kept: BTreeSet<ShiftKey> = BTreeSet::new();
    let mut to_remove = Vec::new();
    let mut unchanged = Vec::new();

    for stored in current {
        let key = stored.shift.key();
        if desired.contains(&key) && kept.insert(key) {
            unchanged.push(stored.clone());
        } else {
            to_remove.push(stored.clone());
        }
    }

    let to_add = desired.difference(&kept).copied().collect();

    Reconciliation {
        to_add,
        to_remove,
        unchanged,
    }
}
