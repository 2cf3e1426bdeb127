//! Verdicts for the operations a caller performs on an owner's shift set.
//!
//! Each `check_*` method validates the incoming shifts, runs the duplicate and
//! overlap rules against the batch itself and against the stored snapshot, and
//! returns a [`Verdict`]. Nothing here touches storage: the caller writes only
//! when the verdict is [`Verdict::Valid`].

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{EmptySetPolicy, EngineConfig, OwnerRole};
use crate::conflict::{find_duplicate, find_duplicate_pair, find_overlap, find_overlap_pair};
use crate::error::{Result, ShiftError};
use crate::reconcile::{reconcile, Reconciliation};
use crate::shift::{RawShift, Shift, ShiftKey, ShiftPatch, StoredShift};
use crate::validate;

/// The shift a conflict was found against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum ShiftRef<Id> {
    /// A shift already in storage.
    Existing { id: Id, shift: Shift },
    /// Another shift of the same request, by position.
    Batch { index: usize, shift: Shift },
}

impl<Id> ShiftRef<Id> {
    pub fn shift(&self) -> &Shift {
        match self {
            ShiftRef::Existing { shift, .. } | ShiftRef::Batch { shift, .. } => shift,
        }
    }

    fn existing(stored: &StoredShift<Id>) -> Self
    where
        Id: Clone,
    {
        ShiftRef::Existing {
            id: stored.id.clone(),
            shift: stored.shift,
        }
    }
}

/// Result of checking an operation against an owner's shift set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "camelCase")]
pub enum Verdict<Id> {
    /// The operation may be written.
    Valid,
    /// The operation would not change storage; skip the write.
    NoChanges,
    /// The shift at `index` of the request failed validation.
    InvalidShift { index: usize, reason: ShiftError },
    DuplicateConflict { candidate: Shift, with: ShiftRef<Id> },
    OverlapConflict { candidate: Shift, with: ShiftRef<Id> },
    /// The owner would be left with no shifts under
    /// [`EmptySetPolicy::RejectEmptyResult`].
    EmptyResultRejected,
}

impl<Id> Verdict<Id> {
    /// True for `Valid` and `NoChanges`.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Valid | Verdict::NoChanges)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Verdict::DuplicateConflict { .. } | Verdict::OverlapConflict { .. }
        )
    }
}

/// Verdict of a full replacement plus, when valid, the delta to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacePlan<Id> {
    pub verdict: Verdict<Id>,
    /// Present only when `verdict` is `Valid`.
    pub changes: Option<Reconciliation<Id>>,
}

/// A conflict engine bound to one configuration.
///
/// The engine is immutable and holds no state between calls, so one instance
/// can be shared by any number of request handlers. Its answers are only as
/// fresh as the `existing` snapshot passed in: callers that need
/// conflict-free inserts under concurrency must run "read, check, write" for
/// one owner inside a per-owner critical section, or back it with a
/// uniqueness constraint in storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftEngine {
    config: EngineConfig,
}

impl ShiftEngine {
    /// # Errors
    /// Returns `ShiftError::InvalidConfig` if `config` fails [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(ShiftEngine { config })
    }

    /// Engine with the preset configuration for `role`.
    pub fn for_role(role: OwnerRole) -> Self {
        ShiftEngine {
            config: EngineConfig::for_role(role),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn validate(&self, raw: &RawShift) -> Result<Shift> {
        validate::validate_shift(raw, &self.config)
    }

    pub fn validate_batch(
        &self,
        raws: &[RawShift],
    ) -> std::result::Result<Vec<Shift>, (usize, ShiftError)> {
        validate::validate_batch(raws, &self.config)
    }

    /// Check adding `batch` to an owner that already has `existing`.
    ///
    /// Order: validation, duplicates inside the batch, duplicates against
    /// storage, overlaps against storage, overlaps inside the batch.
    ///
    /// An empty batch changes nothing, except for an owner registering for
    /// the first time under `RejectEmptyResult`, who must add at least one
    /// shift.
    pub fn check_create<Id: PartialEq + Clone>(
        &self,
        batch: &[RawShift],
        existing: &[StoredShift<Id>],
    ) -> Verdict<Id> {
        let shifts = match self.validate_batch(batch) {
            Ok(shifts) => shifts,
            Err((index, reason)) => return Verdict::InvalidShift { index, reason },
        };

        if shifts.is_empty() {
            return if existing.is_empty() && self.rejects_empty() {
                Verdict::EmptyResultRejected
            } else {
                Verdict::NoChanges
            };
        }

        if let Some(verdict) = batch_duplicate(&shifts) {
            return verdict;
        }

        for candidate in &shifts {
            if let Some(stored) = find_duplicate(candidate, existing, None) {
                return Verdict::DuplicateConflict {
                    candidate: *candidate,
                    with: ShiftRef::existing(stored),
                };
            }
        }

        for candidate in &shifts {
            if let Some(stored) = find_overlap(candidate, existing, None) {
                return Verdict::OverlapConflict {
                    candidate: *candidate,
                    with: ShiftRef::existing(stored),
                };
            }
        }

        batch_overlap(&shifts).unwrap_or(Verdict::Valid)
    }

    /// Check replacing the stored shift `id` with `raw`.
    ///
    /// The shift being edited is excluded from both comparisons, so saving a
    /// shift with its own values never conflicts with itself. If `id` is not
    /// in `existing` the candidate is checked as a plain addition; finding
    /// the row is the caller's job.
    pub fn check_update<Id: PartialEq + Clone>(
        &self,
        id: &Id,
        raw: &RawShift,
        existing: &[StoredShift<Id>],
    ) -> Verdict<Id> {
        let candidate = match self.validate(raw) {
            Ok(shift) => shift,
            Err(reason) => return Verdict::InvalidShift { index: 0, reason },
        };

        if existing
            .iter()
            .any(|s| s.id == *id && s.shift == candidate)
        {
            return Verdict::NoChanges;
        }

        if let Some(stored) = find_duplicate(&candidate, existing, Some(id)) {
            return Verdict::DuplicateConflict {
                candidate,
                with: ShiftRef::existing(stored),
            };
        }

        if let Some(stored) = find_overlap(&candidate, existing, Some(id)) {
            return Verdict::OverlapConflict {
                candidate,
                with: ShiftRef::existing(stored),
            };
        }

        Verdict::Valid
    }

    /// Check applying `patch` to the stored shift `id`.
    ///
    /// Absent fields keep the stored shift's values; the merged shift then
    /// goes through [`ShiftEngine::check_update`]. When `id` is not in
    /// `existing` there is nothing to merge onto, so the patch must carry
    /// every field and is checked as a plain addition.
    pub fn check_patch<Id: PartialEq + Clone>(
        &self,
        id: &Id,
        patch: &ShiftPatch,
        existing: &[StoredShift<Id>],
    ) -> Verdict<Id> {
        let raw = match existing.iter().find(|s| s.id == *id) {
            Some(stored) => patch.merge(&stored.shift),
            None => match patch.clone().into_raw() {
                Ok(raw) => raw,
                Err(reason) => return Verdict::InvalidShift { index: 0, reason },
            },
        };
        self.check_update(id, &raw, existing)
    }

    /// Check replacing the whole stored set with `desired`.
    pub fn check_replace<Id: Clone>(
        &self,
        desired: &[RawShift],
        current: &[StoredShift<Id>],
    ) -> Verdict<Id> {
        self.plan_replace(desired, current).verdict
    }

    /// Check replacing the whole stored set with `desired` and compute the delta.
    ///
    /// Stored shifts are not compared against the desired ones for conflicts:
    /// whatever is not desired is removed, so only the desired set itself must
    /// be free of duplicates and overlaps.
    pub fn plan_replace<Id: Clone>(
        &self,
        desired: &[RawShift],
        current: &[StoredShift<Id>],
    ) -> ReplacePlan<Id> {
        let rejected = |verdict| ReplacePlan {
            verdict,
            changes: None,
        };

        let shifts = match self.validate_batch(desired) {
            Ok(shifts) => shifts,
            Err((index, reason)) => return rejected(Verdict::InvalidShift { index, reason }),
        };

        if let Some(verdict) = batch_duplicate(&shifts) {
            return rejected(verdict);
        }
        if let Some(verdict) = batch_overlap(&shifts) {
            return rejected(verdict);
        }

        if shifts.is_empty() && !current.is_empty() && self.rejects_empty() {
            return rejected(Verdict::EmptyResultRejected);
        }

        let keys: BTreeSet<ShiftKey> = shifts.iter().map(Shift::key).collect();
        let changes = reconcile(&keys, current);
        if changes.is_noop() {
            return rejected(Verdict::NoChanges);
        }

        ReplacePlan {
            verdict: Verdict::Valid,
            changes: Some(changes),
        }
    }

    /// Check removing the stored shift `id`.
    pub fn check_remove<Id: PartialEq>(&self, id: &Id, current: &[StoredShift<Id>]) -> Verdict<Id> {
        if !current.iter().any(|s| s.id == *id) {
            return Verdict::NoChanges;
        }
        let remaining = current.iter().filter(|s| s.id != *id).count();
        if remaining == 0 && self.rejects_empty() {
            return Verdict::EmptyResultRejected;
        }
        Verdict::Valid
    }

    fn rejects_empty(&self) -> bool {
        self.config.empty_set_policy == EmptySetPolicy::RejectEmptyResult
    }
}

fn batch_duplicate<Id>(shifts: &[Shift]) -> Option<Verdict<Id>> {
    find_duplicate_pair(shifts).map(|(first, later)| Verdict::DuplicateConflict {
        candidate: shifts[later],
        with: ShiftRef::Batch {
            index: first,
            shift: shifts[first],
        },
    })
}

fn batch_overlap<Id>(shifts: &[Shift]) -> Option<Verdict<Id>> {
    find_overlap_pair(shifts).map(|(first, later)| Verdict::OverlapConflict {
        candidate: shifts[later],
        with: ShiftRef::Batch {
            index: first,
            shift: shifts[first],
        },
    })
}
