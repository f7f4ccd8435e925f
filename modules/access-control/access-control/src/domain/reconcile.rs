//! Reconciliation of stored grants against a desired set.
//!
//! Grant assignment is declarative: the caller sends the full set it wants
//! an owner (role or tenant) to end up with. The diff computed here is the
//! minimal pair of insert/delete batches that turns the stored set into the
//! desired one.

use std::collections::BTreeSet;

use uuid::Uuid;

/// Minimal write sets turning the stored grant set into the desired one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantDiff {
    /// Desired ids not yet stored.
    pub to_insert: BTreeSet<Uuid>,
    /// Stored ids no longer desired.
    pub to_delete: BTreeSet<Uuid>,
}

impl GrantDiff {
    /// Compute the diff between `current` (stored) and `desired`.
    #[must_use]
    pub fn between(current: &BTreeSet<Uuid>, desired: &BTreeSet<Uuid>) -> Self {
        Self {
            to_insert: desired.difference(current).copied().collect(),
            to_delete: current.difference(desired).copied().collect(),
        }
    }

    /// True when nothing has to be written.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}
