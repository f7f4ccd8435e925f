//! Tenant allowance filtering for grant assignment.
//!
//! In tenant mode a tenant may only delegate permissions the platform has
//! granted to it (its allowance, the tenant grant set). Desired ids outside
//! the allowance are dropped silently instead of failing the request; the
//! dropped ids are reported back to the caller in the grant outcome.

use std::collections::BTreeSet;

use uuid::Uuid;

/// A desired grant set split into the legal part and the dropped remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedGrant {
    /// `desired ∩ allowed`.
    pub granted: BTreeSet<Uuid>,
    /// Ids outside the allowance, ascending.
    pub dropped: Vec<Uuid>,
}

/// Restrict `desired` to the ids present in `allowed`.
///
/// Callers bypass this entirely for platform-scoped actors; it applies to
/// role grant assignment by tenant-scoped actors only.
#[must_use]
pub fn restrict(desired: BTreeSet<Uuid>, allowed: &BTreeSet<Uuid>) -> ScopedGrant {
    let mut granted = BTreeSet::new();
    let mut dropped = Vec::new();
    for id in desired {
        if allowed.contains(&id) {
            granted.insert(id);
        } else {
            dropped.push(id);
        }
    }
    ScopedGrant { granted, dropped }
}
