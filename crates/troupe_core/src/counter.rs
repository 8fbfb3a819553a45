//! Line counting and delta calculation.

use crate::{RoleName, RoleSet, Script};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dialogue line count per role.
pub type LineCounts = BTreeMap<RoleName, usize>;

/// Signed `target - current` per role: positive is a deficit, negative a surplus.
pub type Deltas = BTreeMap<RoleName, i64>;

/// Desired dialogue line count per role.
///
/// # Examples
///
/// ```
/// use troupe_core::{RoleName, TargetSpec};
///
/// let target: TargetSpec = [("Mina", 1), ("Joon", 2)]
///     .into_iter()
///     .map(|(name, n)| (RoleName::new(name), n))
///     .collect();
/// assert_eq!(target.get(&RoleName::new("Joon")), Some(2));
/// assert_eq!(target.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSpec(BTreeMap<RoleName, usize>);

impl TargetSpec {
    /// Empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target for one role.
    pub fn insert(&mut self, role: RoleName, count: usize) -> Option<usize> {
        self.0.insert(role, count)
    }

    /// Target for one role.
    pub fn get(&self, role: &RoleName) -> Option<usize> {
        self.0.get(role).copied()
    }

    /// Roles and targets.
    pub fn iter(&self) -> impl Iterator<Item = (&RoleName, usize)> {
        self.0.iter().map(|(role, n)| (role, *n))
    }

    /// Number of constrained roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is constrained.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys that are not members of `roles`.
    pub fn unknown_roles(&self, roles: &RoleSet) -> Vec<RoleName> {
        self.0
            .keys()
            .filter(|role| !roles.contains(role))
            .cloned()
            .collect()
    }

    /// Keep the target for roles with a deficit, raise surpluses to the current count.
    pub fn clamp_surpluses(&self, counts: &LineCounts) -> TargetSpec {
        self.iter()
            .map(|(role, target)| {
                let current = counts.get(role).copied().unwrap_or(0);
                (role.clone(), target.max(current))
            })
            .collect()
    }

    /// Keep the target for roles with a surplus, lower deficits to the current count.
    pub fn clamp_deficits(&self, counts: &LineCounts) -> TargetSpec {
        self.iter()
            .map(|(role, target)| {
                let current = counts.get(role).copied().unwrap_or(0);
                (role.clone(), target.min(current))
            })
            .collect()
    }
}

impl FromIterator<(RoleName, usize)> for TargetSpec {
    fn from_iter<I: IntoIterator<Item = (RoleName, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Overall direction of a set of deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DeltaShape {
    /// Every role already matches its target
    Satisfied,
    /// Only surpluses remain
    SurplusOnly,
    /// Only deficits remain
    DeficitOnly,
    /// Both surpluses and deficits remain
    Mixed,
}

impl DeltaShape {
    /// Classify deltas.
    pub fn of(deltas: &Deltas) -> Self {
        let surplus = deltas.values().any(|d| *d < 0);
        let deficit = deltas.values().any(|d| *d > 0);
        match (surplus, deficit) {
            (false, false) => DeltaShape::Satisfied,
            (true, false) => DeltaShape::SurplusOnly,
            (false, true) => DeltaShape::DeficitOnly,
            (true, true) => DeltaShape::Mixed,
        }
    }
}

/// Count dialogue lines per role, ignoring speakers outside `roles`.
///
/// Every role of the set appears in the result, with zero if it has no lines.
pub fn count(script: &Script, roles: &RoleSet) -> LineCounts {
    let mut counts: LineCounts = roles.iter().map(|r| (r.clone(), 0)).collect();
    for speaker in script.lines().iter().filter_map(|l| l.speaker()) {
        if let Some(n) = counts.get_mut(speaker) {
            *n += 1;
        }
    }
    counts
}

/// `target - current` for every role of the target.
///
/// # Examples
///
/// ```
/// use troupe_core::{count_by_role, delta, RoleName, TargetSpec};
///
/// let counts = count_by_role("A: one line.\nA: two lines.\nB: only one.");
/// let target: TargetSpec = [(RoleName::new("A"), 1), (RoleName::new("B"), 2)]
///     .into_iter()
///     .collect();
/// let deltas = delta(&counts, &target);
/// assert_eq!(deltas[&RoleName::new("A")], -1);
/// assert_eq!(deltas[&RoleName::new("B")], 1);
/// ```
pub fn delta(counts: &LineCounts, target: &TargetSpec) -> Deltas {
    target
        .iter()
        .map(|(role, want)| {
            let have = counts.get(role).copied().unwrap_or(0);
            (role.clone(), want as i64 - have as i64)
        })
        .collect()
}

/// True if every target role has exactly its target count.
pub fn is_satisfied(counts: &LineCounts, target: &TargetSpec) -> bool {
    target
        .iter()
        .all(|(role, want)| counts.get(role).copied().unwrap_or(0) == want)
}

/// Sum of absolute deltas; zero iff satisfied.
pub fn total_deviation(counts: &LineCounts, target: &TargetSpec) -> u64 {
    delta(counts, target).values().map(|d| d.unsigned_abs()).sum()
}

/// Roles with a surplus and its size.
pub fn surpluses(deltas: &Deltas) -> Vec<(RoleName, usize)> {
    deltas
        .iter()
        .filter(|(_, d)| **d < 0)
        .map(|(role, d)| (role.clone(), d.unsigned_abs() as usize))
        .collect()
}

/// Roles with a deficit and its size.
pub fn deficits(deltas: &Deltas) -> Vec<(RoleName, usize)> {
    deltas
        .iter()
        .filter(|(_, d)| **d > 0)
        .map(|(role, d)| (role.clone(), *d as usize))
        .collect()
}
