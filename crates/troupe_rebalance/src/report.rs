//! What a rebalance run did, per role and overall.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use troupe_core::{LineCounts, RoleName, RoleSet, TargetSpec};
use troupe_interface::{EditSource, StrategyKind};

/// One role's counts before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoleOutcome {
    /// The role
    role: RoleName,
    /// Dialogue lines in the input
    original: usize,
    /// Requested count, if the role was constrained
    target: Option<usize>,
    /// Dialogue lines in the output
    #[serde(rename = "final")]
    final_count: usize,
    /// Mechanism behind the last change to the count
    source: EditSource,
}

/// Convergence report for one rebalance.
///
/// # Examples
///
/// ```
/// use troupe_core::{RoleName, TargetSpec};
/// use troupe_rebalance::Rebalancer;
/// use troupe_models::OfflineService;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let rebalancer = Rebalancer::new(OfflineService::new());
/// let target: TargetSpec = [(RoleName::new("A"), 1)].into_iter().collect();
/// let outcome = rebalancer.rebalance("A: Hello there.", &target).await.unwrap();
/// assert!(outcome.report.exact());
/// assert_eq!(*outcome.report.service_attempts(), 0);
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ConvergenceReport {
    /// Every role of the role set, in first-appearance order
    roles: Vec<RoleOutcome>,
    /// Generative strategies that ran, in order
    strategies: Vec<StrategyKind>,
    /// Service calls made by generative strategies
    service_attempts: usize,
    /// Demotions and insertions made by fallback repair
    fallback_steps: usize,
    /// Single-line service calls made by fallback repair
    fallback_service_calls: usize,
    /// Everything the caller should know about
    warnings: Vec<String>,
    /// Every constrained role meets its target
    #[getter(skip)]
    exact: bool,
}

impl ConvergenceReport {
    /// True if every constrained role meets its target.
    pub fn exact(&self) -> bool {
        self.exact
    }

    /// Outcome for one role.
    pub fn role(&self, role: &RoleName) -> Option<&RoleOutcome> {
        self.roles.iter().find(|r| &r.role == role)
    }
}

impl std::fmt::Display for ConvergenceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "exact: {}", if self.exact { "yes" } else { "no" })?;
        for r in &self.roles {
            let target = r
                .target
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "  {}: {} -> {} (target {}, {})",
                r.role, r.original, r.final_count, target, r.source
            )?;
        }
        if !self.strategies.is_empty() {
            let names: Vec<String> = self.strategies.iter().map(|s| s.to_string()).collect();
            writeln!(
                f,
                "strategies: {} ({} service attempts)",
                names.join(", "),
                self.service_attempts
            )?;
        }
        if self.fallback_steps > 0 {
            writeln!(
                f,
                "fallback: {} steps ({} service calls)",
                self.fallback_steps, self.fallback_service_calls
            )?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {}", warning)?;
        }
        Ok(())
    }
}

/// Accumulates a report while the orchestrator runs.
#[derive(Debug, Default)]
pub(crate) struct ReportTracker {
    sources: BTreeMap<RoleName, EditSource>,
    strategies: Vec<StrategyKind>,
    service_attempts: usize,
    fallback_steps: usize,
    fallback_service_calls: usize,
    warnings: Vec<String>,
}

impl ReportTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Credit `source` for every role whose count changed.
    fn credit(&mut self, source: EditSource, before: &LineCounts, after: &LineCounts) {
        for (role, n) in after {
            if before.get(role) != Some(n) {
                self.sources.insert(role.clone(), source);
            }
        }
    }

    pub(crate) fn record_strategy(
        &mut self,
        kind: StrategyKind,
        before: &LineCounts,
        after: &LineCounts,
        attempts: usize,
        warnings: Vec<String>,
    ) {
        self.strategies.push(kind);
        self.service_attempts += attempts;
        self.warnings.extend(warnings);
        self.credit(EditSource::Generative(kind), before, after);
    }

    pub(crate) fn record_fallback(
        &mut self,
        before: &LineCounts,
        after: &LineCounts,
        steps: usize,
        service_calls: usize,
        warnings: Vec<String>,
    ) {
        self.fallback_steps += steps;
        self.fallback_service_calls += service_calls;
        self.warnings.extend(warnings);
        self.credit(EditSource::Fallback, before, after);
    }

    pub(crate) fn finish(
        self,
        roles: &RoleSet,
        original: &LineCounts,
        final_counts: &LineCounts,
        target: &TargetSpec,
        exact: bool,
    ) -> ConvergenceReport {
        let outcomes = roles
            .iter()
            .map(|role| RoleOutcome {
                role: role.clone(),
                original: original.get(role).copied().unwrap_or(0),
                target: target.get(role),
                final_count: final_counts.get(role).copied().unwrap_or(0),
                source: self
                    .sources
                    .get(role)
                    .copied()
                    .unwrap_or(EditSource::Unchanged),
            })
            .collect();

        ConvergenceReport {
            roles: outcomes,
            strategies: self.strategies,
            service_attempts: self.service_attempts,
            fallback_steps: self.fallback_steps,
            fallback_service_calls: self.fallback_service_calls,
            warnings: self.warnings,
            exact,
        }
    }
}
