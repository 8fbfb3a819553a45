//! Generative rebalance strategies.
//!
//! Each strategy takes an immutable script and returns the best draft it
//! obtained within its attempt budget. Service failures never escape a
//! strategy; they cost an attempt and leave a warning.

mod additive;
mod rewrite;
mod subtractive;

pub use additive::Additive;
pub use rewrite::FullRewrite;
pub use subtractive::Subtractive;

use crate::{QualityGate, RebalanceConfig};
use async_trait::async_trait;
use troupe_core::{RoleName, RoleSet, Script, ScriptParser, TargetSpec, count, total_deviation};
use troupe_interface::{GenerationService, StrategyKind};

/// Everything a strategy reads while it runs.
#[derive(Clone, Copy)]
pub struct StrategyContext<'a> {
    /// Where drafts and directives come from
    pub service: &'a dyn GenerationService,
    /// Parses service output
    pub parser: &'a ScriptParser,
    /// The frozen role set of the input script
    pub roles: &'a RoleSet,
    /// Utterance acceptance
    pub gate: &'a QualityGate,
    /// Budgets and limits
    pub config: &'a RebalanceConfig,
}

impl<'a> StrategyContext<'a> {
    /// Bundle the collaborators of one rebalance run.
    pub fn new(
        service: &'a dyn GenerationService,
        parser: &'a ScriptParser,
        roles: &'a RoleSet,
        gate: &'a QualityGate,
        config: &'a RebalanceConfig,
    ) -> Self {
        Self {
            service,
            parser,
            roles,
            gate,
            config,
        }
    }

    /// Total deviation of `script` from `target`.
    pub fn deviation(&self, script: &Script, target: &TargetSpec) -> u64 {
        total_deviation(&count(script, self.roles), target)
    }
}

impl std::fmt::Debug for StrategyContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyContext")
            .field("provider", &self.service.provider_name())
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Result of one strategy run.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    /// Best draft, the input if nothing improved on it
    pub script: Script,
    /// True if the draft meets the target exactly
    pub satisfied: bool,
    /// Service calls made
    pub attempts: usize,
    /// Clamped deltas, discarded directives, failed calls
    pub warnings: Vec<String>,
}

/// A generative way of moving a script toward a target.
#[async_trait]
pub trait RebalanceStrategy: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Run against `script` until satisfied or out of attempts.
    async fn run(
        &self,
        ctx: &StrategyContext<'_>,
        script: &Script,
        target: &TargetSpec,
    ) -> StrategyOutcome;
}

/// Best draft so far: least deviation, earlier wins ties.
#[derive(Debug)]
pub(crate) struct BestDraft {
    script: Script,
    deviation: u64,
}

impl BestDraft {
    pub(crate) fn new(script: Script, deviation: u64) -> Self {
        Self { script, deviation }
    }

    pub(crate) fn deviation(&self) -> u64 {
        self.deviation
    }

    /// Keep `script` if it is strictly closer.
    pub(crate) fn consider(&mut self, script: &Script, deviation: u64) -> bool {
        if deviation < self.deviation {
            self.script = script.clone();
            self.deviation = deviation;
            true
        } else {
            false
        }
    }

    pub(crate) fn into_script(self) -> Script {
        self.script
    }
}

pub(crate) fn describe(amounts: &[(RoleName, usize)]) -> String {
    amounts
        .iter()
        .map(|(role, n)| format!("{} ({})", role, n))
        .collect::<Vec<_>>()
        .join(", ")
}
