//! The rebalance orchestrator.

use crate::report::ReportTracker;
use crate::{
    Additive, ConvergenceReport, FallbackRepair, FullRewrite, QualityGate, RebalanceConfig,
    RebalanceStrategy, StrategyContext, Subtractive,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use troupe_core::{
    DeltaShape, Orthography, RoleName, ScriptParser, TargetSpec, count, delta, is_satisfied,
    roles_of,
};
use troupe_error::{RebalanceError, RebalanceErrorKind, TroupeResult};
use troupe_interface::{GenerationService, StrategyPreference};
use tracing::{debug, info, instrument};

/// Rebalanced script text plus its report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceOutcome {
    /// The final script
    pub script: String,
    /// How it got there
    pub report: ConvergenceReport,
}

/// Clears the in-flight flag on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, RebalanceError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| RebalanceError::new(RebalanceErrorKind::Busy))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Rewrites scripts so each role speaks exactly its target number of lines.
///
/// Strategy selection follows the shape of the deltas: surpluses only run the
/// subtractive strategy, deficits only the additive one, and a mix runs
/// subtractive then additive. With [`StrategyPreference::FullRewrite`] a
/// single rewrite-and-verify pass runs instead. Whatever the strategies leave
/// unmet, fallback repair finishes, so a successful call is always exact.
///
/// One rebalancer runs one rebalance at a time; a concurrent call fails with
/// [`RebalanceErrorKind::Busy`].
///
/// # Examples
///
/// ```
/// use troupe_core::{count_by_role, RoleName, TargetSpec};
/// use troupe_models::OfflineService;
/// use troupe_rebalance::Rebalancer;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let script = "Mina: Where is the puppy?\nJoon: I looked everywhere.\nMina: Oh.";
/// let target: TargetSpec = [(RoleName::new("Mina"), 1), (RoleName::new("Joon"), 2)]
///     .into_iter()
///     .collect();
///
/// let outcome = Rebalancer::new(OfflineService::new()).rebalance(script, &target).await?;
/// let counts = count_by_role(&outcome.script);
/// assert_eq!(counts[&RoleName::new("Mina")], 1);
/// assert_eq!(counts[&RoleName::new("Joon")], 2);
/// assert!(outcome.report.exact());
/// # Ok(())
/// # }
/// ```
pub struct Rebalancer<S> {
    service: S,
    config: RebalanceConfig,
    parser: ScriptParser,
    in_flight: AtomicBool,
}

impl<S: std::fmt::Debug> std::fmt::Debug for Rebalancer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rebalancer")
            .field("service", &self.service)
            .field("preference", &self.config.preference)
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<S: GenerationService> Rebalancer<S> {
    /// Rebalancer with default configuration.
    pub fn new(service: S) -> Self {
        let config = RebalanceConfig::default();
        Self {
            parser: ScriptParser::new(config.parser.clone()),
            service,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Rebalancer with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the quality policy is unusable.
    pub fn with_config(service: S, config: RebalanceConfig) -> TroupeResult<Self> {
        config.quality.validate()?;
        Ok(Self {
            parser: ScriptParser::new(config.parser.clone()),
            service,
            config,
            in_flight: AtomicBool::new(false),
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &RebalanceConfig {
        &self.config
    }

    /// The generation service.
    pub fn service(&self) -> &S {
        &self.service
    }

    fn plan(&self, shape: DeltaShape) -> Vec<Box<dyn RebalanceStrategy>> {
        fn boxed<T: RebalanceStrategy + 'static>(strategy: T) -> Box<dyn RebalanceStrategy> {
            Box::new(strategy)
        }

        match (self.config.preference, shape) {
            (_, DeltaShape::Satisfied) => Vec::new(),
            (StrategyPreference::FullRewrite, _) => vec![boxed(FullRewrite)],
            (StrategyPreference::Targeted, DeltaShape::SurplusOnly) => vec![boxed(Subtractive)],
            (StrategyPreference::Targeted, DeltaShape::DeficitOnly) => vec![boxed(Additive)],
            (StrategyPreference::Targeted, DeltaShape::Mixed) => {
                vec![boxed(Subtractive), boxed(Additive)]
            }
        }
    }

    /// Rebalance `text` to `target`.
    ///
    /// A script that already satisfies the target comes back text-identical,
    /// without any service call.
    ///
    /// # Errors
    ///
    /// - [`RebalanceErrorKind::EmptyRoleSet`] if the script has no dialogue
    /// - [`RebalanceErrorKind::UnknownRole`] if the target asks for lines
    ///   from a role the script does not have
    /// - [`RebalanceErrorKind::Busy`] if another rebalance is running on this
    ///   rebalancer
    ///
    /// Service failures are never errors; they show up in the report.
    #[instrument(skip_all, fields(text_len = text.len(), roles = target.len(), provider = self.service.provider_name()))]
    pub async fn rebalance(&self, text: &str, target: &TargetSpec) -> TroupeResult<RebalanceOutcome> {
        let _guard = InFlight::acquire(&self.in_flight)?;

        let script = self.parser.parse(text);
        let roles = roles_of(&script);
        let original = count(&script, &roles);
        let satisfied = is_satisfied(&original, target);
        if roles.is_empty() && (target.is_empty() || !satisfied) {
            return Err(RebalanceError::new(RebalanceErrorKind::EmptyRoleSet).into());
        }

        // A role targeted at zero may already be gone from the script.
        let unknown: Vec<RoleName> = target
            .unknown_roles(&roles)
            .into_iter()
            .filter(|role| target.get(role).unwrap_or(0) > 0)
            .collect();
        if !unknown.is_empty() {
            let names: Vec<&str> = unknown.iter().map(RoleName::as_str).collect();
            return Err(RebalanceError::new(RebalanceErrorKind::UnknownRole(names.join(", "))).into());
        }

        if satisfied {
            info!("Script already satisfies the target");
            let report = ReportTracker::new().finish(&roles, &original, &original, target, true);
            return Ok(RebalanceOutcome {
                script: text.to_string(),
                report,
            });
        }

        let orthography = Orthography::detect(text);
        let gate = QualityGate::new(&self.config.quality, orthography)?;
        let ctx = StrategyContext::new(&self.service, &self.parser, &roles, &gate, &self.config);
        let mut tracker = ReportTracker::new();

        let shape = DeltaShape::of(&delta(&original, target));
        debug!(%shape, %orthography, "Planning strategies");

        let mut current = script;
        for strategy in self.plan(shape) {
            let before = count(&current, &roles);
            if is_satisfied(&before, target) {
                break;
            }
            let outcome = strategy.run(&ctx, &current, target).await;
            let after = count(&outcome.script, &roles);
            tracker.record_strategy(
                strategy.kind(),
                &before,
                &after,
                outcome.attempts,
                outcome.warnings,
            );
            current = outcome.script;
        }

        let before = count(&current, &roles);
        if !is_satisfied(&before, target) {
            info!("Strategies left a residual mismatch, running fallback repair");
            let repaired = FallbackRepair::new(ctx).repair(&current, target).await;
            let after = count(&repaired.script, &roles);
            tracker.record_fallback(
                &before,
                &after,
                repaired.steps,
                repaired.service_calls,
                repaired.warnings,
            );
            current = repaired.script;
        }

        let final_counts = count(&current, &roles);
        let exact = is_satisfied(&final_counts, target);
        let report = tracker.finish(&roles, &original, &final_counts, target, exact);
        info!(exact, fallback_steps = report.fallback_steps(), "Rebalance finished");

        Ok(RebalanceOutcome {
            script: current.render(),
            report,
        })
    }
}
