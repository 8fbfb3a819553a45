use super::{RebalanceStrategy, StrategyContext, StrategyOutcome, describe};
use crate::{Directive, EditPlan, parse_directives, prompts, service::ask};
use async_trait::async_trait;
use std::collections::BTreeMap;
use troupe_core::{
    RoleName, Script, TargetSpec, count, deficits, delta, is_satisfied, surpluses,
};
use troupe_interface::StrategyKind;
use tracing::{debug, info, instrument, warn};

/// Insert dialogue lines only.
///
/// The service sees a numbered script and the deficits, and answers with
/// `INSERT AFTER` directives. Accepted directives never touch existing
/// lines, so the result always contains the input as an ordered subsequence.
/// Surpluses are out of reach for this strategy and are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Additive;

impl Additive {
    /// Turn a response into an edit plan, discarding directives that break the rules.
    fn plan(
        &self,
        ctx: &StrategyContext<'_>,
        script: &Script,
        needed: &[(RoleName, usize)],
        response: &str,
    ) -> (EditPlan, usize, usize) {
        let mut remaining: BTreeMap<RoleName, usize> = needed.iter().cloned().collect();
        let mut plan = EditPlan::new();
        let (mut accepted, mut discarded) = (0usize, 0usize);

        for directive in parse_directives(response) {
            let (anchor, payload) = match directive {
                Directive::Insert { anchor, payload } => (anchor, payload),
                Directive::Delete(number) => {
                    debug!(number, "Discarding deletion in additive response");
                    discarded += 1;
                    continue;
                }
            };
            let Some(slot) = anchor.slot(script.len()) else {
                debug!(?anchor, "Discarding insertion with out-of-range anchor");
                discarded += 1;
                continue;
            };

            let line = ctx.parser.parse_line(&payload, None);
            let Some(speaker) = line.speaker().cloned() else {
                debug!(payload = %payload, "Discarding insertion that is not dialogue");
                discarded += 1;
                continue;
            };
            let utterance = line.utterance().unwrap_or_default();
            if !ctx.gate.accepts(&speaker, utterance, ctx.roles) {
                discarded += 1;
                continue;
            }
            match remaining.get_mut(&speaker) {
                Some(left) if *left > 0 => *left -= 1,
                _ => {
                    debug!(speaker = %speaker, "Discarding insertion beyond remaining deficit");
                    discarded += 1;
                    continue;
                }
            }

            plan.insert(slot, line);
            accepted += 1;
        }

        (plan, accepted, discarded)
    }
}

#[async_trait]
impl RebalanceStrategy for Additive {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Additive
    }

    #[instrument(skip_all, fields(strategy = "additive", lines = script.len()))]
    async fn run(
        &self,
        ctx: &StrategyContext<'_>,
        script: &Script,
        target: &TargetSpec,
    ) -> StrategyOutcome {
        let budget = ctx.config.attempts.additive;
        let mut warnings = Vec::new();

        let initial = count(script, ctx.roles);
        let ignored = surpluses(&delta(&initial, target));
        if !ignored.is_empty() {
            warn!(roles = %describe(&ignored), "Additive strategy cannot remove lines");
            warnings.push(format!(
                "additive strategy ignored surpluses: {}",
                describe(&ignored)
            ));
        }
        let effective = target.clamp_surpluses(&initial);

        let mut current = script.clone();
        let mut attempts = 0usize;
        let mut correction: Option<String> = None;

        while attempts < budget {
            let needed = deficits(&delta(&count(&current, ctx.roles), &effective));
            if needed.is_empty() {
                break;
            }
            attempts += 1;

            let user = prompts::additive_request(&current, ctx.roles, &needed, correction.as_deref());
            let Some(text) = ask(
                ctx.service,
                prompts::directive_system(),
                user,
                None,
                ctx.config.call_timeout(),
            )
            .await
            else {
                warnings.push(format!("additive attempt {} produced no directives", attempts));
                continue;
            };

            let (plan, accepted, discarded) = self.plan(ctx, &current, &needed, &text);
            if discarded > 0 {
                warn!(attempt = attempts, discarded, "Discarded additive directives");
                warnings.push(format!(
                    "additive attempt {}: discarded {} directive(s)",
                    attempts, discarded
                ));
            }
            debug!(attempt = attempts, accepted, "Applying additive directives");
            current = plan.apply(&current);

            let counts = count(&current, ctx.roles);
            correction = Some(prompts::discrepancies(ctx.roles, &counts, &effective));
        }

        let satisfied = is_satisfied(&count(&current, ctx.roles), target);
        info!(attempts, satisfied, "Additive strategy finished");
        StrategyOutcome {
            script: current,
            satisfied,
            attempts,
            warnings,
        }
    }
}
