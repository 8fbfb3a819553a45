use super::{RebalanceStrategy, StrategyContext, StrategyOutcome, describe};
use crate::{Directive, EditPlan, parse_directives, prompts, service::ask};
use async_trait::async_trait;
use std::collections::BTreeMap;
use troupe_core::{
    Line, RoleName, Script, TargetSpec, count, deficits, delta, is_satisfied,
    is_wrapped_direction, surpluses,
};
use troupe_interface::StrategyKind;
use tracing::{debug, info, instrument, warn};

/// Delete dialogue lines only.
///
/// The service answers with `DELETE` directives, plus optional short
/// parenthesized stage directions to bridge the gaps. Only lines of roles
/// with remaining surplus can be deleted, so the surviving dialogue is always
/// a subsequence of the input's.
#[derive(Debug, Clone, Copy, Default)]
pub struct Subtractive;

impl Subtractive {
    fn plan(
        &self,
        ctx: &StrategyContext<'_>,
        script: &Script,
        excess: &[(RoleName, usize)],
        response: &str,
    ) -> (EditPlan, usize, usize) {
        let mut remaining: BTreeMap<RoleName, usize> = excess.iter().cloned().collect();
        let mut plan = EditPlan::new();
        let (mut accepted, mut discarded) = (0usize, 0usize);

        for directive in parse_directives(response) {
            match directive {
                Directive::Delete(number) => {
                    let Some(index) = number.checked_sub(1).filter(|i| *i < script.len()) else {
                        debug!(number, "Discarding deletion of nonexistent line");
                        discarded += 1;
                        continue;
                    };
                    let speaker = script.get(index).and_then(|l| l.speaker()).cloned();
                    let Some(speaker) = speaker else {
                        debug!(number, "Discarding deletion of a non-dialogue line");
                        discarded += 1;
                        continue;
                    };
                    if plan.is_deleted(index) {
                        discarded += 1;
                        continue;
                    }
                    match remaining.get_mut(&speaker) {
                        Some(left) if *left > 0 => *left -= 1,
                        _ => {
                            debug!(number, speaker = %speaker, "Discarding deletion beyond surplus");
                            discarded += 1;
                            continue;
                        }
                    }
                    plan.delete(index);
                    accepted += 1;
                }
                Directive::Insert { anchor, payload } => {
                    let Some(slot) = anchor.slot(script.len()) else {
                        discarded += 1;
                        continue;
                    };
                    let text = payload.trim();
                    if !is_wrapped_direction(text)
                        || text.chars().count() > ctx.config.max_connective_chars
                    {
                        debug!(payload = %payload, "Discarding connective that is not a short stage direction");
                        discarded += 1;
                        continue;
                    }
                    plan.insert(slot, Line::other(text));
                    accepted += 1;
                }
            }
        }

        (plan, accepted, discarded)
    }
}

#[async_trait]
impl RebalanceStrategy for Subtractive {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Subtractive
    }

    #[instrument(skip_all, fields(strategy = "subtractive", lines = script.len()))]
    async fn run(
        &self,
        ctx: &StrategyContext<'_>,
        script: &Script,
        target: &TargetSpec,
    ) -> StrategyOutcome {
        let budget = ctx.config.attempts.subtractive;
        let mut warnings = Vec::new();

        let initial = count(script, ctx.roles);
        let ignored = deficits(&delta(&initial, target));
        if !ignored.is_empty() {
            warn!(roles = %describe(&ignored), "Subtractive strategy cannot add lines");
            warnings.push(format!(
                "subtractive strategy ignored deficits: {}",
                describe(&ignored)
            ));
        }
        let effective = target.clamp_deficits(&initial);

        let mut current = script.clone();
        let mut attempts = 0usize;
        let mut correction: Option<String> = None;

        while attempts < budget {
            let excess = surpluses(&delta(&count(&current, ctx.roles), &effective));
            if excess.is_empty() {
                break;
            }
            attempts += 1;

            let user = prompts::subtractive_request(
                &current,
                ctx.roles,
                &excess,
                &ignored,
                ctx.config.max_connective_chars,
                correction.as_deref(),
            );
            let Some(text) = ask(
                ctx.service,
                prompts::directive_system(),
                user,
                None,
                ctx.config.call_timeout(),
            )
            .await
            else {
                warnings.push(format!(
                    "subtractive attempt {} produced no directives",
                    attempts
                ));
                continue;
            };

            let (plan, accepted, discarded) = self.plan(ctx, &current, &excess, &text);
            if discarded > 0 {
                warn!(attempt = attempts, discarded, "Discarded subtractive directives");
                warnings.push(format!(
                    "subtractive attempt {}: discarded {} directive(s)",
                    attempts, discarded
                ));
            }
            debug!(attempt = attempts, accepted, "Applying subtractive directives");
            current = plan.apply(&current);

            let counts = count(&current, ctx.roles);
            correction = Some(prompts::discrepancies(ctx.roles, &counts, &effective));
        }

        let satisfied = is_satisfied(&count(&current, ctx.roles), target);
        info!(attempts, satisfied, "Subtractive strategy finished");
        StrategyOutcome {
            script: current,
            satisfied,
            attempts,
            warnings,
        }
    }
}
