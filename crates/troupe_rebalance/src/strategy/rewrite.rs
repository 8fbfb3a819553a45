use super::{BestDraft, RebalanceStrategy, StrategyContext, StrategyOutcome};
use crate::{prompts, service::ask};
use async_trait::async_trait;
use troupe_core::{Script, TargetSpec, count, total_deviation};
use troupe_interface::StrategyKind;
use tracing::{debug, info, instrument, warn};

/// Rewrite the whole script, then correct it against the counts.
///
/// Every draft is parsed, stripped of invented speakers and filler lines, and
/// recounted. Drafts without any dialogue are discarded. Follow-up requests
/// carry the previous draft and only the discrepancies.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullRewrite;

#[async_trait]
impl RebalanceStrategy for FullRewrite {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FullRewrite
    }

    #[instrument(skip_all, fields(strategy = "full_rewrite", lines = script.len()))]
    async fn run(
        &self,
        ctx: &StrategyContext<'_>,
        script: &Script,
        target: &TargetSpec,
    ) -> StrategyOutcome {
        let budget = ctx.config.attempts.rewrite;
        let mut best = BestDraft::new(script.clone(), ctx.deviation(script, target));
        let mut last_draft: Option<Script> = None;
        let mut attempts = 0usize;
        let mut warnings = Vec::new();

        while attempts < budget && best.deviation() > 0 {
            let user = match &last_draft {
                None => prompts::rewrite_request(script, ctx.roles, target),
                Some(draft) => {
                    let counts = count(draft, ctx.roles);
                    prompts::rewrite_correction(
                        draft,
                        &prompts::discrepancies(ctx.roles, &counts, target),
                    )
                }
            };
            attempts += 1;

            let Some(text) = ask(
                ctx.service,
                prompts::rewrite_system(),
                user,
                None,
                ctx.config.call_timeout(),
            )
            .await
            else {
                warnings.push(format!("rewrite attempt {} produced no draft", attempts));
                continue;
            };

            let (draft, demoted) = ctx.parser.parse_generated(&text).demote_off_roster(ctx.roles);
            if demoted > 0 {
                warn!(attempt = attempts, demoted, "Draft used speakers outside the role set");
                warnings.push(format!(
                    "rewrite attempt {}: demoted {} line(s) by unknown speakers",
                    attempts, demoted
                ));
            }
            let (draft, filler) = ctx.gate.demote_filler(&draft);
            if filler > 0 {
                warn!(attempt = attempts, filler, "Draft contained filler dialogue");
                warnings.push(format!(
                    "rewrite attempt {}: demoted {} filler line(s)",
                    attempts, filler
                ));
            }
            if draft.dialogue_len() == 0 {
                warnings.push(format!("rewrite attempt {} had no dialogue", attempts));
                continue;
            }

            let deviation = total_deviation(&count(&draft, ctx.roles), target);
            let improved = best.consider(&draft, deviation);
            debug!(attempt = attempts, deviation, improved, "Rewrite draft counted");
            last_draft = Some(draft);
        }

        let satisfied = best.deviation() == 0;
        info!(attempts, satisfied, deviation = best.deviation(), "Full rewrite finished");
        StrategyOutcome {
            script: best.into_script(),
            satisfied,
            attempts,
            warnings,
        }
    }
}
