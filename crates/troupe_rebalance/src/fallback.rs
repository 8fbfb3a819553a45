//! Deterministic repair that always reaches the target.
//!
//! Surpluses are removed by demoting the weakest dialogue lines to stage
//! directions. Deficits are filled by inserting a follow-up after the role's
//! latest line, chosen from context-triggered templates, then at most one
//! service call per line, then a fixed safe line. Each step changes exactly
//! one attribution, so repair finishes in `Σ|delta|` steps.

use crate::{StrategyContext, TemplateBook, prompts, service::ask};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use troupe_core::{
    Line, Orthography, RoleName, Script, TargetSpec, count, deficits, delta,
    has_terminal_punctuation, surpluses,
};
use tracing::{debug, info, instrument};

/// Fallback repair policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Weight of utterance length in the demotion score
    #[serde(default = "default_length_weight")]
    pub length_weight: f64,

    /// Added to the score of an utterance without terminal punctuation
    #[serde(default = "default_unterminated_penalty")]
    pub unterminated_penalty: f64,

    /// Lines on each side of the anchor used as context
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Token limit for the single-line service call
    #[serde(default = "default_line_max_tokens")]
    pub line_max_tokens: u32,

    /// Replaces the built-in English templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin_templates: Option<TemplateBook>,

    /// Replaces the built-in Korean templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hangul_templates: Option<TemplateBook>,
}

fn default_length_weight() -> f64 {
    1.0
}

fn default_unterminated_penalty() -> f64 {
    -10.0
}

fn default_context_window() -> usize {
    2
}

fn default_line_max_tokens() -> u32 {
    80
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            length_weight: default_length_weight(),
            unterminated_penalty: default_unterminated_penalty(),
            context_window: default_context_window(),
            line_max_tokens: default_line_max_tokens(),
            latin_templates: None,
            hangul_templates: None,
        }
    }
}

impl FallbackConfig {
    /// Template book for a writing system, configured or built in.
    pub fn templates(&self, orthography: Orthography) -> TemplateBook {
        let configured = match orthography {
            Orthography::Hangul => self.hangul_templates.as_ref(),
            Orthography::Latin | Orthography::Unknown => self.latin_templates.as_ref(),
        };
        configured
            .cloned()
            .unwrap_or_else(|| TemplateBook::builtin(orthography))
    }
}

/// What fallback repair did.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    /// The repaired script
    pub script: Script,
    /// Demotions plus insertions
    pub steps: usize,
    /// Single-line service calls made
    pub service_calls: usize,
    /// Roles whose count repair changed
    pub touched: BTreeSet<RoleName>,
    /// Lines that fell through to the safe line
    pub warnings: Vec<String>,
}

/// Guaranteed-exact repair.
#[derive(Debug)]
pub struct FallbackRepair<'a> {
    ctx: StrategyContext<'a>,
    templates: TemplateBook,
}

impl<'a> FallbackRepair<'a> {
    /// Repair within `ctx`, using the templates for the gate's writing system.
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        let templates = ctx.config.fallback.templates(ctx.gate.orthography());
        Self { ctx, templates }
    }

    /// Bring every role of `target` to its exact count.
    #[instrument(skip_all, fields(lines = script.len(), roles = target.len()))]
    pub async fn repair(&self, script: &Script, target: &TargetSpec) -> FallbackOutcome {
        let mut outcome = FallbackOutcome {
            script: script.clone(),
            steps: 0,
            service_calls: 0,
            touched: BTreeSet::new(),
            warnings: Vec::new(),
        };

        self.reduce_surpluses(&mut outcome, target);
        self.fill_deficits(&mut outcome, target).await;

        info!(
            steps = outcome.steps,
            service_calls = outcome.service_calls,
            "Fallback repair finished"
        );
        outcome
    }

    /// Roles with `(role, amount)` sorted largest first, ties in role set order.
    fn ordered(&self, mut amounts: Vec<(RoleName, usize)>) -> Vec<(RoleName, usize)> {
        amounts.sort_by_key(|(role, n)| {
            (
                std::cmp::Reverse(*n),
                self.ctx.roles.position(role).unwrap_or(usize::MAX),
            )
        });
        amounts
    }

    fn reduce_surpluses(&self, outcome: &mut FallbackOutcome, target: &TargetSpec) {
        let counts = count(&outcome.script, self.ctx.roles);
        for (role, surplus) in self.ordered(surpluses(&delta(&counts, target))) {
            for _ in 0..surplus {
                let Some(index) = self.pick_demotion(&outcome.script, &role) else {
                    break;
                };
                outcome.script = self.demote_at(&outcome.script, index);
                outcome.steps += 1;
                outcome.touched.insert(role.clone());
            }
        }
    }

    /// Lower is more demotable.
    pub fn demotion_score(&self, utterance: &str) -> f64 {
        if !self.ctx.gate.is_meaningful(utterance) {
            return f64::NEG_INFINITY;
        }
        let fallback = &self.ctx.config.fallback;
        let chars = utterance.chars().filter(|c| !c.is_whitespace()).count() as f64;
        let penalty = if has_terminal_punctuation(utterance) {
            0.0
        } else {
            fallback.unterminated_penalty
        };
        fallback.length_weight * chars + penalty
    }

    /// Lowest-scoring line of `role`, scanning from the end; ties go to the later line.
    pub fn pick_demotion(&self, script: &Script, role: &RoleName) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for index in script.indices_of(role).into_iter().rev() {
            let utterance = script.get(index).and_then(Line::utterance).unwrap_or_default();
            let score = self.demotion_score(utterance);
            if best.is_none_or(|(_, lowest)| score < lowest) {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }

    fn demote_at(&self, script: &Script, index: usize) -> Script {
        let Some(line) = script.get(index) else {
            return script.clone();
        };
        debug!(index, line = %line.render(), "Demoting dialogue line");
        let demoted = script.with_replaced(index, line.demote());

        let connective = self.templates.connective_line();
        let is_connective = |l: &Line| l.render().trim() == connective;
        let before = index.checked_sub(1).and_then(|i| demoted.get(i));
        let after = demoted.get(index + 1);
        match (before, after) {
            (Some(b), Some(a))
                if !b.is_dialogue() && !a.is_dialogue() && !is_connective(b) && !is_connective(a) =>
            {
                debug!(index, "Bridging gap with connective");
                demoted.with_inserted(index + 1, Line::other(connective.clone()))
            }
            _ => demoted,
        }
    }

    async fn fill_deficits(&self, outcome: &mut FallbackOutcome, target: &TargetSpec) {
        let counts = count(&outcome.script, self.ctx.roles);
        for (role, deficit) in self.ordered(deficits(&delta(&counts, target))) {
            for _ in 0..deficit {
                outcome.steps += 1;
                outcome.touched.insert(role.clone());

                let Some(anchor) = outcome.script.indices_of(&role).last().copied() else {
                    let at = outcome
                        .script
                        .last_dialogue_index()
                        .map(|i| i + 1)
                        .unwrap_or(outcome.script.len());
                    let opener = Line::dialogue(role.clone(), self.templates.opener(&role));
                    debug!(role = %role, at, "Inserting opener");
                    outcome.script = outcome.script.with_inserted(at, opener);
                    continue;
                };

                let utterance = self.follow_up(outcome, &role, anchor).await;
                debug!(role = %role, anchor, utterance = %utterance, "Inserting follow-up");
                outcome.script = outcome
                    .script
                    .with_inserted(anchor + 1, Line::dialogue(role.clone(), utterance));
            }
        }
    }

    fn context(&self, script: &Script, anchor: usize) -> String {
        let window = self.ctx.config.fallback.context_window;
        let start = anchor.saturating_sub(window);
        let end = (anchor + window).min(script.len().saturating_sub(1));
        script.lines()[start..=end.max(start)]
            .iter()
            .map(Line::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Nearest other role-set speaker within the window, earlier lines first on ties.
    fn addressee(&self, script: &Script, anchor: usize, role: &RoleName) -> Option<RoleName> {
        let window = self.ctx.config.fallback.context_window;
        let speaker_at = |i: usize| {
            script
                .get(i)
                .and_then(Line::speaker)
                .filter(|s| *s != role && self.ctx.roles.contains(s))
                .cloned()
        };
        (1..=window).find_map(|d| {
            anchor
                .checked_sub(d)
                .and_then(speaker_at)
                .or_else(|| speaker_at(anchor + d))
        })
    }

    fn acceptable(&self, role: &RoleName, candidate: &str, anchor_text: &str) -> bool {
        self.ctx.gate.accepts(role, candidate, self.ctx.roles)
            && !self.ctx.gate.is_near_duplicate(candidate, anchor_text)
    }

    async fn follow_up(
        &self,
        outcome: &mut FallbackOutcome,
        role: &RoleName,
        anchor: usize,
    ) -> String {
        let script = &outcome.script;
        let anchor_text = script
            .get(anchor)
            .and_then(Line::utterance)
            .unwrap_or_default()
            .to_string();
        let context = self.context(script, anchor);
        let addressee = self.addressee(script, anchor, role);

        let candidates = self
            .templates
            .candidates(&anchor_text, &context, role, addressee.as_ref());
        if let Some(line) = candidates
            .into_iter()
            .find(|c| self.acceptable(role, c, &anchor_text))
        {
            return line;
        }

        debug!(role = %role, "Templates exhausted, asking the service for one line");
        outcome.service_calls += 1;
        let response = ask(
            self.ctx.service,
            prompts::rewrite_system(),
            prompts::single_line_request(role, &anchor_text, &context),
            Some(self.ctx.config.fallback.line_max_tokens),
            self.ctx.config.call_timeout(),
        )
        .await;
        if let Some(line) = response
            .and_then(|text| self.single_line(&text, role))
            .filter(|line| self.acceptable(role, line, &anchor_text))
        {
            return line;
        }

        outcome
            .warnings
            .push(format!("fallback used the safe line for {}", role));
        self.templates.safe_line(role)
    }

    /// First usable line of a single-line answer, with any `Role:` prefix removed.
    fn single_line(&self, text: &str, role: &RoleName) -> Option<String> {
        let first = text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with("```"))?;
        match self.ctx.parser.parse_line(first, None) {
            Line::Dialogue {
                speaker, utterance, ..
            } => (speaker == *role).then_some(utterance),
            Line::Other { text, .. } if !troupe_core::is_wrapped_direction(&text) => {
                let unquoted = text.trim().trim_matches(|c: char| c == '"' || c == '“' || c == '”');
                (!unquoted.is_empty()).then(|| unquoted.to_string())
            }
            Line::Other { .. } => None,
        }
    }
}
