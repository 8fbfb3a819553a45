//! Dialogue line-count rebalancing for Troupe.
//!
//! Given a script and a per-role target, [`Rebalancer`] asks a
//! [`GenerationService`](troupe_interface::GenerationService) for edits,
//! validates everything it gets back, and finishes with deterministic
//! [`FallbackRepair`] so the result always meets the target exactly.
//!
//! The pieces are usable on their own:
//!
//! - [`QualityGate`] decides whether an utterance is substantive dialogue
//! - [`parse_directives`] and [`EditPlan`] read and apply `INSERT`/`DELETE` edits
//! - [`FullRewrite`], [`Additive`] and [`Subtractive`] implement
//!   [`RebalanceStrategy`]
//! - [`TemplateBook`] holds the lines fallback repair synthesizes from
//! - [`Workshop`] reviews and polishes scripts, drafts stage kits and coaches
//!   rehearsals

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod directives;
mod fallback;
mod prompts;
mod quality;
mod rebalancer;
mod report;
mod service;
mod strategy;
mod templates;
mod workshop;

pub use config::{AttemptBudget, RebalanceConfig};
pub use directives::{Anchor, Directive, EditPlan, parse_directives};
pub use fallback::{FallbackConfig, FallbackOutcome, FallbackRepair};
pub use quality::{QualityConfig, QualityGate, text_similarity};
pub use rebalancer::{RebalanceOutcome, Rebalancer};
pub use report::{ConvergenceReport, RoleOutcome};
pub use strategy::{
    Additive, FullRewrite, RebalanceStrategy, StrategyContext, StrategyOutcome, Subtractive,
};
pub use templates::{TemplateBook, TemplateRule, Trigger};
pub use workshop::{FinalDraft, TaskLimits, Workshop, WorkshopConfig};
