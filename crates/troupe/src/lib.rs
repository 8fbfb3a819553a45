//! Troupe - rebalance screenplay dialogue to exact per-role line counts.
//!
//! Given a script and a target such as "Mina speaks 3 lines, Joon speaks 5",
//! Troupe edits the script with a generation service and then repairs
//! whatever the service got wrong, so the result always hits the target.
//!
//! # Quick Start
//!
//! ```
//! use troupe::{OfflineService, Rebalancer, count_by_role, parse_targets};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let script = "Mina: Is anyone home?\nJoon: Just me.\nMina: Great.\nMina: Let's go.";
//! let target = parse_targets(["Mina=2", "Joon=2"])?;
//!
//! let outcome = Rebalancer::new(OfflineService::new())
//!     .rebalance(script, &target)
//!     .await?;
//! let counts = count_by_role(&outcome.script);
//! assert_eq!(counts.values().sum::<usize>(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `troupe_core` - script model, parser, counters, rehearsal helpers
//! - `troupe_interface` - `GenerationService` trait
//! - `troupe_error` - error types
//! - `troupe_models` - OpenAI-compatible client, offline service, throttling
//! - `troupe_rebalance` - strategies, quality gate, fallback repair, orchestrator,
//!   script workshop
//!
//! This crate re-exports everything for convenience and ships the `troupe` CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod target;

pub use config::TroupeConfig;
pub use target::{parse_target_arg, parse_targets};

// Re-export core crates
pub use troupe_core::*;
pub use troupe_error::*;
pub use troupe_interface::*;

#[cfg(feature = "openai")]
pub use troupe_models::OpenAiCompatibleClient;
pub use troupe_models::{OfflineService, ServiceConfig, ThrottledService, service_from_config};

pub use troupe_rebalance::{
    Additive, AttemptBudget, ConvergenceReport, FallbackConfig, FinalDraft, FullRewrite,
    QualityConfig, QualityGate, RebalanceConfig, RebalanceOutcome, RebalanceStrategy, Rebalancer,
    RoleOutcome, StrategyContext, StrategyOutcome, Subtractive, TaskLimits, TemplateBook,
    TemplateRule, Trigger, Workshop, WorkshopConfig, text_similarity,
};
