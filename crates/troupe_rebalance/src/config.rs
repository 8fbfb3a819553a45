//! Rebalance engine configuration.

use crate::{FallbackConfig, QualityConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use troupe_core::ParserConfig;
use troupe_interface::StrategyPreference;

/// Service attempts each generative strategy may spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptBudget {
    /// Full rewrite-and-verify
    #[serde(default = "default_rewrite_attempts")]
    pub rewrite: usize,
    /// Additive-only
    #[serde(default = "default_targeted_attempts")]
    pub additive: usize,
    /// Subtractive-only
    #[serde(default = "default_targeted_attempts")]
    pub subtractive: usize,
}

fn default_rewrite_attempts() -> usize {
    4
}

fn default_targeted_attempts() -> usize {
    3
}

impl Default for AttemptBudget {
    fn default() -> Self {
        Self {
            rewrite: default_rewrite_attempts(),
            additive: default_targeted_attempts(),
            subtractive: default_targeted_attempts(),
        }
    }
}

/// Everything the rebalancer needs besides the service itself.
///
/// Loaded from the `[rebalance]` table of `troupe.toml`:
///
/// ```toml
/// [rebalance]
/// preference = "targeted"
/// call_timeout_secs = 60
///
/// [rebalance.attempts]
/// rewrite = 4
/// additive = 3
/// subtractive = 3
///
/// [rebalance.quality]
/// min_chars = 4
/// similarity_threshold = 0.82
/// ```
///
/// # Examples
///
/// ```
/// use troupe_rebalance::RebalanceConfig;
///
/// let config = RebalanceConfig::default();
/// assert_eq!(config.attempts.rewrite, 4);
/// assert_eq!(config.attempts.additive, 3);
/// assert_eq!(config.max_connective_chars, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceConfig {
    /// Targeted edits or a single full rewrite
    #[serde(default)]
    pub preference: StrategyPreference,

    /// Per-strategy retry budgets
    #[serde(default)]
    pub attempts: AttemptBudget,

    /// Deadline for one generation call
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Longest connective stage direction the subtractive strategy may insert
    #[serde(default = "default_max_connective_chars")]
    pub max_connective_chars: usize,

    /// Speaker label rules
    #[serde(default)]
    pub parser: ParserConfig,

    /// Utterance acceptance rules
    #[serde(default)]
    pub quality: QualityConfig,

    /// Deterministic repair policy
    #[serde(default)]
    pub fallback: FallbackConfig,
}

fn default_call_timeout_secs() -> u64 {
    60
}

fn default_max_connective_chars() -> usize {
    60
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            preference: StrategyPreference::default(),
            attempts: AttemptBudget::default(),
            call_timeout_secs: default_call_timeout_secs(),
            max_connective_chars: default_max_connective_chars(),
            parser: ParserConfig::default(),
            quality: QualityConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl RebalanceConfig {
    /// Deadline for one generation call.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}
