//! Shared enums describing rebalance mechanisms.

use serde::{Deserialize, Serialize};

/// The three generative rebalance strategies.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use troupe_interface::StrategyKind;
///
/// assert_eq!(StrategyKind::Additive.to_string(), "additive");
/// assert_eq!(StrategyKind::from_str("full_rewrite").unwrap(), StrategyKind::FullRewrite);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    /// The service may rewrite the whole script
    FullRewrite,
    /// The service may only insert dialogue lines
    Additive,
    /// The service may only delete dialogue lines
    Subtractive,
}

/// Which mechanism made the last change to a role's line count.
///
/// # Examples
///
/// ```
/// use troupe_interface::{EditSource, StrategyKind};
///
/// assert_eq!(EditSource::Generative(StrategyKind::Additive).to_string(), "generative (additive)");
/// assert_eq!(EditSource::Fallback.to_string(), "fallback");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mechanism", content = "strategy")]
pub enum EditSource {
    /// The role's count was never changed
    Unchanged,
    /// A generative strategy changed it last
    Generative(StrategyKind),
    /// Deterministic fallback repair changed it last
    Fallback,
}

impl std::fmt::Display for EditSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditSource::Unchanged => write!(f, "unchanged"),
            EditSource::Generative(kind) => write!(f, "generative ({})", kind),
            EditSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Caller preference for how much freedom the generation service gets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyPreference {
    /// Additive/subtractive edits that preserve existing lines
    #[default]
    Targeted,
    /// One rewrite-and-verify pass with maximal narrative freedom
    FullRewrite,
}
