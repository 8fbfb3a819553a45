//! Trait definitions for the Troupe dialogue rebalancer.
//!
//! The generation service is an external collaborator. This crate defines the
//! trait the engine calls it through, plus the small vocabulary shared by the
//! engine and its callers for naming strategies.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::GenerationService;
pub use types::{EditSource, StrategyKind, StrategyPreference};
