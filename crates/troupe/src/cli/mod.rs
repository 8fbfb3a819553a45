//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the troupe binary.

mod commands;
mod rebalance;
mod script;
mod workshop;

pub use commands::{Cli, Commands, OutputFormat, RebalanceArgs, ServiceArgs};
pub use rebalance::run_rebalance;
pub use script::{count_lines, list_roles, match_line, print_cues};
pub use workshop::{run_feedback, run_final_draft, run_session_feedback, run_stage_kit};
