//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Troupe - rebalance screenplay dialogue to exact per-role line counts
#[derive(Parser, Debug)]
#[command(name = "troupe")]
#[command(about = "Rebalance screenplay dialogue to exact per-role line counts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the speaking roles of a script in order of first appearance
    Roles {
        /// Path to the script
        file: PathBuf,
    },

    /// Count dialogue lines per role
    Count {
        /// Path to the script
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Rewrite a script so each listed role speaks exactly N lines
    Rebalance(RebalanceArgs),

    /// Print a role's lines together with their cues
    Cues {
        /// Path to the script
        file: PathBuf,

        /// Role whose lines to print
        #[arg(long)]
        role: String,
    },

    /// Review a script against seven criteria
    Feedback {
        /// Path to the script
        file: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Polish a script into a scene-structured performance draft
    FinalDraft {
        /// Path to the script
        file: PathBuf,

        /// Write the draft here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Draft a props, set and costume checklist
    StageKit {
        /// Path to the script
        file: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Coaching notes for a recorded rehearsal session
    SessionFeedback {
        /// JSON array of {"role", "expected", "spoken"} turns
        turns: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Score a spoken line against the scripted one
    Match {
        /// The line as written in the script
        #[arg(long)]
        expected: String,

        /// What was actually said
        #[arg(long)]
        spoken: String,
    },
}

/// Arguments of the rebalance command
#[derive(clap::Args, Debug)]
pub struct RebalanceArgs {
    /// Path to the script
    pub file: PathBuf,

    /// Target line count, as ROLE=N (repeatable)
    #[arg(short, long = "target", value_name = "ROLE=N", required = true)]
    pub targets: Vec<String>,

    /// Let the service rewrite the whole script instead of making targeted edits
    #[arg(long)]
    pub full_rewrite: bool,

    /// Do not call any generation service; fallback repair does all the work
    #[arg(long)]
    pub offline: bool,

    /// Write the rebalanced script here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the convergence report as JSON on stdout
    #[arg(long)]
    pub report_json: bool,

    /// Configuration file to use instead of the default search path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Generation service selection shared by the workshop commands
#[derive(clap::Args, Debug)]
pub struct ServiceArgs {
    /// Configuration file to use instead of the default search path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Output format options
#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
