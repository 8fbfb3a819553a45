//! Troupe CLI binary.
//!
//! This binary provides command-line access to Troupe's functionality:
//! - Inspect a script's roles and line counts
//! - Rebalance a script to exact per-role line counts
//! - Print cue cards and score rehearsal lines
//! - Review and polish scripts, draft stage kits, coach rehearsals

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, count_lines, list_roles, match_line, print_cues, run_feedback,
        run_final_draft, run_rebalance, run_session_feedback, run_stage_kit,
    };

    // Load .env so OPENAI_API_KEY can live next to the scripts
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over the verbose flag
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute the requested command
    match cli.command {
        Commands::Roles { file } => list_roles(&file)?,
        Commands::Count { file, format } => count_lines(&file, &format)?,
        Commands::Rebalance(args) => run_rebalance(args).await?,
        Commands::Cues { file, role } => print_cues(&file, &role)?,
        Commands::Feedback { file, service } => run_feedback(&file, &service).await?,
        Commands::FinalDraft {
            file,
            output,
            service,
        } => run_final_draft(&file, output.as_ref(), &service).await?,
        Commands::StageKit { file, service } => run_stage_kit(&file, &service).await?,
        Commands::SessionFeedback { turns, service } => {
            run_session_feedback(&turns, &service).await?
        }
        Commands::Match { expected, spoken } => match_line(&expected, &spoken)?,
    }

    Ok(())
}
