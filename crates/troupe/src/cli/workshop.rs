//! Workshop command handlers: feedback, final draft, stage kit, session feedback.

use super::ServiceArgs;
use super::script::read_script;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use troupe::{
    GenerationService, PracticeTurn, RoleName, TroupeConfig, Workshop, service_from_config,
};
use tracing::{info, instrument, warn};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// One rehearsal turn as recorded on disk; the score is recomputed.
#[derive(Debug, Deserialize)]
struct RecordedTurn {
    role: String,
    expected: String,
    spoken: String,
}

fn workshop(args: &ServiceArgs) -> Result<Workshop<Arc<dyn GenerationService>>, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => TroupeConfig::from_file(path)?,
        None => TroupeConfig::load()?,
    };
    let service = service_from_config(&config.service)?;
    info!(
        provider = service.provider_name(),
        model = service.model_name(),
        "Using generation service"
    );
    Ok(Workshop::with_config(service, config.workshop).with_parser(config.rebalance.parser))
}

/// Print a seven-criteria review of a script.
#[instrument(skip_all, fields(file = %file.display()))]
pub async fn run_feedback(file: &Path, args: &ServiceArgs) -> CliResult {
    let text = read_script(file)?;
    println!("{}", workshop(args)?.feedback(&text).await?);
    Ok(())
}

/// Write a polished draft to `output` or stdout.
#[instrument(skip_all, fields(file = %file.display()))]
pub async fn run_final_draft(file: &Path, output: Option<&PathBuf>, args: &ServiceArgs) -> CliResult {
    let text = read_script(file)?;
    let draft = workshop(args)?.final_draft(&text).await?;
    if draft.demoted > 0 {
        warn!(demoted = draft.demoted, "Lines by speakers outside the cast became stage directions");
    }

    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", draft.script))
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            info!(path = %path.display(), "Wrote final draft");
        }
        None => println!("{}", draft.script),
    }
    Ok(())
}

/// Print a props, set and costume checklist.
#[instrument(skip_all, fields(file = %file.display()))]
pub async fn run_stage_kit(file: &Path, args: &ServiceArgs) -> CliResult {
    let text = read_script(file)?;
    println!("{}", workshop(args)?.stage_kit(&text).await?);
    Ok(())
}

/// Print coaching notes for the turns recorded in `turns`.
#[instrument(skip_all, fields(file = %turns.display()))]
pub async fn run_session_feedback(turns: &Path, args: &ServiceArgs) -> CliResult {
    let raw = read_script(turns)?;
    let recorded: Vec<RecordedTurn> = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse {}: {}", turns.display(), e))?;
    let turns: Vec<PracticeTurn> = recorded
        .into_iter()
        .map(|t| PracticeTurn::new(RoleName::new(&t.role), t.expected, t.spoken))
        .collect();

    println!("{}", workshop(args)?.session_feedback(&turns).await?);
    Ok(())
}
