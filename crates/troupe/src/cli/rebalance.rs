//! Rebalance command handler.

use super::RebalanceArgs;
use super::script::read_script;
use troupe::{
    Rebalancer, StrategyPreference, TroupeConfig, parse_targets, service_from_config,
};
use tracing::{info, instrument, warn};

/// Rebalance a script file.
///
/// The script goes to `--output` or stdout. The report goes to stderr, or to
/// stdout as JSON with `--report-json`; without `--output` that JSON holds
/// both the script and the report.
#[instrument(skip_all, fields(file = %args.file.display()))]
pub async fn run_rebalance(args: RebalanceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => TroupeConfig::from_file(path)?,
        None => TroupeConfig::load()?,
    };
    if args.full_rewrite {
        config.rebalance.preference = StrategyPreference::FullRewrite;
    }
    if args.offline {
        config.service.provider = "offline".to_string();
    }

    let target = parse_targets(&args.targets)?;
    let text = read_script(&args.file)?;

    let service = service_from_config(&config.service)?;
    info!(
        provider = service.provider_name(),
        model = service.model_name(),
        preference = %config.rebalance.preference,
        "Rebalancing"
    );
    let rebalancer = Rebalancer::with_config(service, config.rebalance)?;
    let outcome = rebalancer.rebalance(&text, &target).await?;

    if !outcome.report.exact() {
        warn!("Rebalance finished without reaching every target");
    }

    match (&args.output, args.report_json) {
        (Some(path), json) => {
            std::fs::write(path, format!("{}\n", outcome.script))
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            info!(path = %path.display(), "Wrote rebalanced script");
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                eprint!("{}", outcome.report);
            }
        }
        (None, true) => println!("{}", serde_json::to_string_pretty(&outcome)?),
        (None, false) => {
            println!("{}", outcome.script);
            eprint!("{}", outcome.report);
        }
    }
    Ok(())
}
