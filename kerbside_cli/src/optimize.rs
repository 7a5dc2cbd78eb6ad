use std::{fs::File, io::BufReader, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use kerbside_optimizer::{
    config::OptimizerConfig,
    enrichment::Itinerary,
    json::types::JsonOptimizationInput,
    optimizer::Optimizer,
    problem::{depot::Depot, vehicle::Vehicle, waste_point::WastePoint},
    routing::{OfflineProvider, RoutingProvider},
    solver::solver_params::{SolverParams, Termination},
};
use kerbside_osrm::{OsrmClient, OsrmClientParams};
use tracing::{info, warn};

use crate::{output, parsers};

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Args)]
pub struct OptimizeArgs {
    /// JSON file with the depot, the points and the vehicles
    input: PathBuf,

    /// Base URL of the OSRM server
    #[arg(long, env = "KERBSIDE_OSRM_URL")]
    osrm_url: Option<String>,

    /// OSRM routing profile
    #[arg(long, default_value = "driving")]
    profile: String,

    /// Skips the routing server, distances and durations are estimated
    #[arg(long)]
    offline: bool,

    /// Time budget of the solver (e.g., "30s", "5m", "PT1M30S")
    #[arg(short, long, value_parser = parsers::parse_duration, default_value = "30s")]
    duration: jiff::SignedDuration,

    /// Stops the search after this many iterations without improvement
    #[arg(long, default_value_t = 10_000)]
    max_stalled_iterations: usize,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

pub async fn run(args: OptimizeArgs) -> Result<(), anyhow::Error> {
    info!("Optimizing {:?}", args.input);

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let input: JsonOptimizationInput = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid optimization input {}", args.input.display()))?;
    let (depot, points, vehicles) = input.into_parts();

    let config = OptimizerConfig {
        solver: SolverParams {
            terminations: vec![
                Termination::Duration(args.duration),
                Termination::IterationsWithoutImprovement(args.max_stalled_iterations),
            ],
            ..SolverParams::default()
        },
        ..OptimizerConfig::default()
    };

    let itineraries = match (&args.osrm_url, args.offline) {
        (Some(osrm_url), false) => {
            let client = OsrmClient::new(OsrmClientParams {
                profile: args.profile.clone(),
                ..OsrmClientParams::new(osrm_url)
            })?;
            optimize(client, config, &depot, &points, &vehicles).await?
        }
        (None, false) => {
            warn!("No OSRM URL configured, running offline");
            optimize(OfflineProvider, config, &depot, &points, &vehicles).await?
        }
        (_, true) => optimize(OfflineProvider, config, &depot, &points, &vehicles).await?,
    };

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&itineraries)?),
        OutputFormat::Table => println!("{}", output::itineraries_table(&itineraries)),
    }

    Ok(())
}

async fn optimize<P>(
    provider: P,
    config: OptimizerConfig,
    depot: &Depot,
    points: &[WastePoint],
    vehicles: &[Vehicle],
) -> Result<Vec<Itinerary>, anyhow::Error>
where
    P: RoutingProvider,
{
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} ({elapsed})")?);
    bar.set_message(format!(
        "Routing {} points with {} vehicles",
        points.len(),
        vehicles.len()
    ));
    bar.enable_steady_tick(Duration::from_millis(120));

    let result = Optimizer::new(provider, config)
        .optimize(depot, points, vehicles)
        .await;

    bar.finish_and_clear();

    Ok(result?)
}
