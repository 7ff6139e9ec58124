use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use driftfield_app::game_loop::{spawn_game_loop, LoopSettings, Pacing};
use driftfield_app::logging::LogNotifier;
use driftfield_app::state::{shared_snapshot, RunSummary};
use driftfield_app::{init_logging, AppError};
use driftfield_core::commands::PlayerCommand;
use driftfield_core::config::WorldConfig;
use driftfield_core::enums::DroneMode;
use driftfield_sim::persistence::{records_from_json, records_to_json};
use driftfield_sim::SimulationEngine;

/// Headless DRIFTFIELD simulation runner
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World configuration (TOML); compiled defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run (30 per simulated second)
    #[arg(short, long, default_value_t = 1800)]
    ticks: u64,

    /// Override the RNG seed from the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Engage the autopilot at start
    #[arg(long)]
    autopilot: bool,

    /// Install the drone and send it out to free-roam
    #[arg(long)]
    drone: bool,

    /// Hold the nominal tick rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Restore the entity population from a save file
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the entity population to a save file when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.drone {
        config.drone_enabled = true;
    }

    let mut engine = SimulationEngine::new(config);
    if let Some(path) = &args.load {
        let json = std::fs::read_to_string(path).map_err(|source| save_error(path, source))?;
        let restored = engine.restore_entities(&records_from_json(&json)?);
        log::info!("restored {restored} entities from {}", path.display());
    }

    engine.attach_notifier(Box::new(LogNotifier::new()));
    if args.autopilot {
        engine.queue_command(PlayerCommand::ToggleAutopilot);
    }
    if args.drone {
        engine.queue_command(PlayerCommand::SetDroneMode {
            mode: DroneMode::FreeRoam,
        });
    }

    let latest = shared_snapshot();
    let settings = LoopSettings {
        pacing: if args.realtime {
            Pacing::Realtime
        } else {
            Pacing::Unthrottled
        },
        tick_limit: Some(args.ticks),
    };
    let engine = spawn_game_loop(engine, settings, latest.clone())?.join()?;

    let summary = latest
        .lock()
        .ok()
        .and_then(|snapshot| snapshot.as_ref().map(RunSummary::from_snapshot));
    match summary {
        Some(summary) if args.json => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => log::warn!("could not encode summary: {err}"),
        },
        Some(summary) => log::info!("run finished: {summary}"),
        None => log::info!("run finished without ticking"),
    }

    if let Some(path) = &args.save {
        let json = records_to_json(&engine.export_entities())?;
        std::fs::write(path, json).map_err(|source| save_error(path, source))?;
        log::info!(
            "saved {} entities to {}",
            engine.registry().live_count(),
            path.display()
        );
    }
    Ok(())
}

fn save_error(path: &Path, source: std::io::Error) -> AppError {
    AppError::SaveFile {
        path: path.to_path_buf(),
        source,
    }
}
