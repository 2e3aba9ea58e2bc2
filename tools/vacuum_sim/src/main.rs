//! # vacuum_sim - Headless Vacuum Robot Simulator
//!
//! Runs the cleaning loop without a window and reports progress.
//!
//! Usage:
//!   vacuum_sim                                  # Default house, wall following
//!   vacuum_sim --config house.toml              # Custom config (TOML or YAML)
//!   vacuum_sim --strategy random-bounce --seed 7
//!   vacuum_sim --ticks 10000 --json             # Machine-readable summary
//!
//! Log verbosity follows `RUST_LOG`, e.g. `RUST_LOG=vacuum_core=debug` to
//! trace controller state changes.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vacuum_core::algorithms::navigation::{AutoStrategy, ControlMode};
use vacuum_core::{KeyState, SimConfig, SimEvent, SimStats, Simulation};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "vacuum_sim")]
#[command(about = "Headless 2D vacuum robot simulator")]
struct Args {
    /// Simulator configuration file (.toml, otherwise YAML)
    #[arg(long)]
    config: Option<String>,

    /// Ticks to run before giving up
    #[arg(long, default_value = "3000")]
    ticks: u64,

    /// Random seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Manual mode with no keys held
    #[arg(long)]
    manual: bool,

    /// Automatic navigation strategy (overrides the config)
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Log progress every N ticks (0 disables)
    #[arg(long, default_value = "300")]
    report_every: u64,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    WallFollowing,
    RandomBounce,
}

impl From<Strategy> for AutoStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::WallFollowing => AutoStrategy::WallFollowing,
            Strategy::RandomBounce => AutoStrategy::RandomBounce,
        }
    }
}

/// Final run summary
#[derive(Debug, Serialize)]
struct Summary {
    clean: bool,
    #[serde(flatten)]
    stats: SimStats,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => SimConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.manual {
        config.control.mode = ControlMode::Manual;
    }
    if let Some(strategy) = args.strategy {
        config.control.strategy = strategy.into();
    }

    Ok(config)
}

fn run(sim: &mut Simulation, ticks: u64, report_every: u64) {
    let keys = KeyState::idle();

    for _ in 0..ticks {
        for event in sim.step(&keys) {
            if let SimEvent::AllClean { frame } = event {
                info!("House clean at frame {}", frame);
            }
        }

        if report_every > 0 && sim.frame() % report_every == 0 {
            let stats = sim.stats();
            info!(
                "[{:>6}] {:>3}% clean, {} dust left, {} collisions, wall state {:?}",
                stats.frame,
                stats.cleaned_percent,
                stats.dust_remaining,
                stats.collisions,
                sim.controller().wall_state()
            );
        }

        if sim.is_clean() {
            break;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vacuum_sim=info,vacuum_core=info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    info!(
        "Starting vacuum_sim: {:?} mode, {:?}, {} Hz",
        config.control.mode, config.control.strategy, config.control.frequency
    );

    let mut sim = Simulation::builder()
        .with_config(config)
        .build()
        .context("Failed to build simulation")?;

    run(&mut sim, args.ticks, args.report_every);

    let summary = Summary {
        clean: sim.is_clean(),
        stats: sim.stats(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!(
            "Finished after {} frames ({:.1}s): {}% clean, {} collisions",
            summary.stats.frame,
            summary.stats.elapsed_secs,
            summary.stats.cleaned_percent,
            summary.stats.collisions
        );
    }

    Ok(())
}
