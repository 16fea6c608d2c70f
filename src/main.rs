use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use stalker::init_logging;
use stalker::numeric::ticks_for;
use stalker::sim::{self, Scenario};

/// Runs a headless pursuit scenario
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON scenario file; the built-in arena is used when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u32>,

    /// Seconds per tick
    #[arg(long)]
    dt: Option<f32>,

    /// Simulated duration in seconds; overrides --ticks
    #[arg(long)]
    seconds: Option<f32>,

    /// Seed for the pursuer's charge rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Write the per-tick trace as JSON to this path
    #[arg(long)]
    trace: Option<PathBuf>,
}

fn read_scenario(path: &Path) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    Scenario::from_json_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
}

fn load_scenario(args: &Args) -> Result<Scenario> {
    let mut scenario = args
        .scenario
        .as_deref()
        .map(read_scenario)
        .transpose()?
        .unwrap_or_default();
    if let Some(ticks) = args.ticks {
        scenario.ticks = ticks;
    }
    if let Some(dt) = args.dt {
        scenario.dt = dt;
    }
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }
    if let Some(seconds) = args.seconds {
        scenario.ticks = ticks_for(seconds, scenario.dt)
            .with_context(|| format!("cannot cover {seconds}s with ticks of {}s", scenario.dt))?;
    }
    Ok(scenario)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let scenario = load_scenario(&args)?;
    let report = sim::run(&scenario).context("invalid pursuer configuration")?;

    let final_state = report
        .frames
        .last()
        .map_or_else(|| String::from("wait"), |frame| frame.pursuer.state.to_string());
    info!(
        "simulated {} ticks: {} catches, {} events, final state {final_state}",
        report.frames.len(),
        report.catches(),
        report.events.len()
    );

    if let Some(path) = &args.trace {
        let json = serde_json::to_string_pretty(&report).context("serialising trace")?;
        fs::write(path, json).with_context(|| format!("writing trace {}", path.display()))?;
        info!("trace written to {}", path.display());
    }
    Ok(())
}
