#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs lifegrid simulations in the terminal.

mod driver;
mod scenarios;
mod snapshot_transfer;

use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lifegrid_core::{BoundaryPolicy, Command};
use lifegrid_rendering::RenderingBackend;
use lifegrid_rendering_terminal::TerminalBackend;
use lifegrid_system_cycle_detection::{Config as CycleConfig, DEFAULT_WINDOW};
use lifegrid_system_seeding::random_soup;
use lifegrid_world::{query, LifeGrid};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::{
    driver::{HeadlessBackend, RunOptions, StopReason, ThreadPacer},
    scenarios::{Scenario, ScenarioName},
    snapshot_transfer::TransferSnapshot,
};

/// Conway's Game of Life on a fixed-size grid.
#[derive(Debug, Parser)]
#[command(name = "lifegrid", version, about)]
struct CliArgs {
    /// Built-in starting configuration.
    #[arg(long, value_enum, default_value_t = ScenarioName::Glider)]
    scenario: ScenarioName,
    /// TOML scenario file used instead of a built-in scenario.
    #[arg(long, value_name = "PATH")]
    scenario_file: Option<PathBuf>,
    /// Overrides the scenario's edge behaviour.
    #[arg(long, value_enum)]
    boundary: Option<BoundaryArg>,
    /// Overrides the pause between generations.
    #[arg(long, value_name = "MILLISECONDS")]
    delay_ms: Option<u64>,
    /// Stops after this many generations instead of running forever.
    #[arg(long, value_name = "COUNT")]
    generations: Option<u64>,
    /// Replaces the scenario's patterns with a random soup.
    #[arg(long)]
    soup: bool,
    /// Probability that a soup cell starts alive.
    #[arg(long, default_value_t = 0.33)]
    density: f64,
    /// Seed for the soup generator. Defaults to the current time.
    #[arg(long, requires = "soup")]
    seed: Option<u64>,
    /// Stops once a generation repeats a recent one.
    #[arg(long)]
    stop_on_cycle: bool,
    /// Generations remembered by cycle detection.
    #[arg(long, value_name = "GENERATIONS", default_value_t = DEFAULT_WINDOW)]
    cycle_window: usize,
    /// Logs generation summaries instead of drawing the grid.
    #[arg(long)]
    headless: bool,
    /// Starts from an exported snapshot string instead of the scenario's patterns.
    #[arg(long, value_name = "SNAPSHOT", conflicts_with = "soup")]
    import: Option<String>,
    /// Prints a snapshot string of the final generation to stdout.
    #[arg(long)]
    export: bool,
}

/// Edge behaviour accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BoundaryArg {
    /// Cells past the edge are dead.
    Clamped,
    /// Opposite edges are adjacent.
    Toroidal,
}

impl From<BoundaryArg> for BoundaryPolicy {
    fn from(value: BoundaryArg) -> Self {
        match value {
            BoundaryArg::Clamped => Self::Clamped,
            BoundaryArg::Toroidal => Self::Toroidal,
        }
    }
}

/// Entry point for the lifegrid command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut scenario = match &args.scenario_file {
        Some(path) => Scenario::from_file(path)?,
        None => Scenario::builtin(args.scenario),
    };
    if let Some(boundary) = args.boundary {
        scenario.boundary = boundary.into();
    }
    if let Some(delay_ms) = args.delay_ms {
        scenario.delay_ms = delay_ms;
    }

    let (mut grid, setup) = prepare(&args, &scenario)?;
    let dimensions = query::dimensions(&grid);
    info!(
        rows = dimensions.rows(),
        columns = dimensions.columns(),
        boundary = ?query::boundary_policy(&grid),
        "starting simulation"
    );

    let options = RunOptions {
        generations: args.generations,
        stop_on_cycle: args.stop_on_cycle,
        delay: scenario.delay(),
        glyphs: scenario.glyphs().context("invalid scenario glyphs")?,
        cycle: CycleConfig {
            window: args.cycle_window,
        },
    };

    let outcome = {
        let mut backend: Box<dyn RenderingBackend> = if args.headless {
            Box::new(HeadlessBackend)
        } else {
            Box::new(TerminalBackend::stdout()?)
        };
        driver::run(
            &mut grid,
            setup,
            &options,
            backend.as_mut(),
            &mut ThreadPacer,
        )?
    };

    if let StopReason::Cycle { generation, period } = outcome.stop {
        info!(generation, period, "stopped on repeating state");
    }
    info!(
        advanced = outcome.advanced,
        peak_population = outcome.report.map(|report| report.peak_population),
        "simulation finished"
    );

    if args.export {
        let encoded = TransferSnapshot::capture(&grid)
            .encode()
            .context("failed to export snapshot")?;
        println!("{encoded}");
    }

    Ok(())
}

/// Builds the starting grid and the commands that populate it.
fn prepare(args: &CliArgs, scenario: &Scenario) -> Result<(LifeGrid, Vec<Command>)> {
    if let Some(encoded) = &args.import {
        let imported =
            TransferSnapshot::decode(encoded).context("failed to import snapshot")?;
        let boundary = args.boundary.map_or(imported.boundary, BoundaryPolicy::from);
        return Ok((imported.restore(boundary), Vec::new()));
    }

    let dimensions = scenario
        .dimensions()
        .context("invalid scenario dimensions")?;
    let grid = LifeGrid::new(dimensions, scenario.boundary);

    if !args.soup {
        return Ok((grid, scenario.load_commands()));
    }

    let seed = args.seed.unwrap_or_else(time_seed);
    info!(seed, density = args.density, "seeding random soup");
    let pattern = random_soup(dimensions, args.density, seed).context("invalid soup")?;
    Ok((
        grid,
        vec![Command::LoadPattern {
            pattern,
            origin_row: 0,
            origin_column: 0,
        }],
    ))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
