//! Simulation loop shared by the terminal and headless modes.

use std::{thread, time::Duration};

use anyhow::Result;
use lifegrid_core::{Command, Event, PopulationReport};
use lifegrid_rendering::{Frame, Glyphs, RenderingBackend};
use lifegrid_system_analytics::Analytics;
use lifegrid_system_cycle_detection::{Config as CycleConfig, CycleDetection};
use lifegrid_world::{self as world, query, LifeGrid};
use tracing::info;

/// Controls the wall-clock pause between generations.
pub(crate) trait Pacer {
    /// Blocks for roughly `delay` before the next generation is computed.
    fn pause(&mut self, delay: Duration);
}

/// Pacer that sleeps the current thread.
#[derive(Debug, Default)]
pub(crate) struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Backend that logs a summary instead of drawing the grid.
#[derive(Debug, Default)]
pub(crate) struct HeadlessBackend;

impl RenderingBackend for HeadlessBackend {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        info!(
            generation = frame.generation,
            population = frame.population,
            "generation"
        );
        Ok(())
    }
}

/// Knobs that shape a run.
#[derive(Clone, Debug)]
pub(crate) struct RunOptions {
    /// Generations to advance before stopping. `None` runs until interrupted.
    pub(crate) generations: Option<u64>,
    /// Stop as soon as a repeating state is detected.
    pub(crate) stop_on_cycle: bool,
    /// Pause before each generation.
    pub(crate) delay: Duration,
    /// Glyphs used to compose frames.
    pub(crate) glyphs: Glyphs,
    /// Cycle detection tuning.
    pub(crate) cycle: CycleConfig,
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StopReason {
    /// The requested number of generations was reached.
    GenerationLimit,
    /// A repeating state was detected.
    Cycle {
        /// Generation at which the repetition was observed.
        generation: u64,
        /// Length of the cycle.
        period: u64,
    },
}

/// Summary of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunOutcome {
    /// Generations advanced during the run.
    pub(crate) advanced: u64,
    /// Why the run ended.
    pub(crate) stop: StopReason,
    /// Final analytics report, if any generation was advanced.
    pub(crate) report: Option<PopulationReport>,
}

/// Applies `setup`, then advances the grid until a stop condition is met.
///
/// The initial state and every subsequent generation are presented through
/// `backend`. The pacer runs before each advance.
pub(crate) fn run(
    grid: &mut LifeGrid,
    setup: Vec<Command>,
    options: &RunOptions,
    backend: &mut dyn RenderingBackend,
    pacer: &mut dyn Pacer,
) -> Result<RunOutcome> {
    let mut systems = Systems::new(options.cycle);
    systems.prime(grid);
    let _ = systems.step(grid, setup);
    present(grid, &options.glyphs, backend)?;

    let mut advanced = 0u64;
    loop {
        if options.generations.is_some_and(|limit| advanced >= limit) {
            return Ok(systems.outcome(advanced, StopReason::GenerationLimit));
        }

        pacer.pause(options.delay);
        let cycle = systems.step(grid, vec![Command::Advance]);
        advanced += 1;
        present(grid, &options.glyphs, backend)?;

        if let Some((generation, period)) = cycle {
            info!(generation, period, "repeating state");
            if options.stop_on_cycle {
                return Ok(systems.outcome(advanced, StopReason::Cycle { generation, period }));
            }
        }
    }
}

fn present(grid: &LifeGrid, glyphs: &Glyphs, backend: &mut dyn RenderingBackend) -> Result<()> {
    let frame = Frame::compose(query::generation(grid), query::view(grid), glyphs);
    backend.present(&frame)
}

struct Systems {
    cycle_detection: CycleDetection,
    analytics: Analytics,
    events: Vec<Event>,
    system_events: Vec<Event>,
}

impl Systems {
    fn new(cycle: CycleConfig) -> Self {
        Self {
            cycle_detection: CycleDetection::new(cycle),
            analytics: Analytics::new(),
            events: Vec::new(),
            system_events: Vec::new(),
        }
    }

    /// Remembers the grid's current state so a run without setup still
    /// detects a return to it.
    fn prime(&mut self, grid: &LifeGrid) {
        self.cycle_detection
            .prime(query::view(grid), query::generation(grid));
    }

    /// Applies commands and runs every system over the resulting events.
    ///
    /// Returns the cycle reported for this batch, if any.
    fn step(&mut self, grid: &mut LifeGrid, commands: Vec<Command>) -> Option<(u64, u64)> {
        self.events.clear();
        self.system_events.clear();
        for command in commands {
            world::apply(grid, command, &mut self.events);
        }

        self.cycle_detection
            .handle(&self.events, query::view(grid), &mut self.system_events);
        self.analytics.handle(&self.events, &mut self.system_events);

        self.system_events.iter().find_map(|event| match event {
            Event::CycleDetected { generation, period } => Some((*generation, *period)),
            _ => None,
        })
    }

    fn outcome(&self, advanced: u64, stop: StopReason) -> RunOutcome {
        RunOutcome {
            advanced,
            stop,
            report: self.analytics.last_report().copied(),
        }
    }
}
