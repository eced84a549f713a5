//! Built-in starting configurations and the TOML scenario format.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use clap::ValueEnum;
use lifegrid_core::{BoundaryPolicy, Command, GridDimensions, GridError, Pattern};
use lifegrid_rendering::{Glyphs, RenderingError, DEFAULT_ALIVE_GLYPH, DEFAULT_DEAD_GLYPH};
use serde::{Deserialize, Serialize};

const GLIDER: &[(i64, i64)] = &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];

const BLINKER: &[(i64, i64)] = &[(0, 0), (0, 1), (0, 2)];

const TOAD: &[(i64, i64)] = &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)];

const BEACON: &[(i64, i64)] = &[
    (0, 0),
    (0, 1),
    (1, 0),
    (1, 1),
    (2, 2),
    (2, 3),
    (3, 2),
    (3, 3),
];

const LWSS: &[(i64, i64)] = &[
    (0, 1),
    (0, 4),
    (1, 0),
    (2, 0),
    (2, 4),
    (3, 0),
    (3, 1),
    (3, 2),
    (3, 3),
];

// Gosper glider gun.
const GUN: &[(i64, i64)] = &[
    (1, 25),
    (2, 23),
    (2, 25),
    (3, 13),
    (3, 14),
    (3, 21),
    (3, 22),
    (3, 35),
    (3, 36),
    (4, 12),
    (4, 16),
    (4, 21),
    (4, 22),
    (4, 35),
    (4, 36),
    (5, 1),
    (5, 2),
    (5, 11),
    (5, 17),
    (5, 21),
    (5, 22),
    (6, 1),
    (6, 2),
    (6, 11),
    (6, 15),
    (6, 17),
    (6, 18),
    (6, 23),
    (6, 25),
    (7, 11),
    (7, 17),
    (7, 25),
    (8, 12),
    (8, 16),
    (9, 13),
    (9, 14),
];

const PULSAR: &[(i64, i64)] = &[
    (1, 3),
    (1, 4),
    (1, 5),
    (1, 9),
    (1, 10),
    (1, 11),
    (3, 1),
    (3, 6),
    (3, 8),
    (3, 13),
    (4, 1),
    (4, 6),
    (4, 8),
    (4, 13),
    (5, 1),
    (5, 6),
    (5, 8),
    (5, 13),
    (6, 3),
    (6, 4),
    (6, 5),
    (6, 9),
    (6, 10),
    (6, 11),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 9),
    (8, 10),
    (8, 11),
    (9, 1),
    (9, 6),
    (9, 8),
    (9, 13),
    (10, 1),
    (10, 6),
    (10, 8),
    (10, 13),
    (11, 1),
    (11, 6),
    (11, 8),
    (11, 13),
    (13, 3),
    (13, 4),
    (13, 5),
    (13, 9),
    (13, 10),
    (13, 11),
];

/// Names of the built-in scenarios.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ScenarioName {
    /// Two gliders on a wrapping 15x30 grid.
    Glider,
    /// A single blinker on a wrapping 7x15 grid.
    Blinker,
    /// Two toads on a wrapping 15x30 grid.
    Toad,
    /// A beacon on a bounded 10x30 grid.
    Beacon,
    /// A pulsar on a bounded 30x60 grid.
    Pulsar,
    /// A Gosper glider gun on a bounded 40x100 grid.
    Gun,
    /// A lightweight spaceship near the corner of a bounded 20x40 grid.
    Lwss,
}

/// Pattern stamped at a fixed origin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Placement {
    /// `(row, column)` the offsets are measured from.
    pub(crate) origin: (i64, i64),
    /// Offsets to mark alive.
    pub(crate) cells: Pattern,
}

impl Placement {
    fn new(origin_row: i64, origin_column: i64, cells: &[(i64, i64)]) -> Self {
        Self {
            origin: (origin_row, origin_column),
            cells: Pattern::from_pairs(cells),
        }
    }
}

fn default_alive_glyph() -> String {
    DEFAULT_ALIVE_GLYPH.to_owned()
}

fn default_dead_glyph() -> String {
    DEFAULT_DEAD_GLYPH.to_owned()
}

/// Complete description of a simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Grid height in cells.
    pub(crate) rows: i64,
    /// Grid width in cells.
    pub(crate) columns: i64,
    /// Edge behaviour.
    pub(crate) boundary: BoundaryPolicy,
    /// Glyph drawn for live cells.
    #[serde(default = "default_alive_glyph")]
    pub(crate) alive_glyph: String,
    /// Glyph drawn for dead cells.
    #[serde(default = "default_dead_glyph")]
    pub(crate) dead_glyph: String,
    /// Pause between generations in milliseconds.
    #[serde(default)]
    pub(crate) delay_ms: u64,
    /// Patterns loaded before the first generation.
    #[serde(default)]
    pub(crate) patterns: Vec<Placement>,
}

impl Scenario {
    /// Returns the configuration of a built-in scenario.
    pub(crate) fn builtin(name: ScenarioName) -> Self {
        let wrapping = |rows, columns, dead: &str, delay_ms, patterns| Self {
            rows,
            columns,
            boundary: BoundaryPolicy::Toroidal,
            alive_glyph: "o ".to_owned(),
            dead_glyph: dead.to_owned(),
            delay_ms,
            patterns,
        };
        let bounded = |rows, columns, alive: &str, delay_ms, patterns| Self {
            rows,
            columns,
            boundary: BoundaryPolicy::Clamped,
            alive_glyph: alive.to_owned(),
            dead_glyph: " ".to_owned(),
            delay_ms,
            patterns,
        };

        match name {
            ScenarioName::Glider => wrapping(
                15,
                30,
                ". ",
                1000,
                vec![Placement::new(1, 1, GLIDER), Placement::new(5, 4, GLIDER)],
            ),
            ScenarioName::Blinker => wrapping(7, 15, "  ", 5, vec![Placement::new(3, 7, BLINKER)]),
            ScenarioName::Toad => wrapping(
                15,
                30,
                "  ",
                1000,
                vec![Placement::new(5, 9, TOAD), Placement::new(10, 11, TOAD)],
            ),
            ScenarioName::Beacon => bounded(10, 30, "O", 500, vec![Placement::new(3, 3, BEACON)]),
            ScenarioName::Gun => bounded(40, 100, "X", 1, vec![Placement::new(5, 5, GUN)]),
            ScenarioName::Lwss => bounded(20, 40, "O", 1, vec![Placement::new(15, 35, LWSS)]),
            ScenarioName::Pulsar => bounded(30, 60, "X", 0, vec![Placement::new(10, 20, PULSAR)]),
        }
    }

    /// Loads a scenario from a TOML file.
    pub(crate) fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse scenario file {}", path.display()))
    }

    /// Parses a scenario from TOML text.
    pub(crate) fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validated grid dimensions.
    pub(crate) fn dimensions(&self) -> Result<GridDimensions, GridError> {
        GridDimensions::new(self.rows, self.columns)
    }

    /// Validated glyph pair.
    pub(crate) fn glyphs(&self) -> Result<Glyphs, RenderingError> {
        Glyphs::new(self.alive_glyph.as_str(), self.dead_glyph.as_str())
    }

    /// Pause between generations.
    pub(crate) fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Commands that stamp every placement onto a fresh grid.
    pub(crate) fn load_commands(&self) -> Vec<Command> {
        self.patterns
            .iter()
            .map(|placement| Command::LoadPattern {
                pattern: placement.cells.clone(),
                origin_row: placement.origin.0,
                origin_column: placement.origin.1,
            })
            .collect()
    }
}
