#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the lifegrid simulator.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! grid owned by the world crate, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems read immutable
//! [`GridView`] values and respond exclusively with new events.
//!
//! Everything here is pure data plus the two rules that must be bit-exact
//! across implementations: the B3/S23 transition ([`Cell::evolve`]) and
//! neighbour resolution ([`BoundaryPolicy::resolve`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// The cell holds no life.
    #[default]
    Dead,
    /// The cell is alive in the current generation.
    Alive,
}

impl Cell {
    /// Reports whether the cell is alive.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Applies the B3/S23 transition rule given the number of live neighbours.
    ///
    /// Live cells survive with two or three neighbours, dead cells are born
    /// with exactly three, and every other combination yields a dead cell.
    #[must_use]
    pub const fn evolve(self, live_neighbors: u8) -> Self {
        match (self, live_neighbors) {
            (Self::Alive, 2 | 3) | (Self::Dead, 3) => Self::Alive,
            _ => Self::Dead,
        }
    }
}

/// Location of a single grid cell expressed as zero-based row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Signed displacement relative to a pattern origin.
///
/// Serialized as a `[row, column]` pair so pattern files stay compact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct CellOffset {
    row: i64,
    column: i64,
}

impl CellOffset {
    /// Creates a new offset.
    #[must_use]
    pub const fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }

    /// Row displacement.
    #[must_use]
    pub const fn row(&self) -> i64 {
        self.row
    }

    /// Column displacement.
    #[must_use]
    pub const fn column(&self) -> i64 {
        self.column
    }
}

impl From<(i64, i64)> for CellOffset {
    fn from((row, column): (i64, i64)) -> Self {
        Self::new(row, column)
    }
}

impl From<CellOffset> for (i64, i64) {
    fn from(offset: CellOffset) -> Self {
        (offset.row, offset.column)
    }
}

/// Direction from a cell to one of its eight Moore neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NeighborOffset {
    row: i8,
    column: i8,
}

impl NeighborOffset {
    const fn new(row: i8, column: i8) -> Self {
        Self { row, column }
    }

    /// Row displacement in `-1..=1`.
    #[must_use]
    pub const fn row(&self) -> i8 {
        self.row
    }

    /// Column displacement in `-1..=1`.
    #[must_use]
    pub const fn column(&self) -> i8 {
        self.column
    }
}

/// The eight neighbour directions, row-major, excluding the cell itself.
pub const NEIGHBOR_OFFSETS: [NeighborOffset; 8] = [
    NeighborOffset::new(-1, -1),
    NeighborOffset::new(-1, 0),
    NeighborOffset::new(-1, 1),
    NeighborOffset::new(0, -1),
    NeighborOffset::new(0, 1),
    NeighborOffset::new(1, -1),
    NeighborOffset::new(1, 0),
    NeighborOffset::new(1, 1),
];

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: usize = 1 << 28;

/// Validated grid size. Both dimensions are strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions", into = "RawDimensions")]
pub struct GridDimensions {
    rows: u32,
    columns: u32,
}

impl GridDimensions {
    /// Validates the provided dimensions.
    ///
    /// Signed inputs are accepted so that callers can pass whatever they
    /// received; anything non-positive, wider than `u32`, or spanning more
    /// than [`MAX_CELLS`] cells is rejected with [`GridError::InvalidDimension`].
    pub fn new(rows: i64, columns: i64) -> Result<Self, GridError> {
        let invalid = || GridError::InvalidDimension { rows, columns };
        let checked_rows = positive_u32(rows).ok_or_else(invalid)?;
        let checked_columns = positive_u32(columns).ok_or_else(invalid)?;
        let fits = (checked_rows as usize)
            .checked_mul(checked_columns as usize)
            .is_some_and(|cells| cells <= MAX_CELLS);
        if !fits {
            return Err(invalid());
        }
        Ok(Self {
            rows: checked_rows,
            columns: checked_columns,
        })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Converts signed coordinates into a cell when they fall inside the grid.
    #[must_use]
    pub fn locate(&self, row: i64, column: i64) -> Option<CellCoord> {
        let row = u32::try_from(row).ok().filter(|row| *row < self.rows)?;
        let column = u32::try_from(column)
            .ok()
            .filter(|column| *column < self.columns)?;
        Some(CellCoord::new(row, column))
    }

    /// Row-major buffer index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() < self.rows && cell.column() < self.columns {
            Some(cell.row() as usize * self.columns as usize + cell.column() as usize)
        } else {
            None
        }
    }

    /// Inverse of [`GridDimensions::index`] for in-range buffer indices.
    #[must_use]
    pub fn coord_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }
        let width = self.columns as usize;
        let row = u32::try_from(index / width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        Some(CellCoord::new(row, column))
    }
}

fn positive_u32(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|value| *value > 0)
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawDimensions {
    rows: i64,
    columns: i64,
}

impl TryFrom<RawDimensions> for GridDimensions {
    type Error = GridError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.rows, raw.columns)
    }
}

impl From<GridDimensions> for RawDimensions {
    fn from(dimensions: GridDimensions) -> Self {
        Self {
            rows: i64::from(dimensions.rows),
            columns: i64::from(dimensions.columns),
        }
    }
}

/// How neighbour lookups behave at the grid edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Cells beyond the edge do not exist and never count as neighbours.
    Clamped,
    /// Opposite edges are adjacent; the grid behaves as a torus.
    Toroidal,
}

impl BoundaryPolicy {
    /// Resolves the neighbour of `base` in direction `offset`.
    ///
    /// Returns `None` when the clamped policy places the neighbour outside
    /// the grid. The toroidal policy always resolves, wrapping each axis with
    /// a non-negative modulo.
    #[must_use]
    pub fn resolve(
        self,
        dimensions: GridDimensions,
        base: CellCoord,
        offset: NeighborOffset,
    ) -> Option<CellCoord> {
        let row = i64::from(base.row()) + i64::from(offset.row());
        let column = i64::from(base.column()) + i64::from(offset.column());
        match self {
            Self::Clamped => dimensions.locate(row, column),
            Self::Toroidal => {
                let row = row.rem_euclid(i64::from(dimensions.rows()));
                let column = column.rem_euclid(i64::from(dimensions.columns()));
                Some(CellCoord::new(
                    u32::try_from(row).ok()?,
                    u32::try_from(column).ok()?,
                ))
            }
        }
    }
}

/// Ordered set of live-cell offsets relative to a placement origin.
///
/// Patterns carry no knowledge of where they will be placed or how large the
/// target grid is; offsets that land outside the grid are dropped on load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    offsets: Vec<CellOffset>,
}

impl Pattern {
    /// Creates a pattern from the provided offsets.
    #[must_use]
    pub fn new(offsets: Vec<CellOffset>) -> Self {
        Self { offsets }
    }

    /// Creates a pattern from `(row, column)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(i64, i64)]) -> Self {
        pairs.iter().copied().collect()
    }

    /// Offsets in declaration order.
    #[must_use]
    pub fn offsets(&self) -> &[CellOffset] {
        &self.offsets
    }

    /// Number of offsets in the pattern.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Reports whether the pattern has no offsets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl FromIterator<(i64, i64)> for Pattern {
    fn from_iter<I: IntoIterator<Item = (i64, i64)>>(iter: I) -> Self {
        Self {
            offsets: iter.into_iter().map(CellOffset::from).collect(),
        }
    }
}

/// Outcome of stamping a pattern onto the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PatternPlacement {
    /// Offsets that landed inside the grid.
    pub placed: usize,
    /// Offsets that fell outside the grid and were discarded.
    pub dropped: usize,
}

/// Summary of a single completed generation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GenerationSummary {
    /// Generation number now held by the grid.
    pub generation: u64,
    /// Live cells in the new generation.
    pub population: usize,
    /// Cells that were dead and became alive.
    pub births: usize,
    /// Cells that were alive and died.
    pub deaths: usize,
}

/// Aggregated population statistics produced by the analytics system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PopulationReport {
    /// Generation the report describes.
    pub generation: u64,
    /// Live cells in that generation.
    pub population: usize,
    /// Largest population observed since the last reset.
    pub peak_population: usize,
    /// Births during the most recent step.
    pub births: usize,
    /// Deaths during the most recent step.
    pub deaths: usize,
    /// Births accumulated since the last reset.
    pub total_births: u64,
    /// Deaths accumulated since the last reset.
    pub total_deaths: u64,
}

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Stamps a pattern onto the current generation.
    LoadPattern {
        /// Offsets to mark alive.
        pattern: Pattern,
        /// Row the offsets are measured from.
        origin_row: i64,
        /// Column the offsets are measured from.
        origin_column: i64,
    },
    /// Advances the simulation by exactly one generation.
    Advance,
    /// Kills every cell without resetting the generation counter.
    Clear,
}

/// Events broadcast after processing commands or running systems.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a pattern was stamped onto the grid.
    PatternLoaded {
        /// Generation the pattern was loaded into.
        generation: u64,
        /// How many offsets were placed or dropped.
        placement: PatternPlacement,
    },
    /// Announces that the grid completed a generation step.
    GenerationAdvanced {
        /// Statistics describing the step.
        summary: GenerationSummary,
    },
    /// Confirms that every cell was cleared.
    GridCleared {
        /// Generation that was cleared.
        generation: u64,
    },
    /// Reports that the current generation repeats an earlier one.
    CycleDetected {
        /// Generation at which the repetition was observed.
        generation: u64,
        /// Distance in generations to the earlier identical state.
        period: u64,
    },
    /// Publishes refreshed population statistics.
    PopulationUpdated {
        /// Most recent population report.
        report: PopulationReport,
    },
}

/// Errors raised while building grid descriptions.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// One of the requested dimensions was zero, negative or too large.
    #[error(
        "grid dimensions must be positive and span at most {max} cells \
         (received {rows} rows x {columns} columns)",
        max = MAX_CELLS
    )]
    InvalidDimension {
        /// Requested number of rows.
        rows: i64,
        /// Requested number of columns.
        columns: i64,
    },
    /// A snapshot's cell buffer does not match its dimensions.
    #[error("snapshot holds {actual} cells but its dimensions require {expected}")]
    CellCountMismatch {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },
}

/// Read-only view into one generation.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Cell],
    dimensions: GridDimensions,
}

impl<'a> GridView<'a> {
    /// Captures a view over a row-major cell slice.
    ///
    /// The slice length must equal `dimensions.cell_count()`.
    #[must_use]
    pub fn new(cells: &'a [Cell], dimensions: GridDimensions) -> Self {
        debug_assert_eq!(cells.len(), dimensions.cell_count());
        Self { cells, dimensions }
    }

    /// Dimensions of the viewed grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Returns the state of the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Row-major cell slice.
    #[must_use]
    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    /// Iterator over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [Cell]> + 'a {
        self.cells.chunks(self.dimensions.columns() as usize)
    }

    /// Iterator over the coordinates of every live cell in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = CellCoord> + 'a {
        let dimensions = self.dimensions;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
            .filter_map(move |(index, _)| dimensions.coord_at(index))
    }

    /// Number of live cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Copies the viewed generation into an owned snapshot.
    #[must_use]
    pub fn to_snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            dimensions: self.dimensions,
            cells: self.cells.to_vec(),
        }
    }
}

/// Owned copy of a single generation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct GridSnapshot {
    dimensions: GridDimensions,
    cells: Vec<Cell>,
}

impl GridSnapshot {
    /// Builds a snapshot in which exactly the listed cells are alive.
    ///
    /// Coordinates outside the dimensions are ignored.
    #[must_use]
    pub fn from_live_cells(
        dimensions: GridDimensions,
        live: impl IntoIterator<Item = CellCoord>,
    ) -> Self {
        let mut cells = vec![Cell::Dead; dimensions.cell_count()];
        for coord in live {
            if let Some(index) = dimensions.index(coord) {
                cells[index] = Cell::Alive;
            }
        }
        Self { dimensions, cells }
    }

    /// Borrows the snapshot as a [`GridView`].
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.dimensions)
    }

    /// Dimensions of the captured grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Returns the state of the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn cell_at(&self, cell: CellCoord) -> Option<Cell> {
        self.view().cell(cell)
    }

    /// Number of live cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.view().population()
    }

    /// Coordinates of every live cell in row-major order.
    #[must_use]
    pub fn live_cells(&self) -> Vec<CellCoord> {
        self.view().live_cells().collect()
    }
}

#[derive(Deserialize)]
struct RawSnapshot {
    dimensions: GridDimensions,
    cells: Vec<Cell>,
}

impl TryFrom<RawSnapshot> for GridSnapshot {
    type Error = GridError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let expected = raw.dimensions.cell_count();
        if raw.cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: raw.cells.len(),
            });
        }
        Ok(Self {
            dimensions: raw.dimensions,
            cells: raw.cells,
        })
    }
}
