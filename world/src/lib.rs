#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for lifegrid.
//!
//! [`LifeGrid`] owns the current and next generation buffers. Generations are
//! produced by computing every cell of the next buffer from the current one
//! and then swapping the two, so no cell ever observes a partially updated
//! neighbourhood.

mod stepping;

use lifegrid_core::{
    BoundaryPolicy, Cell, CellCoord, Command, Event, GenerationSummary, GridDimensions,
    GridError, GridSnapshot, GridView, Pattern, PatternPlacement,
};
use tracing::{debug, trace};

/// Double-buffered Game of Life grid.
#[derive(Clone, Debug)]
pub struct LifeGrid {
    dimensions: GridDimensions,
    policy: BoundaryPolicy,
    current: Vec<Cell>,
    next: Vec<Cell>,
    generation: u64,
}

impl LifeGrid {
    /// Creates an all-dead grid with the provided dimensions and edge policy.
    #[must_use]
    pub fn new(dimensions: GridDimensions, policy: BoundaryPolicy) -> Self {
        let cells = dimensions.cell_count();
        Self {
            dimensions,
            policy,
            current: vec![Cell::Dead; cells],
            next: vec![Cell::Dead; cells],
            generation: 0,
        }
    }

    /// Validates raw dimensions and creates an all-dead grid.
    pub fn with_size(rows: i64, columns: i64, policy: BoundaryPolicy) -> Result<Self, GridError> {
        Ok(Self::new(GridDimensions::new(rows, columns)?, policy))
    }

    /// Restores a grid from a captured generation.
    #[must_use]
    pub fn from_snapshot(snapshot: &GridSnapshot, policy: BoundaryPolicy, generation: u64) -> Self {
        let mut grid = Self::new(snapshot.dimensions(), policy);
        grid.current.copy_from_slice(snapshot.view().cells());
        grid.generation = generation;
        grid
    }

    /// Marks every offset of `pattern`, measured from the origin, alive.
    ///
    /// Offsets that land outside the grid are discarded. Only the current
    /// generation is modified.
    pub fn load_pattern(
        &mut self,
        pattern: &Pattern,
        origin_row: i64,
        origin_column: i64,
    ) -> PatternPlacement {
        let mut placement = PatternPlacement::default();
        for offset in pattern.offsets() {
            let index = origin_row
                .checked_add(offset.row())
                .zip(origin_column.checked_add(offset.column()))
                .and_then(|(row, column)| self.dimensions.locate(row, column))
                .and_then(|cell| self.dimensions.index(cell));

            match index {
                Some(index) => {
                    self.current[index] = Cell::Alive;
                    placement.placed += 1;
                }
                None => placement.dropped += 1,
            }
        }

        trace!(
            origin_row,
            origin_column,
            placed = placement.placed,
            dropped = placement.dropped,
            "pattern loaded"
        );
        placement
    }

    /// Number of live neighbours of `cell` in the current generation.
    #[must_use]
    pub fn count_live_neighbors(&self, cell: CellCoord) -> u8 {
        stepping::live_neighbors(&self.current, self.dimensions, self.policy, cell)
    }

    /// Advances the grid by exactly one generation.
    pub fn advance(&mut self) -> GenerationSummary {
        stepping::compute_next(&self.current, &mut self.next, self.dimensions, self.policy);
        let (births, deaths) = stepping::tally_changes(&self.current, &self.next);
        std::mem::swap(&mut self.current, &mut self.next);
        self.generation = self.generation.saturating_add(1);

        let summary = GenerationSummary {
            generation: self.generation,
            population: self.view().population(),
            births,
            deaths,
        };
        debug!(
            generation = summary.generation,
            population = summary.population,
            births,
            deaths,
            "advanced generation"
        );
        summary
    }

    /// Kills every cell of the current generation.
    pub fn clear(&mut self) {
        self.current.fill(Cell::Dead);
    }

    /// State of `cell` in the current generation, or `None` outside the grid.
    #[must_use]
    pub fn cell_at(&self, cell: CellCoord) -> Option<Cell> {
        self.view().cell(cell)
    }

    /// Owned copy of the current generation.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        self.view().to_snapshot()
    }

    fn view(&self) -> GridView<'_> {
        GridView::new(&self.current, self.dimensions)
    }
}

/// Applies the provided command to the grid, reporting what happened.
pub fn apply(grid: &mut LifeGrid, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadPattern {
            pattern,
            origin_row,
            origin_column,
        } => {
            let placement = grid.load_pattern(&pattern, origin_row, origin_column);
            out_events.push(Event::PatternLoaded {
                generation: grid.generation,
                placement,
            });
        }
        Command::Advance => {
            let summary = grid.advance();
            out_events.push(Event::GenerationAdvanced { summary });
        }
        Command::Clear => {
            grid.clear();
            out_events.push(Event::GridCleared {
                generation: grid.generation,
            });
        }
    }
}

/// Query functions that provide read-only access to the grid.
pub mod query {
    use super::LifeGrid;
    use lifegrid_core::{BoundaryPolicy, GridDimensions, GridView};

    /// Borrows the current generation.
    #[must_use]
    pub fn view(grid: &LifeGrid) -> GridView<'_> {
        grid.view()
    }

    /// Number of generations advanced since construction.
    #[must_use]
    pub fn generation(grid: &LifeGrid) -> u64 {
        grid.generation
    }

    /// Live cells in the current generation.
    #[must_use]
    pub fn population(grid: &LifeGrid) -> usize {
        grid.view().population()
    }

    /// Dimensions fixed at construction.
    #[must_use]
    pub fn dimensions(grid: &LifeGrid) -> GridDimensions {
        grid.dimensions
    }

    /// Edge policy fixed at construction.
    #[must_use]
    pub fn boundary_policy(grid: &LifeGrid) -> BoundaryPolicy {
        grid.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blinker_grid() -> LifeGrid {
        let mut grid = LifeGrid::with_size(5, 5, BoundaryPolicy::Clamped).expect("grid");
        let _ = grid.load_pattern(&Pattern::from_pairs(&[(0, 0), (0, 1), (0, 2)]), 2, 1);
        grid
    }

    #[test]
    fn new_grid_is_dead_at_generation_zero() {
        let grid = LifeGrid::with_size(3, 4, BoundaryPolicy::Toroidal).expect("grid");
        assert_eq!(query::generation(&grid), 0);
        assert_eq!(query::population(&grid), 0);
        assert_eq!(grid.next.len(), 12);
    }

    #[test]
    fn advance_swaps_buffers_and_counts_generations() {
        let mut grid = blinker_grid();
        let summary = grid.advance();
        assert_eq!(
            summary,
            GenerationSummary {
                generation: 1,
                population: 3,
                births: 2,
                deaths: 2,
            }
        );
        assert_eq!(grid.cell_at(CellCoord::new(1, 2)), Some(Cell::Alive));
        assert_eq!(grid.cell_at(CellCoord::new(2, 1)), Some(Cell::Dead));
    }

    #[test]
    fn clear_keeps_the_generation_counter() {
        let mut grid = blinker_grid();
        let _ = grid.advance();
        grid.clear();
        assert_eq!(query::population(&grid), 0);
        assert_eq!(query::generation(&grid), 1);
    }

    #[test]
    fn apply_reports_each_command() {
        let mut grid = LifeGrid::with_size(4, 4, BoundaryPolicy::Clamped).expect("grid");
        let mut events = Vec::new();

        apply(
            &mut grid,
            Command::LoadPattern {
                pattern: Pattern::from_pairs(&[(0, 0), (9, 9)]),
                origin_row: 1,
                origin_column: 1,
            },
            &mut events,
        );
        apply(&mut grid, Command::Advance, &mut events);
        apply(&mut grid, Command::Clear, &mut events);

        assert_eq!(
            events,
            vec![
                Event::PatternLoaded {
                    generation: 0,
                    placement: PatternPlacement {
                        placed: 1,
                        dropped: 1,
                    },
                },
                Event::GenerationAdvanced {
                    summary: GenerationSummary {
                        generation: 1,
                        population: 0,
                        births: 0,
                        deaths: 1,
                    },
                },
                Event::GridCleared { generation: 1 },
            ]
        );
    }

    #[test]
    fn restored_grid_resumes_from_the_snapshot() {
        let mut original = blinker_grid();
        let _ = original.advance();

        let mut restored = LifeGrid::from_snapshot(
            &original.snapshot(),
            BoundaryPolicy::Clamped,
            query::generation(&original),
        );
        assert_eq!(restored.snapshot(), original.snapshot());
        assert_eq!(restored.advance(), original.advance());
    }

    #[test]
    fn overflowing_offsets_are_dropped() {
        let mut grid = LifeGrid::with_size(2, 2, BoundaryPolicy::Clamped).expect("grid");
        let placement = grid.load_pattern(&Pattern::from_pairs(&[(1, 0), (0, 0)]), i64::MAX, 0);
        assert_eq!(
            placement,
            PatternPlacement {
                placed: 0,
                dropped: 2,
            }
        );
    }
}
