//! Generation kernel shared by the serial and parallel advance paths.

use lifegrid_core::{BoundaryPolicy, Cell, CellCoord, GridDimensions, NEIGHBOR_OFFSETS};

/// Grids with fewer rows than this are stepped serially even when the
/// `parallel` feature is enabled.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_ROWS: u32 = 64;

/// Counts live neighbours of `cell` in `current` under the provided policy.
pub(crate) fn live_neighbors(
    current: &[Cell],
    dimensions: GridDimensions,
    policy: BoundaryPolicy,
    cell: CellCoord,
) -> u8 {
    NEIGHBOR_OFFSETS
        .iter()
        .filter_map(|offset| policy.resolve(dimensions, cell, *offset))
        .filter_map(|neighbor| dimensions.index(neighbor))
        .filter(|&index| current[index].is_alive())
        .fold(0, |count, _| count + 1)
}

/// Writes the successor of `current` into `next`.
///
/// `next` is never read; every slot is overwritten.
pub(crate) fn compute_next(
    current: &[Cell],
    next: &mut [Cell],
    dimensions: GridDimensions,
    policy: BoundaryPolicy,
) {
    #[cfg(feature = "parallel")]
    {
        if dimensions.rows() >= PARALLEL_MIN_ROWS {
            compute_next_parallel(current, next, dimensions, policy);
            return;
        }
    }

    compute_next_serial(current, next, dimensions, policy);
}

pub(crate) fn compute_next_serial(
    current: &[Cell],
    next: &mut [Cell],
    dimensions: GridDimensions,
    policy: BoundaryPolicy,
) {
    let width = dimensions.columns() as usize;
    for (row, out) in (0..dimensions.rows()).zip(next.chunks_mut(width)) {
        fill_row(current, dimensions, policy, row, out);
    }
}

#[cfg(feature = "parallel")]
pub(crate) fn compute_next_parallel(
    current: &[Cell],
    next: &mut [Cell],
    dimensions: GridDimensions,
    policy: BoundaryPolicy,
) {
    use rayon::prelude::*;

    let width = dimensions.columns() as usize;
    (0..dimensions.rows())
        .into_par_iter()
        .zip(next.par_chunks_mut(width))
        .for_each(|(row, out)| fill_row(current, dimensions, policy, row, out));
}

fn fill_row(
    current: &[Cell],
    dimensions: GridDimensions,
    policy: BoundaryPolicy,
    row: u32,
    out: &mut [Cell],
) {
    let width = dimensions.columns() as usize;
    let row_start = row as usize * width;
    for ((column, slot), state) in (0u32..)
        .zip(out.iter_mut())
        .zip(&current[row_start..row_start + width])
    {
        let cell = CellCoord::new(row, column);
        *slot = state.evolve(live_neighbors(current, dimensions, policy, cell));
    }
}

/// Counts `(births, deaths)` between two consecutive generations.
pub(crate) fn tally_changes(previous: &[Cell], next: &[Cell]) -> (usize, usize) {
    previous
        .iter()
        .zip(next)
        .fold((0, 0), |(births, deaths), (before, after)| {
            match (before.is_alive(), after.is_alive()) {
                (false, true) => (births + 1, deaths),
                (true, false) => (births, deaths + 1),
                _ => (births, deaths),
            }
        })
}
