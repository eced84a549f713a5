#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reproducible random starting patterns.

use lifegrid_core::{GridDimensions, Pattern};
use rand::distributions::{Bernoulli, Distribution};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Errors raised while generating a random soup.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SeedingError {
    /// Density must be a probability.
    #[error("soup density must lie within [0, 1] (received {density})")]
    InvalidDensity {
        /// Requested density.
        density: f64,
    },
}

/// Generates a pattern covering `dimensions` in which each cell is alive with
/// probability `density`.
///
/// Cells are drawn in row-major order from a ChaCha8 stream seeded with
/// `seed`, so the same inputs always produce the same pattern. Offsets are
/// relative to the grid origin.
pub fn random_soup(
    dimensions: GridDimensions,
    density: f64,
    seed: u64,
) -> Result<Pattern, SeedingError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(SeedingError::InvalidDensity { density });
    }
    let alive =
        Bernoulli::new(density).map_err(|_| SeedingError::InvalidDensity { density })?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let columns = dimensions.columns();
    let mut offsets = Vec::new();
    for row in 0..dimensions.rows() {
        for column in 0..columns {
            if alive.sample(&mut rng) {
                offsets.push((i64::from(row), i64::from(column)));
            }
        }
    }
    Ok(offsets.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_densities_outside_the_unit_interval() {
        let dimensions = GridDimensions::new(3, 3).expect("dimensions");
        for density in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                random_soup(dimensions, density, 0),
                Err(SeedingError::InvalidDensity { .. })
            ));
        }
    }
}
