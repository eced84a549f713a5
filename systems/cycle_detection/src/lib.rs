#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Detects repeating generations by fingerprinting recent grid states.
//!
//! The system keeps a bounded window of `(generation, fingerprint)` pairs.
//! When a freshly advanced generation hashes to a fingerprint already in the
//! window it reports the distance to the most recent match as the period.
//! Still lifes and extinct grids therefore report a period of one.

use std::collections::VecDeque;

use lifegrid_core::{Event, GridView};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Default number of generations remembered by the detector.
pub const DEFAULT_WINDOW: usize = 10;

/// Tuning for [`CycleDetection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Generations remembered. Zero disables detection.
    pub window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

/// Pure system that emits [`Event::CycleDetected`] when a state repeats.
#[derive(Debug, Default)]
pub struct CycleDetection {
    config: Config,
    history: VecDeque<(u64, u64)>,
}

impl CycleDetection {
    /// Creates a detector with an empty history.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            history: VecDeque::with_capacity(config.window),
        }
    }

    /// Consumes world events and the post-batch view to emit cycle reports.
    ///
    /// `view` must reflect the grid after every event in `events` was applied.
    pub fn handle(&mut self, events: &[Event], view: GridView<'_>, out: &mut Vec<Event>) {
        if self.config.window == 0 {
            return;
        }

        let mut reset_at = None;
        let mut advanced_to = None;
        for event in events {
            match event {
                Event::PatternLoaded { generation, .. } | Event::GridCleared { generation } => {
                    reset_at = Some(*generation);
                    advanced_to = None;
                }
                Event::GenerationAdvanced { summary } => advanced_to = Some(summary.generation),
                _ => {}
            }
        }

        if reset_at.is_none() && advanced_to.is_none() {
            return;
        }

        let fingerprint = fingerprint(view);

        if let Some(generation) = reset_at {
            self.history.clear();
            if advanced_to.is_none() {
                self.record(generation, fingerprint);
                return;
            }
        }

        let Some(generation) = advanced_to else {
            return;
        };

        let earlier = self
            .history
            .iter()
            .rev()
            .find(|(_, seen)| *seen == fingerprint)
            .map(|(seen_at, _)| *seen_at);

        if let Some(seen_at) = earlier {
            let period = generation.saturating_sub(seen_at);
            debug!(generation, period, "cycle detected");
            out.push(Event::CycleDetected { generation, period });
        }

        self.record(generation, fingerprint);
    }

    /// Forgets the history and remembers `view` as `generation`.
    ///
    /// Used when a run starts from an existing grid rather than a load.
    pub fn prime(&mut self, view: GridView<'_>, generation: u64) {
        self.history.clear();
        if self.config.window > 0 {
            self.record(generation, fingerprint(view));
        }
    }

    /// Number of generations currently remembered.
    #[must_use]
    pub fn remembered(&self) -> usize {
        self.history.len()
    }

    fn record(&mut self, generation: u64, fingerprint: u64) {
        if self.history.len() == self.config.window {
            let _ = self.history.pop_front();
        }
        self.history.push_back((generation, fingerprint));
    }
}

/// Hashes the dimensions and packed cell states of a generation.
#[must_use]
pub fn fingerprint(view: GridView<'_>) -> u64 {
    let dimensions = view.dimensions();
    let mut hasher = Sha256::new();
    hasher.update(dimensions.rows().to_le_bytes());
    hasher.update(dimensions.columns().to_le_bytes());
    for chunk in view.cells().chunks(8) {
        let packed = chunk
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
            .fold(0u8, |byte, (bit, _)| byte | (1 << bit));
        hasher.update([packed]);
    }
    finalize_fingerprint(hasher)
}

fn finalize_fingerprint(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
