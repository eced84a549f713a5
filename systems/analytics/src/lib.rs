#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic population analytics derived from generation events.

mod metrics;

pub use metrics::PopulationTally;

use lifegrid_core::{Event, PopulationReport};

/// Pure analytics system that folds generation summaries into reports.
#[derive(Debug, Default)]
pub struct Analytics {
    tally: PopulationTally,
    last_report: Option<PopulationReport>,
}

impl Analytics {
    /// Creates a new analytics system with empty totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last report published by the system, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&PopulationReport> {
        self.last_report.as_ref()
    }

    /// Consumes world events and publishes at most one report per batch.
    ///
    /// Loading a pattern or clearing the grid starts a fresh tally. A report
    /// is emitted only when the batch contained at least one advance.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        let mut latest = None;

        for event in events {
            match event {
                Event::PatternLoaded { .. } | Event::GridCleared { .. } => {
                    self.tally.reset();
                    latest = None;
                }
                Event::GenerationAdvanced { summary } => {
                    latest = Some(self.tally.record(summary));
                }
                _ => {}
            }
        }

        if let Some(report) = latest {
            self.last_report = Some(report);
            out.push(Event::PopulationUpdated { report });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::GenerationSummary;

    #[test]
    fn batches_without_advances_stay_silent() {
        let mut analytics = Analytics::new();
        let mut out = Vec::new();
        analytics.handle(&[Event::GridCleared { generation: 0 }], &mut out);
        assert!(out.is_empty());
        assert!(analytics.last_report().is_none());
    }

    #[test]
    fn one_report_per_batch() {
        let mut analytics = Analytics::new();
        let mut out = Vec::new();
        let step = |generation| Event::GenerationAdvanced {
            summary: GenerationSummary {
                generation,
                population: 4,
                births: 1,
                deaths: 1,
            },
        };

        analytics.handle(&[step(1), step(2), step(3)], &mut out);

        assert_eq!(out.len(), 1);
        let Event::PopulationUpdated { report } = &out[0] else {
            panic!("unexpected event: {:?}", out[0]);
        };
        assert_eq!(report.generation, 3);
        assert_eq!(report.total_births, 3);
        assert_eq!(analytics.last_report(), Some(report));
    }
}
