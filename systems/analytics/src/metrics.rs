use lifegrid_core::{GenerationSummary, PopulationReport};

/// Running totals folded from consecutive generation summaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulationTally {
    peak_population: usize,
    total_births: u64,
    total_deaths: u64,
}

impl PopulationTally {
    /// Folds a completed step into the tally and reports the result.
    pub fn record(&mut self, summary: &GenerationSummary) -> PopulationReport {
        self.peak_population = self.peak_population.max(summary.population);
        self.total_births = self.total_births.saturating_add(widen(summary.births));
        self.total_deaths = self.total_deaths.saturating_add(widen(summary.deaths));

        PopulationReport {
            generation: summary.generation,
            population: summary.population,
            peak_population: self.peak_population,
            births: summary.births,
            deaths: summary.deaths,
            total_births: self.total_births,
            total_deaths: self.total_deaths,
        }
    }

    /// Forgets the peak and accumulated totals.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn widen(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}
