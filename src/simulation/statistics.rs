//! Per-generation fitness statistics.

use serde::{Deserialize, Serialize};

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,
    /// Highest fitness.
    pub best: f64,
    /// Mean fitness.
    pub mean: f64,
    /// Population standard deviation of fitness.
    pub stdev: f64,
    /// Lowest fitness.
    pub worst: f64,
}

impl GenerationStats {
    /// Summarises a set of fitness values. Returns `None` for an empty set.
    pub fn from_fitness(generation: usize, fitness: &[f64]) -> Option<Self> {
        if fitness.is_empty() {
            return None;
        }
        let n = fitness.len() as f64;
        let mean = fitness.iter().sum::<f64>() / n;
        let variance = fitness.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;
        let best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = fitness.iter().copied().fold(f64::INFINITY, f64::min);

        Some(Self {
            generation,
            best,
            mean,
            stdev: variance.sqrt(),
            worst,
        })
    }
}

/// History of every generation evaluated so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    history: Vec<GenerationStats>,
}

impl Statistics {
    /// Appends a generation summary.
    pub fn record(&mut self, stats: GenerationStats) {
        self.history.push(stats);
    }

    /// All summaries, oldest first.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Most recent summary.
    pub fn last(&self) -> Option<&GenerationStats> {
        self.history.last()
    }

    /// Best fitness seen in any generation.
    pub fn best_ever(&self) -> Option<f64> {
        self.history.iter().map(|s| s.best).reduce(f64::max)
    }

    /// `(generation, best)` pairs for plotting.
    pub fn best_series(&self) -> Vec<[f64; 2]> {
        self.history
            .iter()
            .map(|s| [s.generation as f64, s.best])
            .collect()
    }

    /// `(generation, mean)` pairs for plotting.
    pub fn mean_series(&self) -> Vec<[f64; 2]> {
        self.history
            .iter()
            .map(|s| [s.generation as f64, s.mean])
            .collect()
    }
}
