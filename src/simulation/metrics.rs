//! Summary statistics for a localization run.

use serde::Serialize;

use crate::simulation::environment::Coordinate;

/// Running tally of how well the belief tracks the true position.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EpisodeStats {
    pub steps: u64,
    /// Steps where the most likely cell was the true cell.
    pub localized_steps: u64,
    /// Moves rejected by a wall or the grid edge.
    pub bumps: u64,
    /// Percepts with zero likelihood everywhere.
    pub degenerate_observations: u64,
    probability_at_truth_sum: f64,
    pub final_entropy: f64,
    pub final_estimate: Option<Coordinate>,
    pub final_position: Option<Coordinate>,
}

impl EpisodeStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed step.
    pub fn record(
        &mut self,
        position: Coordinate,
        estimate: Option<Coordinate>,
        probability_at_truth: f64,
        entropy: f64,
    ) {
        self.steps += 1;
        if estimate == Some(position) {
            self.localized_steps += 1;
        }
        self.probability_at_truth_sum += probability_at_truth;
        self.final_entropy = entropy;
        self.final_estimate = estimate;
        self.final_position = Some(position);
    }

    pub fn record_bump(&mut self) {
        self.bumps += 1;
    }

    pub fn record_degenerate(&mut self) {
        self.degenerate_observations += 1;
    }

    /// Fraction of steps where the estimate was correct.
    #[must_use]
    pub fn localization_rate(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.localized_steps as f64 / self.steps as f64
        }
    }

    /// Mean belief mass placed on the true position.
    #[must_use]
    pub fn mean_probability_at_truth(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.probability_at_truth_sum / self.steps as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = EpisodeStats::new();
        assert_eq!(stats.localization_rate(), 0.0);
        assert_eq!(stats.mean_probability_at_truth(), 0.0);
    }

    #[test]
    fn test_record() {
        let mut stats = EpisodeStats::new();
        let here = Coordinate::new(1, 1);
        stats.record(here, Some(here), 0.9, 0.5);
        stats.record(here, Some(Coordinate::new(0, 0)), 0.1, 1.5);
        stats.record_bump();

        assert_eq!(stats.steps, 2);
        assert_eq!(stats.localized_steps, 1);
        assert_eq!(stats.bumps, 1);
        assert!((stats.localization_rate() - 0.5).abs() < 1e-12);
        assert!((stats.mean_probability_at_truth() - 0.5).abs() < 1e-12);
        assert!((stats.final_entropy - 1.5).abs() < 1e-12);
        assert_eq!(stats.final_position, Some(here));
    }
}
