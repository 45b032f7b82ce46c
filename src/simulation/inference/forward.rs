//! Forward algorithm for a single discrete state variable.

use tracing::{debug, warn};

use crate::simulation::environment::{Coordinate, GridTopology};
use crate::simulation::error::{LocalizationError, Result};
use crate::simulation::inference::beliefs::BeliefState;
use crate::simulation::inference::transition::TransitionModel;
use crate::simulation::sensor::{SensorModel, SensorReading};

/// The fixed parts of the HMM: topology, motion model and sensor model.
///
/// [`ForwardFilter::forward`] is a pure function of the prior belief and the
/// percept, so any percept sequence can be replayed against it.
#[derive(Clone, Debug)]
pub struct ForwardFilter {
    topology: GridTopology,
    transition: TransitionModel,
    sensor: SensorModel,
}

impl ForwardFilter {
    #[must_use]
    pub fn new(topology: GridTopology, sensor: SensorModel) -> Self {
        let transition = TransitionModel::build(&topology);
        Self {
            topology,
            transition,
            sensor,
        }
    }

    #[must_use]
    pub const fn topology(&self) -> &GridTopology {
        &self.topology
    }

    #[must_use]
    pub const fn transition(&self) -> &TransitionModel {
        &self.transition
    }

    #[must_use]
    pub const fn sensor(&self) -> &SensorModel {
        &self.sensor
    }

    /// `f' = α · O ⊙ (Tᵀ · f)`.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::StateCountMismatch`] if `belief` was built
    /// for a different grid, and [`LocalizationError::DegenerateBelief`] when
    /// no state keeps positive weight after the update.
    pub fn forward(&self, belief: &BeliefState, percept: SensorReading) -> Result<BeliefState> {
        let expected = self.topology.state_count();
        if belief.len() != expected {
            return Err(LocalizationError::StateCountMismatch {
                expected,
                actual: belief.len(),
            });
        }
        let predicted = self.transition.predict(belief.probabilities());
        let likelihoods = self.sensor.likelihoods(percept, &self.topology);
        BeliefState::normalized(likelihoods.hadamard(&predicted))
            .ok_or(LocalizationError::DegenerateBelief)
    }
}

/// Owns the current belief and advances it one percept at a time.
#[derive(Clone, Debug)]
pub struct BeliefTracker {
    filter: ForwardFilter,
    belief: BeliefState,
    time: u64,
}

impl BeliefTracker {
    /// Starts from the uniform prior over occupiable cells.
    #[must_use]
    pub fn new(filter: ForwardFilter) -> Self {
        let belief = BeliefState::uniform(filter.topology().state_count());
        Self {
            filter,
            belief,
            time: 0,
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &ForwardFilter {
        &self.filter
    }

    #[must_use]
    pub const fn topology(&self) -> &GridTopology {
        self.filter.topology()
    }

    #[must_use]
    pub const fn state(&self) -> &BeliefState {
        &self.belief
    }

    /// Number of successful updates since construction or the last reset.
    #[must_use]
    pub const fn time(&self) -> u64 {
        self.time
    }

    /// Incorporates one percept.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::DegenerateBelief`] when the percept is
    /// impossible under every reachable state. The previous belief is kept.
    pub fn update(&mut self, percept: SensorReading) -> Result<&BeliefState> {
        self.belief = self
            .filter
            .forward(&self.belief, percept)
            .inspect_err(|err| warn!(time = self.time, %percept, %err, "belief update rejected"))?;
        self.time += 1;
        debug!(
            time = self.time,
            %percept,
            entropy = self.belief.entropy(),
            "belief updated"
        );
        Ok(&self.belief)
    }

    /// Back to the uniform prior.
    pub fn reset(&mut self) {
        self.belief = BeliefState::uniform(self.topology().state_count());
        self.time = 0;
    }

    /// Coordinate/probability pairs in canonical state order.
    #[must_use]
    pub fn belief(&self) -> Vec<(Coordinate, f64)> {
        self.topology()
            .occupiable_coordinates()
            .iter()
            .copied()
            .zip(self.belief.probabilities().iter().copied())
            .collect()
    }

    #[must_use]
    pub fn probability_at(&self, coord: Coordinate) -> Option<f64> {
        self.topology()
            .state_index(coord)
            .and_then(|i| self.belief.probability(i))
    }

    /// Most probable cell; ties resolve to the earliest in canonical order.
    #[must_use]
    pub fn most_likely_coordinate(&self) -> Option<Coordinate> {
        self.belief
            .most_likely()
            .and_then(|i| self.topology().occupiable_coordinates().get(i).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(error_rate: f64) -> BeliefTracker {
        let topology = GridTopology::new(4, 4, []).unwrap();
        let sensor = SensorModel::new(error_rate).unwrap();
        BeliefTracker::new(ForwardFilter::new(topology, sensor))
    }

    #[test]
    fn test_initial_belief_is_uniform() {
        let tracker = open_grid(0.2);
        for (_, p) in tracker.belief() {
            assert!((p - 1.0 / 16.0).abs() < 1e-12);
        }
        assert_eq!(tracker.time(), 0);
    }

    #[test]
    fn test_forward_is_pure() {
        let tracker = open_grid(0.2);
        let percept = SensorReading::from_bits(0b1001);
        let a = tracker.filter().forward(tracker.state(), percept).unwrap();
        let b = tracker.filter().forward(tracker.state(), percept).unwrap();
        assert_eq!(a, b);
        assert_eq!(tracker.state(), &BeliefState::uniform(16));
    }

    #[test]
    fn test_degenerate_keeps_prior() {
        let mut tracker = open_grid(0.0);
        let impossible = SensorReading::from_bits(0b1111);
        let err = tracker.update(impossible).unwrap_err();
        assert_eq!(err, LocalizationError::DegenerateBelief);
        assert_eq!(tracker.state(), &BeliefState::uniform(16));
        assert_eq!(tracker.time(), 0);
    }

    #[test]
    fn test_subnormal_likelihoods_stay_normalized() {
        // At this error rate corner likelihoods are subnormal and every other
        // state underflows to zero.
        let mut tracker = open_grid(1e-155);
        let belief = tracker.update(SensorReading::from_bits(0b1111)).unwrap().clone();
        assert!((belief.probabilities().sum() - 1.0).abs() < 1e-9);
        for (coord, p) in tracker.belief() {
            assert!(p.is_finite(), "{coord} has {p}");
            let corner = (coord.col == 0 || coord.col == 3) && (coord.row == 0 || coord.row == 3);
            let expected = if corner { 0.25 } else { 0.0 };
            assert!((p - expected).abs() < 1e-9, "{coord} has {p}");
        }
    }

    #[test]
    fn test_forward_rejects_foreign_belief() {
        let tracker = open_grid(0.2);
        let err = tracker
            .filter()
            .forward(&BeliefState::uniform(3), SensorReading::default())
            .unwrap_err();
        assert_eq!(
            err,
            LocalizationError::StateCountMismatch {
                expected: 16,
                actual: 3
            }
        );
    }

    #[test]
    fn test_reset() {
        let mut tracker = open_grid(0.1);
        tracker.update(SensorReading::from_bits(0b1001)).unwrap();
        assert_eq!(tracker.time(), 1);
        tracker.reset();
        assert_eq!(tracker.time(), 0);
        assert_eq!(tracker.state(), &BeliefState::uniform(16));
    }
}
