use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::simulation::environment::{Coordinate, Direction, GridTopology};
use crate::simulation::error::{LocalizationError, Result};
use crate::simulation::inference::{BeliefState, BeliefTracker, ForwardFilter};
use crate::simulation::sensor::{SensorModel, SensorReading};

/// Represents an agent moving through a grid with noisy wall sensors.
///
/// The agent knows the map but not its own position. Each step it moves,
/// reads its four sensors, and updates its belief over where it is.
/// The random source drives sensor noise only.
#[derive(Clone, Debug)]
pub struct Agent<R = StdRng> {
    tracker: BeliefTracker,
    position: Coordinate,
    time: u64,
    last_percept: Option<SensorReading>,
    rng: R,
}

impl Agent<StdRng> {
    /// Creates an agent with an OS-seeded random source.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::InvalidErrorRate`] unless `error_rate` is in [0, 1].
    pub fn new(error_rate: f64, topology: GridTopology) -> Result<Self> {
        Self::with_rng(error_rate, topology, StdRng::from_os_rng())
    }

    /// Creates an agent whose sensor noise is reproducible from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::InvalidErrorRate`] unless `error_rate` is in [0, 1].
    pub fn seeded(error_rate: f64, topology: GridTopology, seed: u64) -> Result<Self> {
        Self::with_rng(error_rate, topology, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Agent<R> {
    /// Creates an agent with an injected random source, starting at the first
    /// occupiable cell in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::InvalidErrorRate`] unless `error_rate` is in [0, 1].
    pub fn with_rng(error_rate: f64, topology: GridTopology, rng: R) -> Result<Self> {
        let sensor = SensorModel::new(error_rate)?;
        let position = topology
            .occupiable_coordinates()
            .first()
            .copied()
            .ok_or(LocalizationError::NoOccupiableCells)?;
        Ok(Self {
            tracker: BeliefTracker::new(ForwardFilter::new(topology, sensor)),
            position,
            time: 0,
            last_percept: None,
            rng,
        })
    }

    /// Places the agent at `start` instead of the default cell.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::StartNotOccupiable`] if `start` is off the
    /// grid or an obstacle.
    pub fn with_start(mut self, start: Coordinate) -> Result<Self> {
        if !self.topology().is_occupiable(start) {
            return Err(LocalizationError::StartNotOccupiable(start));
        }
        self.position = start;
        Ok(self)
    }

    /// Moves one cell, or stays put for `None`.
    ///
    /// Bumping into an obstacle or the grid edge leaves the position unchanged.
    /// Returns whether the position changed. Time advances either way.
    pub fn move_to(&mut self, direction: Option<Direction>) -> bool {
        self.time += 1;
        let Some(direction) = direction else {
            return false;
        };
        match self.position.step(direction) {
            Some(candidate) if self.topology().is_occupiable(candidate) => {
                self.position = candidate;
                true
            }
            _ => {
                trace!(position = %self.position, ?direction, "bumped into wall");
                false
            }
        }
    }

    /// Reads the sensors at the true position.
    pub fn sense(&mut self) -> SensorReading {
        let percept = self
            .tracker
            .filter()
            .sensor()
            .percept(self.tracker.topology(), self.position, &mut self.rng);
        self.last_percept = Some(percept);
        percept
    }

    /// Move, sense, then update the belief, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::DegenerateBelief`] if the percept is
    /// impossible everywhere. The move has already happened; the belief is
    /// left at its previous value.
    pub fn step(&mut self, direction: Option<Direction>) -> Result<&BeliefState> {
        self.move_to(direction);
        let percept = self.sense();
        self.tracker.update(percept)
    }

    /// Updates the belief with an externally supplied percept.
    ///
    /// # Errors
    ///
    /// See [`BeliefTracker::update`].
    pub fn observe(&mut self, percept: SensorReading) -> Result<&BeliefState> {
        self.last_percept = Some(percept);
        self.tracker.update(percept)
    }

    pub fn reset_belief(&mut self) {
        self.tracker.reset();
    }
}

impl<R> Agent<R> {
    #[must_use]
    pub const fn true_position(&self) -> Coordinate {
        self.position
    }

    #[must_use]
    pub const fn time(&self) -> u64 {
        self.time
    }

    #[must_use]
    pub const fn last_percept(&self) -> Option<SensorReading> {
        self.last_percept
    }

    #[must_use]
    pub const fn topology(&self) -> &GridTopology {
        self.tracker.topology()
    }

    #[must_use]
    pub const fn error_rate(&self) -> f64 {
        self.tracker.filter().sensor().error_rate()
    }

    #[must_use]
    pub const fn tracker(&self) -> &BeliefTracker {
        &self.tracker
    }

    /// Coordinate/probability pairs in canonical state order.
    #[must_use]
    pub fn belief_state(&self) -> Vec<(Coordinate, f64)> {
        self.tracker.belief()
    }

    #[must_use]
    pub fn most_likely_position(&self) -> Option<Coordinate> {
        self.tracker.most_likely_coordinate()
    }
}
