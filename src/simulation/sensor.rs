//! Noisy directional wall sensors.
//!
//! Each of the four sensors reports whether its side is blocked and is wrong
//! independently with probability ε. The emission probability of a reading
//! given a state therefore depends only on the Hamming distance `d` between
//! the reading and the state's ground truth:
//!
//! ```text
//! P(e | X = i) = (1 - ε)^(4 - d) · ε^d
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::simulation::environment::{Coordinate, Direction, GridTopology};
use crate::simulation::error::{LocalizationError, Result};
use crate::simulation::inference::Vector;

const SENSOR_COUNT: i32 = 4;

/// One reading of the four wall sensors; `true` means "blocked".
///
/// Any of the 16 combinations is valid, including ones no real cell emits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorReading {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl SensorReading {
    #[must_use]
    pub const fn is_blocked(self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    /// Copy of the reading with one sensor inverted.
    #[must_use]
    pub const fn flipped(self, direction: Direction) -> Self {
        let mut out = self;
        match direction {
            Direction::North => out.north = !out.north,
            Direction::South => out.south = !out.south,
            Direction::East => out.east = !out.east,
            Direction::West => out.west = !out.west,
        }
        out
    }

    /// Packs the reading as NSEW bits (north = 0b1000).
    #[must_use]
    pub const fn bits(self) -> u8 {
        (self.north as u8) << 3 | (self.south as u8) << 2 | (self.east as u8) << 1 | self.west as u8
    }

    /// Inverse of [`SensorReading::bits`]; bits above the low nibble are ignored.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            north: bits & 0b1000 != 0,
            south: bits & 0b0100 != 0,
            east: bits & 0b0010 != 0,
            west: bits & 0b0001 != 0,
        }
    }

    /// Number of sensors on which the two readings disagree.
    #[must_use]
    pub const fn hamming_distance(self, other: Self) -> u32 {
        (self.bits() ^ other.bits()).count_ones()
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = |blocked: bool, c: char| if blocked { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            glyph(self.north, 'N'),
            glyph(self.south, 'S'),
            glyph(self.east, 'E'),
            glyph(self.west, 'W')
        )
    }
}

/// Independent-bit noise channel over the four wall sensors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorModel {
    error_rate: f64,
}

impl SensorModel {
    /// # Errors
    ///
    /// Returns [`LocalizationError::InvalidErrorRate`] unless `error_rate` is in [0, 1].
    pub fn new(error_rate: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(LocalizationError::InvalidErrorRate(error_rate));
        }
        Ok(Self { error_rate })
    }

    #[must_use]
    pub const fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Samples a noisy reading at `position`: each sensor of the ground truth
    /// is flipped by an independent Bernoulli(ε) draw from `rng`.
    pub fn percept<R: Rng>(
        &self,
        topology: &GridTopology,
        position: Coordinate,
        rng: &mut R,
    ) -> SensorReading {
        let truth = topology.ground_truth_reading(position);
        let reading = Direction::ALL.iter().fold(truth, |reading, &direction| {
            if rng.random_bool(self.error_rate) {
                reading.flipped(direction)
            } else {
                reading
            }
        });
        trace!(%position, %truth, %reading, "sampled percept");
        reading
    }

    /// P(observed | reading) for a single reference reading.
    #[must_use]
    pub fn likelihood(&self, observed: SensorReading, reference: SensorReading) -> f64 {
        let d = observed.hamming_distance(reference) as i32;
        (1.0 - self.error_rate).powi(SENSOR_COUNT - d) * self.error_rate.powi(d)
    }

    /// Per-state emission weights for `observed`, in canonical state order.
    ///
    /// Not a distribution: entries need not sum to one.
    #[must_use]
    pub fn likelihoods(&self, observed: SensorReading, topology: &GridTopology) -> Vector {
        topology
            .ground_truth_readings()
            .iter()
            .map(|&reference| self.likelihood(observed, reference))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bits_roundtrip_all_readings() {
        for bits in 0..16u8 {
            assert_eq!(SensorReading::from_bits(bits).bits(), bits);
        }
    }

    #[test]
    fn test_hamming_distance() {
        let a = SensorReading::from_bits(0b1001);
        assert_eq!(a.hamming_distance(a), 0);
        assert_eq!(a.hamming_distance(SensorReading::from_bits(0b0110)), 4);
        assert_eq!(a.hamming_distance(a.flipped(Direction::East)), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(SensorReading::from_bits(0b1001).to_string(), "N--W");
        assert_eq!(SensorReading::default().to_string(), "----");
    }

    #[test]
    fn test_rejects_out_of_range_error_rate() {
        assert!(SensorModel::new(-0.1).is_err());
        assert!(SensorModel::new(1.5).is_err());
        assert!(SensorModel::new(f64::NAN).is_err());
        assert!(SensorModel::new(0.0).is_ok());
        assert!(SensorModel::new(1.0).is_ok());
    }

    #[test]
    fn test_zero_error_percept_matches_ground_truth() {
        let grid = GridTopology::reference_maze().unwrap();
        let model = SensorModel::new(0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for &coord in grid.occupiable_coordinates() {
            assert_eq!(
                model.percept(&grid, coord, &mut rng),
                grid.ground_truth_reading(coord)
            );
        }
    }

    #[test]
    fn test_full_error_percept_inverts_ground_truth() {
        let grid = GridTopology::reference_maze().unwrap();
        let model = SensorModel::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let coord = Coordinate::new(0, 0);
        let truth = grid.ground_truth_reading(coord);
        assert_eq!(
            model.percept(&grid, coord, &mut rng).hamming_distance(truth),
            4
        );
    }

    #[test]
    fn test_seeded_percepts_are_reproducible() {
        let grid = GridTopology::reference_maze().unwrap();
        let model = SensorModel::new(0.3).unwrap();
        let coord = Coordinate::new(3, 2);
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(
                model.percept(&grid, coord, &mut a),
                model.percept(&grid, coord, &mut b)
            );
        }
    }
}
