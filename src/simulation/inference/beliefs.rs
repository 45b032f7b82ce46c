//! Discrete belief state over grid locations.
//!
//! Represents the filtered posterior P(X_t | e_1:t) as a normalized vector
//! indexed by canonical state order.

use crate::simulation::error::{LocalizationError, Result};
use crate::simulation::inference::linalg::Vector;
use crate::simulation::params::PROBABILITY_TOLERANCE;

/// Normalized probability vector over occupiable states.
///
/// Every entry is non-negative and the entries sum to one.
#[derive(Clone, Debug, PartialEq)]
pub struct BeliefState {
    probabilities: Vector,
}

impl BeliefState {
    /// Uniform prior P(X_0 = i) = 1/n.
    #[must_use]
    pub fn uniform(states: usize) -> Self {
        Self {
            probabilities: Vector::filled(states, 1.0 / states as f64),
        }
    }

    /// Wraps an existing distribution.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::InvalidDistribution`] if any entry is
    /// negative or non-finite, or the entries do not sum to one.
    pub fn from_probabilities(probabilities: Vector) -> Result<Self> {
        let sum = probabilities.sum();
        let valid_entries = probabilities.iter().all(|p| p.is_finite() && *p >= 0.0);
        if !valid_entries || (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(LocalizationError::InvalidDistribution(sum));
        }
        Ok(Self { probabilities })
    }

    /// Normalizes unnormalized weights. Returns `None` when no entry is
    /// positive or the result is not a valid distribution.
    pub(crate) fn normalized(mut weights: Vector) -> Option<Self> {
        let peak = weights.max_entry();
        if peak <= 0.0 || !peak.is_finite() {
            return None;
        }
        // Rescale to a peak of one first: the raw total may be subnormal.
        weights.divide_by(peak);
        let total = weights.sum();
        weights.divide_by(total);
        Self::from_probabilities(weights).ok()
    }

    #[must_use]
    pub const fn probabilities(&self) -> &Vector {
        &self.probabilities
    }

    #[must_use]
    pub fn probability(&self, state: usize) -> Option<f64> {
        self.probabilities.as_slice().get(state).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Index of the most probable state. Ties go to the earliest state in
    /// canonical order.
    #[must_use]
    pub fn most_likely(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &p) in self.probabilities.iter().enumerate() {
            if best.is_none_or(|(_, best_p)| p > best_p) {
                best = Some((i, p));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Shannon entropy in bits.
    #[must_use]
    pub fn entropy(&self) -> f64 {
        -self
            .probabilities
            .iter()
            .filter(|&&p| p > 0.0)
            .map(|&p| p * p.log2())
            .sum::<f64>()
    }
}
