//! Motion model: each step the agent moves to a uniformly random open neighbor.
//!
//! `T[i][j] = 1 / |N(i)|` if `j ∈ N(i)`, else 0. A state with no open
//! neighbor is absorbing (`T[i][i] = 1`) so every row stays stochastic.

use tracing::debug;

use crate::simulation::environment::GridTopology;
use crate::simulation::inference::linalg::{Matrix, Vector};

/// Row-stochastic transition matrix over occupiable states.
///
/// Caches the transpose, which is what the forward recurrence consumes.
#[derive(Clone, Debug)]
pub struct TransitionModel {
    matrix: Matrix,
    transposed: Matrix,
    absorbing: Vec<usize>,
}

impl TransitionModel {
    #[must_use]
    pub fn build(topology: &GridTopology) -> Self {
        let n = topology.state_count();
        let mut matrix = Matrix::zeros(n, n);
        let mut absorbing = Vec::new();

        for (i, &coord) in topology.occupiable_coordinates().iter().enumerate() {
            let neighbors = topology.neighbors(coord);
            if neighbors.is_empty() {
                matrix[(i, i)] = 1.0;
                absorbing.push(i);
                continue;
            }
            let p = 1.0 / neighbors.len() as f64;
            for neighbor in neighbors {
                if let Some(j) = topology.state_index(neighbor) {
                    matrix[(i, j)] = p;
                }
            }
        }

        if !absorbing.is_empty() {
            debug!(?absorbing, "isolated cells treated as absorbing states");
        }
        debug!(states = n, "built transition model");

        Self {
            transposed: matrix.transpose(),
            matrix,
            absorbing,
        }
    }

    #[must_use]
    pub const fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// States with no open neighbor.
    #[must_use]
    pub fn absorbing_states(&self) -> &[usize] {
        &self.absorbing
    }

    /// One-step prediction `Tᵀ · f`.
    #[must_use]
    pub fn predict(&self, belief: &Vector) -> Vector {
        self.transposed.mul_vector(belief)
    }
}
