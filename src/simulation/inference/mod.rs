//! Discrete HMM inference over grid locations.
//!
//! # Mathematical Foundation
//!
//! Transition model over S occupiable states:
//! ```text
//! T_ij = P(X_t = j | X_t-1 = i) = 1/|N(i)| if j ∈ N(i), else 0
//! ```
//!
//! Forward message:
//! ```text
//! f_1:t+1 = α · O_t+1 · Tᵀ · f_1:t
//! ```
//!
//! where `O_t+1` is the diagonal matrix of sensor likelihoods for the new
//! percept and `α` renormalizes the result.

mod beliefs;
mod forward;
mod linalg;
mod transition;

pub use beliefs::BeliefState;
pub use forward::{BeliefTracker, ForwardFilter};
pub use linalg::{Matrix, Vector};
pub use transition::TransitionModel;
