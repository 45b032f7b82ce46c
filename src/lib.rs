//! Grid localization with a discrete Hidden Markov Model.
//!
//! An agent moves through a grid of open cells and obstacles. Four noisy
//! sensors report whether each side of its cell is blocked. The forward
//! algorithm turns that percept stream into a probability distribution over
//! the cells the agent might be in.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod simulation;
pub mod ui;
