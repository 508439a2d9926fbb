//! Top-level module for the Markov generation system.
//!
//! This module provides a first-order Markov chain generator, including:
//! - The weighted transition table (`ChainModel`)
//! - Internal per-key state management (`State`)
//! - Walk configuration (`WalkParams`, `StartSeed`)
//! - The generation walk (`Generator`)

/// First-order Markov chain over string tokens.
///
/// Handles transition recording, weighted-random next-token sampling,
/// starting-seed selection and model merging.
pub mod chain_model;

/// Drives a `ChainModel` from a seed to a finite token sequence.
///
/// Exposes the generation walk with a step budget, group-boundary
/// callbacks and a well-defined dead-end stop condition.
pub mod generator;

/// Internal representation of a single Markov state.
///
/// Tracks outgoing transitions and supports weighted random sampling.
/// This module is not exposed publicly.
mod state;

/// Walk configuration structure.
///
/// Stores generation parameters such as the step budget, the group size
/// for boundary callbacks and the starting-seed strategy.
pub mod walk_params;
