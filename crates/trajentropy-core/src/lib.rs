//! Trajectory entropy of finite Markov chains.
//!
//! Given the transition matrix P of an irreducible, aperiodic chain, this
//! crate computes:
//! - the stationary distribution μ ([`stationary_distribution`]),
//! - the local entropy of each state ([`local_entropy`]),
//! - the entropy rate r = μᵀ l ([`entropy_rate`]),
//! - the matrix H of expected trajectory entropies between every pair of
//!   states ([`trajectory_entropy`]).
//!
//! All operations are pure functions of P. Input validation is governed by
//! [`config::ValidationLevel`].

#![deny(unsafe_code)]

pub mod chains;
pub mod config;
pub mod error;
pub mod local_entropy;
pub mod matrix;
pub mod stationary;
pub mod trajectory;

pub use config::{Tolerances, ValidationLevel, validation_level};
pub use error::{ChainError, InputViolation};
pub use local_entropy::{local_entropy, local_entropy_with};
pub use stationary::{stationary_distribution, stationary_distribution_with};
pub use trajectory::{
    ChainAnalysis, TrajectoryEntropyEngine, analyze, analyze_with, entropy_rate, entropy_rate_with,
    trajectory_entropy, trajectory_entropy_with,
};

pub use nalgebra::{DMatrix, DVector};
