//! Named example chains.

use nalgebra::DMatrix;

/// Five-state chain from Kafsi, Grossglauser & Thiran, "The entropy of
/// conditional Markov trajectories" (2013).
///
/// Irreducible (0→1→4→0 plus 0→2→3→4) and aperiodic (cycles of length 3
/// and 4).
#[must_use]
pub fn conditional_trajectory_example() -> DMatrix<f64> {
    let mut p = DMatrix::zeros(5, 5);
    p[(0, 1)] = 0.25;
    p[(0, 2)] = 0.75;
    p[(1, 4)] = 1.0;
    p[(2, 1)] = 0.5;
    p[(2, 3)] = 0.5;
    p[(3, 4)] = 1.0;
    p[(4, 0)] = 0.5;
    p[(4, 3)] = 0.5;
    p
}

/// Two states that swap deterministically every step.
#[must_use]
pub fn deterministic_alternation() -> DMatrix<f64> {
    DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0])
}

/// Two states, each step a fair coin flip independent of the past.
#[must_use]
pub fn iid_fair_coin() -> DMatrix<f64> {
    DMatrix::from_element(2, 2, 0.5)
}
