//! # Trajectory Entropy of Markov Chains
//!
//! For an irreducible, aperiodic chain with transition matrix P, the
//! trajectory entropy H\[i, j\] is the expected information content (bits) of
//! the random path from state i until it first reaches state j (Ekroot &
//! Cover, "The entropy of Markov trajectories", 1993).
//!
//! ## Mathematical Foundation
//!
//! With μ the stationary distribution and l the local entropies:
//!
//! ```text
//! A   = 1 μᵀ                       every row equals μ
//! H*  = l 1ᵀ                       every column equals l
//! r   = μᵀ l                       entropy rate
//! HΔ  = diag(r / μ_i)
//! K   = (I − P + A)⁻¹ (H* − HΔ)
//! K̃   = 1 diag(K)ᵀ                 every row equals diag(K)
//! H   = K − K̃ + HΔ
//! ```
//!
//! The diagonal of K − K̃ cancels exactly, so H\[i, i\] = r / μ_i: the
//! expected entropy of a return trajectory is the entropy rate times the
//! mean recurrence time 1 / μ_i.
//!
//! (I − P + A) is invertible for every irreducible chain. The product with
//! its inverse is taken through an LU solve rather than an explicit inverse.

use nalgebra::{DMatrix, DVector};

use crate::config::{Tolerances, ValidationLevel, validation_level};
use crate::error::ChainError;
use crate::local_entropy::row_entropies;
use crate::matrix::{columns_equal_to, rows_equal_to, validate_stochastic};
use crate::stationary::solve_stationary;

/// Every intermediate of one trajectory-entropy computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainAnalysis {
    /// Stationary distribution μ.
    pub stationary: DVector<f64>,
    /// Local entropy l_i of each state, in bits.
    pub local_entropy: DVector<f64>,
    /// Entropy rate r = μᵀ l, in bits per step.
    pub entropy_rate: f64,
    /// Trajectory entropy matrix H, in bits.
    pub trajectory_entropy: DMatrix<f64>,
}

impl ChainAnalysis {
    /// Number of states.
    #[must_use]
    pub fn states(&self) -> usize {
        self.stationary.len()
    }

    /// Mean recurrence time 1 / μ_i of each state.
    #[must_use]
    pub fn recurrence_times(&self) -> DVector<f64> {
        self.stationary.map(|m| 1.0 / m)
    }
}

/// Trajectory-entropy engine carrying its numeric configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryEntropyEngine {
    pub tolerances: Tolerances,
    pub validation: ValidationLevel,
}

impl Default for TrajectoryEntropyEngine {
    fn default() -> Self {
        Self::new(Tolerances::default(), validation_level())
    }
}

impl TrajectoryEntropyEngine {
    #[must_use]
    pub const fn new(tolerances: Tolerances, validation: ValidationLevel) -> Self {
        Self {
            tolerances,
            validation,
        }
    }

    /// Engine with default tolerances that always validates its input.
    #[must_use]
    pub fn strict() -> Self {
        Self::new(Tolerances::default(), ValidationLevel::Strict)
    }

    /// Compute μ, l, r and H in one pass.
    pub fn analyze(&self, p: &DMatrix<f64>) -> Result<ChainAnalysis, ChainError> {
        let (stationary, local_entropy, entropy_rate) = self.rate_inputs(p)?;
        let trajectory_entropy =
            self.combine(p, &stationary, &local_entropy, entropy_rate)?;
        Ok(ChainAnalysis {
            stationary,
            local_entropy,
            entropy_rate,
            trajectory_entropy,
        })
    }

    /// Trajectory entropy matrix H of `p`.
    pub fn trajectory_entropy(&self, p: &DMatrix<f64>) -> Result<DMatrix<f64>, ChainError> {
        self.analyze(p).map(|a| a.trajectory_entropy)
    }

    /// Entropy rate r = μᵀ l of `p`, in bits per step.
    pub fn entropy_rate(&self, p: &DMatrix<f64>) -> Result<f64, ChainError> {
        self.rate_inputs(p).map(|(_, _, r)| r)
    }

    fn rate_inputs(
        &self,
        p: &DMatrix<f64>,
    ) -> Result<(DVector<f64>, DVector<f64>, f64), ChainError> {
        if self.validation.validates() {
            validate_stochastic(p, &self.tolerances)?;
        }
        let mu = solve_stationary(p, &self.tolerances)?;
        let l = row_entropies(p);
        let r = mu.dot(&l);
        Ok((mu, l, r))
    }

    fn combine(
        &self,
        p: &DMatrix<f64>,
        mu: &DVector<f64>,
        l: &DVector<f64>,
        r: f64,
    ) -> Result<DMatrix<f64>, ChainError> {
        let n = mu.len();
        if let Some((state, &mass)) = mu
            .iter()
            .enumerate()
            .find(|(_, m)| **m <= self.tolerances.zero_mass)
        {
            return Err(ChainError::ZeroStationaryMass { state, mass });
        }

        let a = rows_equal_to(mu);
        let h_star = columns_equal_to(l);
        let h_delta = DMatrix::from_diagonal(&mu.map(|m| r / m));

        let fundamental = DMatrix::identity(n, n) - p + a;
        let k = self.solve_fundamental(fundamental, &(h_star - &h_delta))?;
        let k_tilde = rows_equal_to(&k.diagonal());

        Ok(k - k_tilde + h_delta)
    }

    /// Solve `fundamental · K = rhs`, refusing near-singular systems.
    fn solve_fundamental(
        &self,
        fundamental: DMatrix<f64>,
        rhs: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>, ChainError> {
        let lu = fundamental.lu();

        let pivots = lu.u().diagonal().map(f64::abs);
        let largest = pivots.max();
        let pivot = if largest > 0.0 {
            pivots.min() / largest
        } else {
            0.0
        };
        if !(pivot >= self.tolerances.pivot) {
            return Err(ChainError::SingularFundamental { pivot });
        }

        match lu.solve(rhs) {
            Some(k) if k.iter().all(|x| x.is_finite()) => Ok(k),
            _ => Err(ChainError::SingularFundamental { pivot }),
        }
    }
}

/// Trajectory entropy matrix H of `p`, using the process configuration.
pub fn trajectory_entropy(p: &DMatrix<f64>) -> Result<DMatrix<f64>, ChainError> {
    TrajectoryEntropyEngine::default().trajectory_entropy(p)
}

/// [`trajectory_entropy`] with explicit tolerances and validation level.
pub fn trajectory_entropy_with(
    p: &DMatrix<f64>,
    tol: &Tolerances,
    validation: ValidationLevel,
) -> Result<DMatrix<f64>, ChainError> {
    TrajectoryEntropyEngine::new(*tol, validation).trajectory_entropy(p)
}

/// Entropy rate of `p` in bits per step, using the process configuration.
pub fn entropy_rate(p: &DMatrix<f64>) -> Result<f64, ChainError> {
    TrajectoryEntropyEngine::default().entropy_rate(p)
}

/// [`entropy_rate`] with explicit tolerances and validation level.
pub fn entropy_rate_with(
    p: &DMatrix<f64>,
    tol: &Tolerances,
    validation: ValidationLevel,
) -> Result<f64, ChainError> {
    TrajectoryEntropyEngine::new(*tol, validation).entropy_rate(p)
}

/// μ, l, r and H of `p`, using the process configuration.
pub fn analyze(p: &DMatrix<f64>) -> Result<ChainAnalysis, ChainError> {
    TrajectoryEntropyEngine::default().analyze(p)
}

/// [`analyze`] with explicit tolerances and validation level.
pub fn analyze_with(
    p: &DMatrix<f64>,
    tol: &Tolerances,
    validation: ValidationLevel,
) -> Result<ChainAnalysis, ChainError> {
    TrajectoryEntropyEngine::new(*tol, validation).analyze(p)
}
