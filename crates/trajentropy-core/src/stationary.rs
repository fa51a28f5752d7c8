//! Stationary distribution of an irreducible, aperiodic chain.
//!
//! μ is the left eigenvector of P for eigenvalue 1 (Perron–Frobenius
//! guarantees it is simple and strictly positive), scaled so that Σ μ_i = 1.
//!
//! The unit eigenvalue is located explicitly among the eigenvalues of P
//! rather than assumed to come first: Schur-based eigen routines return
//! eigenvalues in an implementation-defined order. The matching eigenvector
//! is then the null vector of (Pᵀ − λI), read off the right singular vector
//! of its smallest singular value.
//!
//! Both decompositions run under an iteration budget. When either fails to
//! converge (some permutation chains defeat the QR sweeps), μ is taken from
//! the linear system μᵀ (I − P + 1 1ᵀ) = 1ᵀ instead.

use nalgebra::linalg::Schur;
use nalgebra::{DMatrix, DVector};

use crate::config::{Tolerances, ValidationLevel, validation_level};
use crate::error::ChainError;
use crate::matrix::validate_stochastic;

/// Stationary distribution of `p`, using the process configuration.
pub fn stationary_distribution(p: &DMatrix<f64>) -> Result<DVector<f64>, ChainError> {
    stationary_distribution_with(p, &Tolerances::default(), validation_level())
}

/// [`stationary_distribution`] with explicit tolerances and validation level.
pub fn stationary_distribution_with(
    p: &DMatrix<f64>,
    tol: &Tolerances,
    validation: ValidationLevel,
) -> Result<DVector<f64>, ChainError> {
    if validation.validates() {
        validate_stochastic(p, tol)?;
    }
    solve_stationary(p, tol)
}

/// Iteration budget for the Schur and SVD sweeps on an `n`-state chain.
///
/// Permutation-like chains can make the unshifted QR sweeps cycle without
/// converging; past this budget the direct linear solve takes over.
fn iteration_budget(n: usize) -> usize {
    30 * n.max(10)
}

/// Real eigenvalue of `p` closest to 1, if one lies within `tol.eigenvalue`.
///
/// `Ok(None)` means the Schur decomposition did not converge.
pub(crate) fn unit_eigenvalue(
    p: &DMatrix<f64>,
    tol: &Tolerances,
) -> Result<Option<f64>, ChainError> {
    let not_found = ChainError::EigenvalueNotFound {
        closest: f64::NAN,
        distance: f64::INFINITY,
    };
    if p.is_empty() || !p.is_square() {
        return Err(not_found);
    }

    let Some(schur) = Schur::try_new(p.clone_owned(), f64::EPSILON, iteration_budget(p.nrows()))
    else {
        return Ok(None);
    };
    let (closest, distance) = schur
        .complex_eigenvalues()
        .iter()
        .map(|z| (z.re, (z.re - 1.0).hypot(z.im)))
        .filter(|(_, d)| d.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or(not_found)?;

    if distance > tol.eigenvalue {
        return Err(ChainError::EigenvalueNotFound { closest, distance });
    }
    Ok(Some(closest))
}

pub(crate) fn solve_stationary(
    p: &DMatrix<f64>,
    tol: &Tolerances,
) -> Result<DVector<f64>, ChainError> {
    match unit_eigenvalue(p, tol)? {
        Some(lambda) => match null_vector(p, lambda) {
            Some(mu) => Ok(mu),
            None => solve_augmented(p, tol),
        },
        None => solve_augmented(p, tol),
    }
}

/// Left eigenvector of P for `lambda`: the right null vector of (Pᵀ − λI),
/// scaled to a probability vector.
fn null_vector(p: &DMatrix<f64>, lambda: f64) -> Option<DVector<f64>> {
    let n = p.nrows();
    let shifted = p.transpose() - DMatrix::identity(n, n) * lambda;
    let svd = shifted.try_svd(false, true, f64::EPSILON, iteration_budget(n))?;
    let v_t = svd.v_t?;
    let k = argmin(&svd.singular_values)?;

    let v: DVector<f64> = v_t.row(k).transpose();
    let norm: f64 = v.iter().map(|x| x.abs()).sum();
    if !(norm.is_finite() && norm > 0.0) {
        return None;
    }
    Some(v.map(|x| x.abs() / norm))
}

/// Solve μᵀ (I − P + 1 1ᵀ) = 1ᵀ directly.
///
/// The system is nonsingular for every irreducible chain, periodic or not.
/// The result is accepted only if μᵀ P = μᵀ holds to `tol.eigenvalue`.
fn solve_augmented(p: &DMatrix<f64>, tol: &Tolerances) -> Result<DVector<f64>, ChainError> {
    let n = p.nrows();
    let system = (DMatrix::identity(n, n) - p + DMatrix::from_element(n, n, 1.0)).transpose();
    let mu = system
        .lu()
        .solve(&DVector::from_element(n, 1.0))
        .filter(|mu| mu.iter().all(|x| x.is_finite()));
    let Some(mu) = mu else {
        return Err(ChainError::EigenvalueNotFound {
            closest: f64::NAN,
            distance: f64::INFINITY,
        });
    };

    let residual = (p.transpose() * &mu - &mu).amax();
    let sum = mu.sum();
    if !(residual <= tol.eigenvalue && sum.abs() > tol.zero_mass) {
        return Err(ChainError::EigenvalueNotFound {
            closest: f64::NAN,
            distance: residual,
        });
    }
    Ok(mu / sum)
}

fn argmin(v: &DVector<f64>) -> Option<usize> {
    v.iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
}
