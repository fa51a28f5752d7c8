//! Error taxonomy for the trajectory-entropy pipeline.
//!
//! Every variant signals a violated precondition on the input chain. None
//! of them is recoverable by retrying: the computation is deterministic.

use thiserror::Error;

/// Ways a candidate transition matrix can fail the row-stochastic contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputViolation {
    #[error("transition matrix has no states")]
    Empty,
    #[error("transition matrix is {rows}x{cols}, expected a square matrix")]
    NotSquare { rows: usize, cols: usize },
    #[error("entry ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },
    #[error("entry ({row}, {col}) = {value} lies outside [0, 1]")]
    OutOfRange { row: usize, col: usize, value: f64 },
    #[error("row {row} sums to {sum}, expected 1 (non-stochastic row)")]
    RowSum { row: usize, sum: f64 },
}

/// Failure of one of the pipeline operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("invalid transition matrix: {0}")]
    InvalidInput(#[from] InputViolation),
    #[error(
        "no eigenvalue within tolerance of 1 (closest {closest}, distance {distance}); \
         input is not a valid irreducible stochastic matrix"
    )]
    EigenvalueNotFound { closest: f64, distance: f64 },
    #[error(
        "fundamental matrix I - P + 1mu^T is numerically singular (relative pivot {pivot:e}); \
         chain is reducible or periodic"
    )]
    SingularFundamental { pivot: f64 },
    #[error(
        "stationary probability of state {state} is {mass:e}, too small to divide by; \
         chain is reducible"
    )]
    ZeroStationaryMass { state: usize, mass: f64 },
}

impl ChainError {
    /// Short description of the precondition most likely violated.
    #[must_use]
    pub fn suspected_cause(&self) -> &'static str {
        match self {
            Self::InvalidInput(InputViolation::RowSum { .. })
            | Self::InvalidInput(InputViolation::OutOfRange { .. }) => {
                "input is not row-stochastic"
            }
            Self::InvalidInput(_) => "input is not a finite square matrix",
            Self::EigenvalueNotFound { .. } => "input is not a stochastic matrix",
            Self::SingularFundamental { .. } | Self::ZeroStationaryMass { .. } => {
                "chain is reducible or periodic"
            }
        }
    }

    /// Stable machine-readable tag, used by fixtures and structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::EigenvalueNotFound { .. } => "numerical",
            Self::SingularFundamental { .. } => "singular_matrix",
            Self::ZeroStationaryMass { .. } => "division",
        }
    }
}
