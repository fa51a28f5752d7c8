//! Numeric configuration.
//!
//! The validation level is set via the `TRAJENTROPY_VALIDATION` environment
//! variable:
//! - `strict` (default): every operation checks that its input is a finite,
//!   square, row-stochastic matrix and fails with `InvalidInput` otherwise.
//! - `trusting`: input checks are skipped and the caller is trusted. Numerical
//!   failures (missing unit eigenvalue, singular fundamental matrix, zero
//!   stationary mass) are still reported.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted by [`validation_level`].
pub const VALIDATION_ENV: &str = "TRAJENTROPY_VALIDATION";

/// Whether operations validate their input matrix.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationLevel {
    /// Check squareness, finiteness, entry range and row sums.
    #[default]
    Strict,
    /// Trust the caller; malformed input yields NaN/Inf or wrong answers.
    Trusting,
}

impl ValidationLevel {
    /// Parse from string (case-insensitive). Unknown values map to `Strict`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "default" | "checked" => Self::Strict,
            "trusting" | "trust" | "off" | "none" | "unchecked" => Self::Trusting,
            _ => Self::Strict,
        }
    }

    /// Returns true if input validation is active.
    #[must_use]
    pub const fn validates(self) -> bool {
        matches!(self, Self::Strict)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Trusting => "trusting",
        }
    }
}

/// Numerical tolerances shared by all pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Max |row sum - 1|, and how far an entry may stray outside [0, 1].
    pub stochastic: f64,
    /// Max |lambda - 1| for the eigenvalue taken as the stationary one.
    pub eigenvalue: f64,
    /// Min ratio of smallest to largest LU pivot of the fundamental matrix.
    pub pivot: f64,
    /// Stationary probabilities at or below this are refused as divisors.
    pub zero_mass: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            stochastic: 1e-9,
            eigenvalue: 1e-8,
            pivot: 1e-12,
            zero_mass: 1e-15,
        }
    }
}

// 0=unresolved, 1=Strict, 2=Trusting.
static CACHED_LEVEL: AtomicU8 = AtomicU8::new(0);

const LEVEL_UNRESOLVED: u8 = 0;
const LEVEL_STRICT: u8 = 1;
const LEVEL_TRUSTING: u8 = 2;

fn level_to_u8(level: ValidationLevel) -> u8 {
    match level {
        ValidationLevel::Strict => LEVEL_STRICT,
        ValidationLevel::Trusting => LEVEL_TRUSTING,
    }
}

fn u8_to_level(v: u8) -> ValidationLevel {
    match v {
        LEVEL_TRUSTING => ValidationLevel::Trusting,
        _ => ValidationLevel::Strict,
    }
}

/// Get the process-wide validation level (reads env var on first call,
/// caches thereafter).
#[must_use]
pub fn validation_level() -> ValidationLevel {
    let cached = CACHED_LEVEL.load(Ordering::Relaxed);
    if cached != LEVEL_UNRESOLVED {
        return u8_to_level(cached);
    }

    let level = std::env::var(VALIDATION_ENV)
        .map(|v| ValidationLevel::from_str_loose(&v))
        .unwrap_or_default();
    // Racing resolvers read the same env var, so whichever store wins agrees.
    let _ = CACHED_LEVEL.compare_exchange(
        LEVEL_UNRESOLVED,
        level_to_u8(level),
        Ordering::AcqRel,
        Ordering::Relaxed,
    );
    u8_to_level(CACHED_LEVEL.load(Ordering::Acquire))
}
