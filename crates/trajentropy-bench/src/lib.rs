//! Benchmark inputs for trajentropy.

use trajentropy_core::DMatrix;

/// Deterministic xorshift64 generator.
pub struct XorShift(u64);

impl XorShift {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Dense `n`-state chain with strictly positive entries, hence irreducible
/// and aperiodic.
#[must_use]
pub fn dense_chain(n: usize, seed: u64) -> DMatrix<f64> {
    let mut rng = XorShift::new(seed);
    let mut p = DMatrix::from_fn(n, n, |_, _| 0.05 + rng.next_f64());
    for mut row in p.row_iter_mut() {
        let sum: f64 = row.iter().sum();
        row /= sum;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajentropy_core::{Tolerances, matrix::validate_stochastic};

    #[test]
    fn dense_chain_is_stochastic_and_deterministic() {
        let p = dense_chain(16, 7);
        assert_eq!(validate_stochastic(&p, &Tolerances::default()), Ok(()));
        assert_eq!(p, dense_chain(16, 7));
        assert!(p.iter().all(|&x| x > 0.0));
    }
}
