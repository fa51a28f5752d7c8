//! Shared matrix helpers: stochastic validation, broadcasts, relabeling.

use nalgebra::{DMatrix, DVector};

use crate::config::Tolerances;
use crate::error::InputViolation;

/// Check that `p` is a finite, square, row-stochastic matrix.
///
/// Entries may stray outside `[0, 1]` and row sums away from 1 by at most
/// `tol.stochastic`, which absorbs rounding in hand-written or parsed input.
pub fn validate_stochastic(p: &DMatrix<f64>, tol: &Tolerances) -> Result<(), InputViolation> {
    let (rows, cols) = p.shape();
    if rows == 0 || cols == 0 {
        return Err(InputViolation::Empty);
    }
    if rows != cols {
        return Err(InputViolation::NotSquare { rows, cols });
    }

    for (i, row) in p.row_iter().enumerate() {
        let mut sum = 0.0_f64;
        for (j, &value) in row.iter().enumerate() {
            if !value.is_finite() {
                return Err(InputViolation::NonFinite { row: i, col: j });
            }
            if value < -tol.stochastic || value > 1.0 + tol.stochastic {
                return Err(InputViolation::OutOfRange {
                    row: i,
                    col: j,
                    value,
                });
            }
            sum += value;
        }
        if (sum - 1.0).abs() > tol.stochastic {
            return Err(InputViolation::RowSum { row: i, sum });
        }
    }
    Ok(())
}

/// Build a matrix from row vectors, rejecting empty or ragged input.
///
/// A ragged row is reported as `NotSquare` with that row's length.
pub fn from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, InputViolation> {
    let n = rows.len();
    if n == 0 {
        return Err(InputViolation::Empty);
    }
    if let Some(bad) = rows.iter().find(|r| r.len() != n) {
        return Err(InputViolation::NotSquare {
            rows: n,
            cols: bad.len(),
        });
    }
    Ok(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
}

/// Row-major copy of `m`.
#[must_use]
pub fn to_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|r| r.iter().copied().collect()).collect()
}

/// `n x n` matrix whose every row equals `v` (that is, `1 v^T`).
#[must_use]
pub fn rows_equal_to(v: &DVector<f64>) -> DMatrix<f64> {
    let n = v.len();
    DMatrix::from_fn(n, n, |_, j| v[j])
}

/// `n x n` matrix whose every column equals `v` (that is, `v 1^T`).
#[must_use]
pub fn columns_equal_to(v: &DVector<f64>) -> DMatrix<f64> {
    let n = v.len();
    DMatrix::from_fn(n, n, |i, _| v[i])
}

/// Relabel states: entry `(i, j)` of the result is `m[(perm[i], perm[j])]`.
///
/// Returns `None` unless `perm` is a permutation of `0..n` for a square `m`.
#[must_use]
pub fn permute_states(m: &DMatrix<f64>, perm: &[usize]) -> Option<DMatrix<f64>> {
    let n = m.nrows();
    if m.ncols() != n || perm.len() != n {
        return None;
    }
    let mut seen = vec![false; n];
    for &k in perm {
        if k >= n || std::mem::replace(&mut seen[k], true) {
            return None;
        }
    }
    Some(DMatrix::from_fn(n, n, |i, j| m[(perm[i], perm[j])]))
}

/// Largest absolute entrywise difference, or `INFINITY` on shape mismatch.
///
/// A NaN on either side makes the result NaN.
#[must_use]
pub fn max_abs_diff(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    if a.shape() != b.shape() {
        return f64::INFINITY;
    }
    max_abs_deviation(a.iter().zip(b.iter()))
}

/// Largest `|x - y|` over the pairs, propagating NaN (unlike `f64::max`).
#[must_use]
pub fn max_abs_deviation<'a>(pairs: impl Iterator<Item = (&'a f64, &'a f64)>) -> f64 {
    pairs
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, |acc, d| if d.is_nan() || d > acc { d } else { acc })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol() -> Tolerances {
        Tolerances::default()
    }

    #[test]
    fn accepts_stochastic_matrix() {
        let p = DMatrix::from_row_slice(2, 2, &[0.3, 0.7, 1.0, 0.0]);
        assert_eq!(validate_stochastic(&p, &tol()), Ok(()));
    }

    #[test]
    fn rejects_empty_and_non_square() {
        assert_eq!(
            validate_stochastic(&DMatrix::<f64>::zeros(0, 0), &tol()),
            Err(InputViolation::Empty)
        );
        let p = DMatrix::from_row_slice(1, 2, &[0.5, 0.5]);
        assert_eq!(
            validate_stochastic(&p, &tol()),
            Err(InputViolation::NotSquare { rows: 1, cols: 2 })
        );
    }

    #[test]
    fn rejects_bad_entries_and_row_sums() {
        let nan = DMatrix::from_row_slice(2, 2, &[0.5, 0.5, f64::NAN, 1.0]);
        assert_eq!(
            validate_stochastic(&nan, &tol()),
            Err(InputViolation::NonFinite { row: 1, col: 0 })
        );

        let negative = DMatrix::from_row_slice(2, 2, &[1.5, -0.5, 0.5, 0.5]);
        assert!(matches!(
            validate_stochastic(&negative, &tol()),
            Err(InputViolation::OutOfRange { row: 0, col: 0, .. })
        ));

        let short = DMatrix::from_row_slice(2, 2, &[0.5, 0.5, 0.5, 0.4]);
        match validate_stochastic(&short, &tol()) {
            Err(InputViolation::RowSum { row, sum }) => {
                assert_eq!(row, 1);
                assert!((sum - 0.9).abs() < 1e-12, "sum={sum}");
            }
            other => panic!("expected RowSum, got {other:?}"),
        }
    }

    #[test]
    fn rounding_within_tolerance_is_accepted() {
        let third = 1.0 / 3.0;
        let p = DMatrix::from_row_slice(1, 1, &[1.0 + 1e-12]);
        assert_eq!(validate_stochastic(&p, &tol()), Ok(()));
        let q = DMatrix::from_row_slice(3, 3, &[third; 9]);
        assert_eq!(validate_stochastic(&q, &tol()), Ok(()));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows = vec![vec![1.0, 0.0], vec![1.0]];
        assert_eq!(
            from_rows(&rows),
            Err(InputViolation::NotSquare { rows: 2, cols: 1 })
        );
        assert_eq!(from_rows(&[]), Err(InputViolation::Empty));
        let m = from_rows(&[vec![0.0, 1.0], vec![0.25, 0.75]]).unwrap();
        assert_eq!(m[(1, 0)], 0.25);
        assert_eq!(to_rows(&m), vec![vec![0.0, 1.0], vec![0.25, 0.75]]);
    }

    #[test]
    fn broadcasts_have_expected_orientation() {
        let v = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let rows = rows_equal_to(&v);
        let cols = columns_equal_to(&v);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(rows[(i, j)], v[j]);
                assert_eq!(cols[(i, j)], v[i]);
            }
        }
    }

    #[test]
    fn permute_states_relabels_rows_and_columns() {
        let m = DMatrix::from_row_slice(3, 3, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let p = permute_states(&m, &[2, 0, 1]).unwrap();
        assert_eq!(p[(0, 0)], m[(2, 2)]);
        assert_eq!(p[(0, 1)], m[(2, 0)]);
        assert_eq!(p[(1, 2)], m[(0, 1)]);
        assert!(permute_states(&m, &[0, 0, 1]).is_none());
        assert!(permute_states(&m, &[0, 1]).is_none());
        assert!(permute_states(&m, &[0, 1, 3]).is_none());
    }

    #[test]
    fn max_abs_diff_detects_shape_mismatch() {
        let a = DMatrix::from_element(2, 2, 1.0);
        let b = DMatrix::from_element(2, 2, 1.25);
        assert!((max_abs_diff(&a, &b) - 0.25).abs() < 1e-15);
        assert!(max_abs_diff(&a, &DMatrix::zeros(3, 3)).is_infinite());
    }

    #[test]
    fn max_abs_diff_propagates_nan() {
        let a = DMatrix::from_row_slice(1, 3, &[f64::NAN, 0.0, 0.0]);
        let b = DMatrix::from_row_slice(1, 3, &[0.0, 0.0, 5.0]);
        assert!(max_abs_diff(&a, &b).is_nan());
        assert!(max_abs_diff(&b, &a).is_nan());
        assert!(max_abs_diff(&a, &a).is_nan());
    }
}
