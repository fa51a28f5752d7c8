//! Fixture verification.

use serde::{Deserialize, Serialize};
use trajentropy_core::matrix::{from_rows, max_abs_deviation};
use trajentropy_core::{ChainAnalysis, ChainError, Tolerances, TrajectoryEntropyEngine, ValidationLevel};

use crate::fixtures::{FixtureCase, FixtureSet};

/// Result of verifying a single fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Name of the test case.
    pub case_name: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Quantities that were compared (`stationary`, `error`, ...).
    pub checks: Vec<String>,
    /// Largest absolute deviation over all numeric checks.
    pub max_deviation: f64,
    /// Error kind produced by the pipeline, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Human-readable mismatch descriptions.
    pub notes: Vec<String>,
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// Total cases run.
    pub total: usize,
    /// Cases passed.
    pub passed: usize,
    /// Cases failed.
    pub failed: usize,
    /// Individual results.
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    /// Build a summary from a list of results.
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        Self {
            total,
            passed,
            failed,
            results,
        }
    }

    /// Returns true if all cases passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Verify every case of a fixture set.
#[must_use]
pub fn verify_set(set: &FixtureSet) -> Vec<VerificationResult> {
    set.cases.iter().map(verify_case).collect()
}

/// Run one case through the pipeline and compare against its expectations.
#[must_use]
pub fn verify_case(case: &FixtureCase) -> VerificationResult {
    let validation = case
        .validation
        .as_deref()
        .map_or(ValidationLevel::Strict, ValidationLevel::from_str_loose);
    let engine = TrajectoryEntropyEngine::new(Tolerances::default(), validation);
    let outcome = from_rows(&case.matrix)
        .map_err(ChainError::from)
        .and_then(|p| engine.analyze(&p));

    let mut result = VerificationResult {
        case_name: case.name.clone(),
        passed: false,
        checks: Vec::new(),
        max_deviation: 0.0,
        error_kind: None,
        notes: Vec::new(),
    };

    match (outcome, case.expected_error.as_deref()) {
        (Err(err), Some(kind)) => {
            result.checks.push("error".into());
            result.error_kind = Some(err.kind().into());
            if err.kind() != kind {
                result
                    .notes
                    .push(format!("expected {kind} error, got {}: {err}", err.kind()));
            }
        }
        (Err(err), None) => {
            result.error_kind = Some(err.kind().into());
            result.notes.push(format!("unexpected error: {err}"));
        }
        (Ok(_), Some(kind)) => {
            result.checks.push("error".into());
            result.notes.push(format!("expected {kind} error, got success"));
        }
        (Ok(analysis), None) => compare_analysis(case, &analysis, &mut result),
    }

    result.passed = result.notes.is_empty();
    result
}

fn compare_analysis(case: &FixtureCase, a: &ChainAnalysis, result: &mut VerificationResult) {
    let mut check = |name: &str, deviation: f64| {
        result.checks.push(name.to_string());
        if deviation.is_nan() || deviation > result.max_deviation {
            result.max_deviation = deviation;
        }
        if !(deviation <= case.tolerance) {
            result.notes.push(format!(
                "{name}: deviation {deviation:e} exceeds tolerance {:e}",
                case.tolerance
            ));
        }
    };

    if let Some(expected) = &case.expected_stationary {
        check("stationary", vector_deviation(a.stationary.as_slice(), expected));
    }
    if let Some(expected) = &case.expected_local_entropy {
        check("local_entropy", vector_deviation(a.local_entropy.as_slice(), expected));
    }
    if let Some(expected) = case.expected_entropy_rate {
        check("entropy_rate", (a.entropy_rate - expected).abs());
    }
    if let Some(expected) = &case.expected_trajectory_entropy {
        let deviation = match from_rows(expected) {
            Ok(h) => trajentropy_core::matrix::max_abs_diff(&a.trajectory_entropy, &h),
            Err(_) => f64::INFINITY,
        };
        check("trajectory_entropy", deviation);
    }
    if result.checks.is_empty() {
        result.checks.push("analyze".into());
    }
}

fn vector_deviation(actual: &[f64], expected: &[f64]) -> f64 {
    if actual.len() != expected.len() {
        return f64::INFINITY;
    }
    max_abs_deviation(actual.iter().zip(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::DEFAULT_TOLERANCE;

    fn case(name: &str, matrix: Vec<Vec<f64>>) -> FixtureCase {
        FixtureCase {
            name: name.into(),
            matrix,
            expected_stationary: None,
            expected_local_entropy: None,
            expected_entropy_rate: None,
            expected_trajectory_entropy: None,
            expected_error: None,
            tolerance: DEFAULT_TOLERANCE,
            validation: None,
        }
    }

    #[test]
    fn matching_expectations_pass() {
        let mut c = case("coin", vec![vec![0.5, 0.5], vec![0.5, 0.5]]);
        c.expected_stationary = Some(vec![0.5, 0.5]);
        c.expected_local_entropy = Some(vec![1.0, 1.0]);
        c.expected_entropy_rate = Some(1.0);
        c.expected_trajectory_entropy = Some(vec![vec![2.0, 2.0], vec![2.0, 2.0]]);
        let r = verify_case(&c);
        assert!(r.passed, "{:?}", r.notes);
        assert_eq!(
            r.checks,
            vec!["stationary", "local_entropy", "entropy_rate", "trajectory_entropy"]
        );
        assert!(r.max_deviation < 1e-12);
    }

    #[test]
    fn wrong_expectation_fails_with_note() {
        let mut c = case("coin", vec![vec![0.5, 0.5], vec![0.5, 0.5]]);
        c.expected_entropy_rate = Some(0.5);
        let r = verify_case(&c);
        assert!(!r.passed);
        assert!((r.max_deviation - 0.5).abs() < 1e-12);
        assert!(r.notes[0].starts_with("entropy_rate: deviation"), "{:?}", r.notes);
    }

    #[test]
    fn expected_error_kind_is_checked() {
        let mut c = case("short-row", vec![vec![0.5, 0.4], vec![0.5, 0.5]]);
        c.expected_error = Some("invalid_input".into());
        let r = verify_case(&c);
        assert!(r.passed, "{:?}", r.notes);
        assert_eq!(r.error_kind.as_deref(), Some("invalid_input"));

        c.expected_error = Some("division".into());
        let r = verify_case(&c);
        assert!(!r.passed);
    }

    #[test]
    fn unexpected_error_fails() {
        let r = verify_case(&case("ragged", vec![vec![1.0], vec![0.5, 0.5]]));
        assert!(!r.passed);
        assert!(r.notes[0].starts_with("unexpected error"), "{:?}", r.notes);
    }

    #[test]
    fn trusting_validation_surfaces_numerical_error() {
        let mut c = case("sub-stochastic", vec![vec![0.25, 0.25], vec![0.25, 0.25]]);
        c.validation = Some("trusting".into());
        c.expected_error = Some("numerical".into());
        let r = verify_case(&c);
        assert!(r.passed, "{:?}", r.notes);
    }

    #[test]
    fn nan_output_fails_every_comparison() {
        let mut c = case("coin", vec![vec![0.5, 0.5], vec![0.5, 0.5]]);
        c.expected_stationary = Some(vec![0.5, 0.5]);
        c.expected_trajectory_entropy = Some(vec![vec![2.0, 2.0], vec![2.0, 2.0]]);
        let analysis = ChainAnalysis {
            stationary: trajentropy_core::DVector::from_vec(vec![f64::NAN, 0.5]),
            local_entropy: trajentropy_core::DVector::from_element(2, 1.0),
            entropy_rate: 1.0,
            trajectory_entropy: trajentropy_core::DMatrix::from_row_slice(
                2,
                2,
                &[2.0, 2.0, 2.0, f64::NAN],
            ),
        };
        let mut r = VerificationResult {
            case_name: c.name.clone(),
            passed: false,
            checks: Vec::new(),
            max_deviation: 0.0,
            error_kind: None,
            notes: Vec::new(),
        };
        compare_analysis(&c, &analysis, &mut r);
        assert_eq!(r.notes.len(), 2, "{:?}", r.notes);
        assert!(r.max_deviation.is_nan());
        assert!(vector_deviation(&[0.0, f64::NAN], &[0.0, 0.0]).is_nan());
    }

    #[test]
    fn summary_counts() {
        let ok = verify_case(&case("one", vec![vec![1.0]]));
        let mut bad_case = case("bad", vec![vec![1.0]]);
        bad_case.expected_error = Some("numerical".into());
        let bad = verify_case(&bad_case);
        let summary = VerificationSummary::from_results(vec![ok, bad]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert!(!summary.all_passed());
    }
}
