//! Analysis and verification runs with structured logging.

use std::path::{Path, PathBuf};
use std::time::Instant;

use trajentropy_core::{
    ChainAnalysis, DMatrix, Tolerances, TrajectoryEntropyEngine, ValidationLevel,
};

use crate::chain_file::ChainFile;
use crate::error::HarnessError;
use crate::fixtures::FixtureSet;
use crate::report::matrix_digest;
use crate::structured_log::{LogEmitter, LogLevel, Outcome};
use crate::verify::{VerificationResult, VerificationSummary, verify_set};

/// Output format for `compute` and `demo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, HarnessError> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            _ => Err(HarnessError::Unsupported {
                what: "format",
                value: s.to_string(),
                expected: "plain|json",
            }),
        }
    }
}

/// A successful analysis together with the matrix it was computed from.
#[derive(Debug, Clone)]
pub struct ChainRun {
    pub matrix: DMatrix<f64>,
    pub analysis: ChainAnalysis,
    pub digest: String,
}

/// Analyze one chain file, logging `chain_loaded` then `analysis_complete`
/// or `analysis_failed`.
pub fn run_chain(
    chain: &ChainFile,
    validation: ValidationLevel,
    log: &mut LogEmitter,
) -> Result<ChainRun, HarnessError> {
    let matrix = match chain.to_matrix() {
        Ok(m) => m,
        Err(err) => {
            let entry = log
                .entry(LogLevel::Error, "analysis_failed")
                .with_chain(&chain.name, chain.len())
                .with_validation(validation.as_str())
                .with_outcome(Outcome::Error)
                .with_error_kind(err.kind())
                .with_details(serde_json::json!({ "message": err.to_string() }));
            log.emit_entry(entry)?;
            return Err(err.into());
        }
    };
    let digest = matrix_digest(&matrix);
    let entry = log
        .entry(LogLevel::Info, "chain_loaded")
        .with_chain(&chain.name, matrix.nrows())
        .with_validation(validation.as_str())
        .with_digest(&digest);
    log.emit_entry(entry)?;

    let engine = TrajectoryEntropyEngine::new(Tolerances::default(), validation);
    let started = Instant::now();
    let outcome = engine.analyze(&matrix);
    let duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    match outcome {
        Ok(analysis) => {
            let entry = log
                .entry(LogLevel::Info, "analysis_complete")
                .with_chain(&chain.name, analysis.states())
                .with_validation(validation.as_str())
                .with_digest(&digest)
                .with_entropy_rate(analysis.entropy_rate)
                .with_outcome(Outcome::Pass)
                .with_duration_us(duration_us);
            log.emit_entry(entry)?;
            Ok(ChainRun {
                matrix,
                analysis,
                digest,
            })
        }
        Err(err) => {
            let entry = log
                .entry(LogLevel::Error, "analysis_failed")
                .with_chain(&chain.name, matrix.nrows())
                .with_validation(validation.as_str())
                .with_digest(&digest)
                .with_outcome(Outcome::Error)
                .with_error_kind(err.kind())
                .with_duration_us(duration_us)
                .with_details(serde_json::json!({
                    "message": err.to_string(),
                    "suspected_cause": err.suspected_cause(),
                }));
            log.emit_entry(entry)?;
            Err(err.into())
        }
    }
}

/// Fixture sets found in a directory, plus the files that failed to load.
#[derive(Debug, Default)]
pub struct FixtureDir {
    pub sets: Vec<FixtureSet>,
    /// One failed result per unreadable or malformed file.
    pub load_failures: Vec<VerificationResult>,
}

/// Load every `*.json` file in `dir`, in name order.
///
/// A file that does not parse becomes a failed result named after it, so a
/// corrupt fixture can never be skipped silently.
pub fn load_fixture_dir(dir: &Path) -> Result<FixtureDir, HarnessError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    if paths.is_empty() {
        return Err(HarnessError::NoFixtures(dir.to_path_buf()));
    }
    paths.sort();

    let mut loaded = FixtureDir::default();
    for path in paths {
        match FixtureSet::from_file(&path) {
            Ok(set) => loaded.sets.push(set),
            Err(err) => loaded.load_failures.push(VerificationResult {
                case_name: path.display().to_string(),
                passed: false,
                checks: vec!["load".into()],
                max_deviation: 0.0,
                error_kind: None,
                notes: vec![format!("fixture file did not load: {err}")],
            }),
        }
    }
    Ok(loaded)
}

/// Verify every fixture file in `dir`; unloadable files count as failures.
pub fn run_fixture_dir(
    dir: &Path,
    log: &mut LogEmitter,
) -> Result<VerificationSummary, HarnessError> {
    let loaded = load_fixture_dir(dir)?;
    run_verification(&loaded.sets, loaded.load_failures, log)
}

/// Verify every case of every set, logging one `fixture_case` per case and
/// a closing `verify_summary`.
pub fn run_fixtures(
    sets: &[FixtureSet],
    log: &mut LogEmitter,
) -> Result<VerificationSummary, HarnessError> {
    run_verification(sets, Vec::new(), log)
}

fn run_verification(
    sets: &[FixtureSet],
    prior: Vec<VerificationResult>,
    log: &mut LogEmitter,
) -> Result<VerificationSummary, HarnessError> {
    let mut results = Vec::new();
    let verified = sets.iter().flat_map(verify_set);
    for result in prior.into_iter().chain(verified) {
        log_case(log, &result)?;
        results.push(result);
    }

    let summary = VerificationSummary::from_results(results);
    let outcome = if summary.all_passed() {
        Outcome::Pass
    } else {
        Outcome::Fail
    };
    let entry = log
        .entry(LogLevel::Info, "verify_summary")
        .with_outcome(outcome)
        .with_details(serde_json::json!({
            "total": summary.total,
            "passed": summary.passed,
            "failed": summary.failed,
        }));
    log.emit_entry(entry)?;
    Ok(summary)
}

fn log_case(log: &mut LogEmitter, result: &VerificationResult) -> Result<(), HarnessError> {
    let (level, outcome) = if result.passed {
        (LogLevel::Info, Outcome::Pass)
    } else {
        (LogLevel::Warn, Outcome::Fail)
    };
    let mut entry = log
        .entry(level, "fixture_case")
        .with_outcome(outcome)
        .with_details(serde_json::json!({
            "case": result.case_name,
            "checks": result.checks,
            "max_deviation": result.max_deviation,
            "notes": result.notes,
        }));
    entry.chain = Some(result.case_name.clone());
    if let Some(kind) = &result.error_kind {
        entry = entry.with_error_kind(kind);
    }
    log.emit_entry(entry)?;
    Ok(())
}
