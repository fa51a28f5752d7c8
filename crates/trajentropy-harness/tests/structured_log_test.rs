//! Integration test: structured JSONL logging of analysis runs.
//!
//! Validates that:
//! 1. A file emitter produces lines that pass schema validation.
//! 2. Trace IDs are sequential within a run.
//! 3. Failed runs carry an error kind.
//! 4. Invalid lines are rejected with the offending field.
//!
//! Run: cargo test -p trajentropy-harness --test structured_log_test

use trajentropy_core::ValidationLevel;
use trajentropy_harness::structured_log::{
    LogEmitter, LogEntry, LogLevel, Outcome, validate_log_file, validate_log_line,
};
use trajentropy_harness::{ChainFile, run_chain};

#[test]
fn emitter_writes_valid_jsonl() {
    let dir = std::env::temp_dir().join("trajentropy_log_test");
    std::fs::create_dir_all(&dir).unwrap();
    let log_path = dir.join("analysis.jsonl");

    {
        let mut emitter = LogEmitter::to_file(&log_path, "run-integ").unwrap();
        run_chain(&ChainFile::demo(), ValidationLevel::Strict, &mut emitter).unwrap();
        let bad = ChainFile {
            name: "absorbing".into(),
            states: None,
            matrix: vec![vec![0.0, 1.0], vec![0.0, 1.0]],
        };
        assert!(run_chain(&bad, ValidationLevel::Strict, &mut emitter).is_err());
        emitter.flush().unwrap();
    }

    let count = validate_log_file(&log_path).unwrap();
    assert_eq!(count, 4);

    let content = std::fs::read_to_string(&log_path).unwrap();
    let entries: Vec<LogEntry> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let trace_ids: Vec<_> = entries.iter().map(|e| e.trace_id.as_str()).collect();
    assert_eq!(
        trace_ids,
        vec!["run-integ::001", "run-integ::002", "run-integ::003", "run-integ::004"]
    );
    assert_eq!(entries[1].event, "analysis_complete");
    assert_eq!(entries[1].states, Some(5));
    assert!((entries[1].entropy_rate.unwrap() - 0.619_352_717_297_240_5).abs() < 1e-12);
    assert_eq!(entries[3].event, "analysis_failed");
    assert_eq!(entries[3].error_kind.as_deref(), Some("division"));
    assert_eq!(entries[0].matrix_sha256, entries[1].matrix_sha256);

    let _ = std::fs::remove_file(&log_path);
}

#[test]
fn error_outcome_without_kind_is_rejected() {
    let entry = LogEntry::new("t::001", LogLevel::Error, "analysis_failed")
        .with_outcome(Outcome::Error);
    let line = serde_json::to_string(&entry).unwrap();
    let errors = validate_log_line(&line, 1).unwrap_err();
    assert!(errors.iter().any(|e| e.field == "error_kind"), "{errors:?}");
}

#[test]
fn malformed_digest_is_rejected() {
    let entry = LogEntry::new("t::001", LogLevel::Info, "chain_loaded").with_digest("abc");
    let line = serde_json::to_string(&entry).unwrap();
    let errors = validate_log_line(&line, 3).unwrap_err();
    assert_eq!(errors[0].line_number, 3);
    assert!(errors.iter().any(|e| e.field == "matrix_sha256"), "{errors:?}");
}

#[test]
fn non_json_line_is_rejected() {
    let errors = validate_log_line("not json", 1).unwrap_err();
    assert_eq!(errors[0].field, "<json>");
}
