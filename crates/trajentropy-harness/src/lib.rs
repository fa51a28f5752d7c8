//! Command-line harness for trajentropy.
//!
//! This crate provides:
//! - Chain files: JSON transition matrices with optional state labels
//! - Rendering: fixed-precision plain-text matrices and vectors
//! - Reports: JSON analysis reports and markdown/JSON verification reports
//! - Fixture verification: compare pipeline outputs against expected values
//! - Structured logging: JSONL events for every run

#![forbid(unsafe_code)]

pub mod chain_file;
pub mod error;
pub mod fixtures;
pub mod render;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use chain_file::ChainFile;
pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::{AnalysisReport, VerificationReport};
pub use runner::{
    ChainRun, FixtureDir, OutputFormat, load_fixture_dir, run_chain, run_fixture_dir, run_fixtures,
};
pub use verify::{VerificationResult, VerificationSummary};
