//! Harness error type.

use thiserror::Error;
use trajentropy_core::ChainError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{source} ({cause})", cause = .source.suspected_cause())]
    Chain {
        #[from]
        source: ChainError,
    },
    #[error("unsupported {what} '{value}', expected {expected}")]
    Unsupported {
        what: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("chain file '{name}': {message}")]
    ChainFile { name: String, message: String },
    #[error("no fixture JSON files found in {}", .0.display())]
    NoFixtures(std::path::PathBuf),
}
