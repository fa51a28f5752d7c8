//! Fixture loading.
//!
//! A fixture set pairs transition matrices with expected pipeline outputs or
//! an expected error kind (see `ChainError::kind`).

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Default absolute tolerance for fixture comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// A single fixture case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Row-major transition matrix.
    pub matrix: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_stationary: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_local_entropy: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_entropy_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_trajectory_entropy: Option<Vec<Vec<f64>>>,
    /// Expected failure kind (`invalid_input`, `numerical`, `singular_matrix`, `division`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
    /// Absolute tolerance for every numeric comparison.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Validation level (`strict` when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
}

/// A collection of fixture cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
