//! Chain file loading.
//!
//! A chain file is a JSON document:
//!
//! ```json
//! { "name": "weather", "states": ["sun", "rain"], "matrix": [[0.9, 0.1], [0.5, 0.5]] }
//! ```
//!
//! `states` is optional; when absent states are labelled by index.

use std::path::Path;

use serde::{Deserialize, Serialize};
use trajentropy_core::chains::conditional_trajectory_example;
use trajentropy_core::matrix::{from_rows, to_rows};
use trajentropy_core::{ChainError, DMatrix};

use crate::error::HarnessError;

/// A named transition matrix with optional state labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainFile {
    /// Chain name, used in logs and reports.
    pub name: String,
    /// Optional state labels, one per row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    /// Row-major transition probabilities.
    pub matrix: Vec<Vec<f64>>,
}

impl ChainFile {
    /// The five-state example chain printed by `trajentropy demo`.
    #[must_use]
    pub fn demo() -> Self {
        Self::from_matrix("conditional-trajectory-example", &conditional_trajectory_example())
    }

    #[must_use]
    pub fn from_matrix(name: impl Into<String>, p: &DMatrix<f64>) -> Self {
        Self {
            name: name.into(),
            states: None,
            matrix: to_rows(p),
        }
    }

    /// Parse a chain file, checking that labels match the matrix size.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        let chain: Self = serde_json::from_str(json)?;
        if let Some(states) = &chain.states
            && states.len() != chain.matrix.len()
        {
            return Err(HarnessError::ChainFile {
                name: chain.name.clone(),
                message: format!(
                    "{} state labels for {} matrix rows",
                    states.len(),
                    chain.matrix.len()
                ),
            });
        }
        Ok(chain)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Transition matrix, rejecting empty or ragged rows.
    pub fn to_matrix(&self) -> Result<DMatrix<f64>, ChainError> {
        Ok(from_rows(&self.matrix)?)
    }

    /// Number of states (rows).
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Label of state `i`: the configured name, or the index.
    #[must_use]
    pub fn label(&self, i: usize) -> String {
        self.states
            .as_ref()
            .and_then(|s| s.get(i).cloned())
            .unwrap_or_else(|| i.to_string())
    }
}
