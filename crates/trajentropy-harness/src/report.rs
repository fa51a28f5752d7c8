//! Machine-readable analysis reports and verification reports.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use trajentropy_core::matrix::to_rows;
use trajentropy_core::{ChainAnalysis, DMatrix, ValidationLevel};

use crate::chain_file::ChainFile;
use crate::verify::VerificationSummary;

/// SHA-256 of the row-major little-endian f64 bytes of `p`, hex-encoded.
///
/// Ties log lines and reports to the exact input that produced them.
#[must_use]
pub fn matrix_digest(p: &DMatrix<f64>) -> String {
    let mut hasher = Sha256::new();
    hasher.update((p.nrows() as u64).to_le_bytes());
    hasher.update((p.ncols() as u64).to_le_bytes());
    for row in p.row_iter() {
        for &x in row.iter() {
            hasher.update(x.to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

/// JSON view of one chain analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    pub n: usize,
    pub matrix_sha256: String,
    pub validation: String,
    pub transition_matrix: Vec<Vec<f64>>,
    pub stationary_distribution: Vec<f64>,
    pub local_entropy: Vec<f64>,
    pub entropy_rate: f64,
    pub trajectory_entropy: Vec<Vec<f64>>,
}

impl AnalysisReport {
    #[must_use]
    pub fn new(
        chain: &ChainFile,
        p: &DMatrix<f64>,
        analysis: &ChainAnalysis,
        validation: ValidationLevel,
    ) -> Self {
        Self {
            name: chain.name.clone(),
            states: chain.states.clone(),
            n: analysis.states(),
            matrix_sha256: matrix_digest(p),
            validation: validation.as_str().to_string(),
            transition_matrix: to_rows(p),
            stationary_distribution: analysis.stationary.iter().copied().collect(),
            local_entropy: analysis.local_entropy.iter().copied().collect(),
            entropy_rate: analysis.entropy_rate,
            trajectory_entropy: to_rows(&analysis.trajectory_entropy),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Fixture verification report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub title: String,
    pub timestamp: String,
    pub summary: VerificationSummary,
}

impl VerificationReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Case | Checks | Max deviation | Status |\n");
        out.push_str("|------|--------|---------------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {:.3e} | {} |\n",
                r.case_name,
                r.checks.join(", "),
                r.max_deviation,
                status
            ));
        }

        let failures: Vec<_> = self.summary.results.iter().filter(|r| !r.passed).collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {}\n\n", r.case_name));
                for note in &r.notes {
                    out.push_str(&format!("- {note}\n"));
                }
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}
