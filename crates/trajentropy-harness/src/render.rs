//! Plain-text rendering of matrices and analyses.
//!
//! Values are printed in fixed-point with a chosen precision. Magnitudes that
//! would round to zero print as zero without a sign.

use trajentropy_core::{ChainAnalysis, DMatrix, DVector};

use crate::chain_file::ChainFile;

/// Fixed-point rendering of `x`; `-0.000` collapses to `0.000`.
#[must_use]
pub fn format_value(x: f64, precision: usize) -> String {
    let threshold = 0.5 * 10f64.powi(-(precision as i32));
    let x = if x.abs() < threshold { 0.0 } else { x };
    format!("{x:.precision$}")
}

/// Render `m` as a right-aligned table, with optional state labels.
#[must_use]
pub fn render_matrix(title: &str, m: &DMatrix<f64>, precision: usize, chain: Option<&ChainFile>) -> String {
    let cells: Vec<Vec<String>> = m
        .row_iter()
        .map(|r| r.iter().map(|&x| format_value(x, precision)).collect())
        .collect();
    let labels: Vec<String> = (0..m.nrows())
        .map(|i| chain.map_or_else(|| i.to_string(), |c| c.label(i)))
        .collect();

    let label_width = labels.iter().map(String::len).max().unwrap_or(0);
    let width = cells
        .iter()
        .flatten()
        .map(String::len)
        .chain(labels.iter().map(String::len))
        .max()
        .unwrap_or(0);

    let mut out = format!("{title}\n");
    out.push_str(&" ".repeat(label_width));
    for label in &labels {
        out.push_str(&format!("  {label:>width$}"));
    }
    out.push('\n');
    for (label, row) in labels.iter().zip(&cells) {
        out.push_str(&format!("{label:>label_width$}"));
        for cell in row {
            out.push_str(&format!("  {cell:>width$}"));
        }
        out.push('\n');
    }
    out
}

/// Render `v` as `label: value` lines.
#[must_use]
pub fn render_vector(title: &str, v: &DVector<f64>, precision: usize, chain: Option<&ChainFile>) -> String {
    let labels: Vec<String> = (0..v.len())
        .map(|i| chain.map_or_else(|| i.to_string(), |c| c.label(i)))
        .collect();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);
    let mut out = format!("{title}\n");
    for (label, &x) in labels.iter().zip(v.iter()) {
        out.push_str(&format!("  {label:>label_width$}  {}\n", format_value(x, precision)));
    }
    out
}

/// Full plain-text report of one analysis.
#[must_use]
pub fn render_analysis(chain: &ChainFile, p: &DMatrix<f64>, analysis: &ChainAnalysis, precision: usize) -> String {
    let mut out = format!("Chain: {} ({} states)\n\n", chain.name, analysis.states());
    out.push_str(&render_matrix("Transition probability matrix", p, precision, Some(chain)));
    out.push('\n');
    out.push_str(&render_vector("Stationary distribution", &analysis.stationary, precision, Some(chain)));
    out.push('\n');
    out.push_str(&render_vector("Local entropy (bits)", &analysis.local_entropy, precision, Some(chain)));
    out.push('\n');
    out.push_str(&format!(
        "Entropy rate: {} bits/step\n\n",
        format_value(analysis.entropy_rate, precision)
    ));
    out.push_str(&render_matrix(
        "Trajectory entropies matrix (bits)",
        &analysis.trajectory_entropy,
        precision,
        Some(chain),
    ));
    out
}
