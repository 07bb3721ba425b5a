// weights.rs - Per-site weight vectors

use std::fs;
use std::path::Path;
use crate::error::{DistError, Result};

/// Weight of a site, 1.0 when no weights are supplied.
/// Callers check the weights length against the alignment first.
#[inline]
pub(crate) fn site_weight(weights: Option<&[f64]>, site: usize) -> f64 {
    weights.map_or(1.0, |w| w[site])
}

/// Check that weights match the alignment length and are non-negative reals
pub fn validate_weights(weights: Option<&[f64]>, alignment_length: usize) -> Result<()> {
    let Some(weights) = weights else {
        return Ok(());
    };

    if weights.len() != alignment_length {
        return Err(DistError::config(format!(
            "{} site weights given for an alignment of length {}",
            weights.len(),
            alignment_length
        )));
    }
    if let Some((site, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(DistError::config(format!(
            "site weight {} at position {} must be a non-negative real",
            w,
            site + 1
        )));
    }
    Ok(())
}

/// Parse weights separated by whitespace or newlines; `#` starts a comment
pub fn parse_weights(content: &str) -> Result<Vec<f64>> {
    let mut weights = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        for token in line.split_whitespace() {
            let w = token.parse::<f64>().map_err(|_| {
                DistError::parse(line_num + 1, format!("'{}' is not a number", token))
            })?;
            weights.push(w);
        }
    }

    Ok(weights)
}

/// Load a weights file
pub fn load_weights(path: &Path) -> Result<Vec<f64>> {
    let content = fs::read_to_string(path)?;
    parse_weights(&content)
}
