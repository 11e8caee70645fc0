//! Bonferroni family-wise error rate correction.

use crate::error::{ProfilerError, Result};

/// Divide a significance threshold by the number of simultaneous tests.
///
/// Discovery runs one test per alphabet symbol plus one per group, so the
/// family size is `alphabet.len() + groups.len()`.
///
/// # Arguments
/// * `alpha` - Family-wise significance level, in (0, 1]
/// * `n_tests` - Number of simultaneous tests
pub fn bonferroni_alpha(alpha: f64, n_tests: usize) -> Result<f64> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(ProfilerError::InvalidParameter(format!(
            "Significance level must be in (0, 1], got {}",
            alpha
        )));
    }
    if n_tests == 0 {
        return Err(ProfilerError::InvalidParameter(
            "Bonferroni correction requires at least one test".to_string(),
        ));
    }
    Ok(alpha / n_tests as f64)
}

/// Bonferroni-adjusted p-values, `min(p * n, 1)`.
pub fn correct_bonferroni(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.len() as f64;
    p_values.iter().map(|&p| (p * n).min(1.0)).collect()
}
