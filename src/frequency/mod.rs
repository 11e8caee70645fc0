//! Frequency aggregation over count matrices.
//!
//! Every statistic in this crate starts from the same primitive: sum a count
//! matrix over its rows and divide by a total. Discovery appends group
//! columns and normalizes over the raw alphabet columns only, so a group
//! frequency is a fraction of all counted symbols rather than of the group.
//!
//! # Example
//!
//! ```ignore
//! use composition_profiler::frequency::{column_frequencies, group_counts};
//!
//! let groups = group_counts(&counts, &alphabet, &AminoAcidGroup::all_groups())?;
//! let extended = counts.concat_cols(&groups)?;
//! let freq = column_frequencies(&extended, alphabet.len())?;
//! ```

use crate::data::{Alphabet, CountMatrix, SymbolGroup};
use crate::error::{ProfilerError, Result};
use nalgebra::DMatrix;

/// Sum alphabet columns into one column per group.
///
/// # Arguments
/// * `counts` - Count matrix whose columns follow `alphabet`
/// * `alphabet` - Column order of `counts`
/// * `groups` - Groups to aggregate; members must belong to the alphabet
///
/// # Returns
/// A matrix with one column per group and the same row count as `counts`.
pub fn group_counts(
    counts: &CountMatrix,
    alphabet: &Alphabet,
    groups: &[SymbolGroup],
) -> Result<CountMatrix> {
    counts.require_cols(alphabet.len())?;

    let columns: Vec<Vec<usize>> = groups
        .iter()
        .map(|g| g.column_indices(alphabet))
        .collect::<Result<_>>()?;

    let data = DMatrix::from_fn(counts.n_rows(), groups.len(), |row, g| {
        columns[g].iter().map(|&col| counts.get(row, col)).sum()
    });

    Ok(CountMatrix::new(data))
}

/// Relative frequency of every column, normalized over the first `k` columns.
///
/// Columns past `k` (appended group columns) are divided by the same
/// denominator and therefore do not sum to one with the rest.
pub fn column_frequencies(counts: &CountMatrix, normalize_over_first_k: usize) -> Result<Vec<f64>> {
    if normalize_over_first_k > counts.n_cols() {
        return Err(ProfilerError::ShapeMismatch {
            expected: normalize_over_first_k,
            actual: counts.n_cols(),
        });
    }

    let sums = counts.col_sums();
    let total: u64 = sums[..normalize_over_first_k].iter().sum();
    if total == 0 {
        return Err(ProfilerError::DivisionByZero(
            "no symbol occurrences to normalize over".to_string(),
        ));
    }

    Ok(frequencies_from_sums(&sums, normalize_over_first_k))
}

/// Divide column sums by the total of the first `k`.
///
/// Used inside resampling loops; a zero total yields non-finite values
/// instead of an error.
pub fn frequencies_from_sums(sums: &[u64], k: usize) -> Vec<f64> {
    let total = sums[..k].iter().sum::<u64>() as f64;
    sums.iter().map(|&s| s as f64 / total).collect()
}

/// Fractional difference `(query - background) / background` per column.
///
/// A zero background frequency gives an infinite or NaN entry.
pub fn fractional_difference(query_freq: &[f64], back_freq: &[f64]) -> Vec<f64> {
    query_freq
        .iter()
        .zip(back_freq)
        .map(|(&q, &b)| (q - b) / b)
        .collect()
}

/// Forward Kullback-Leibler divergence `sum(q * ln(q / b))`.
///
/// Columns with `q == 0` contribute nothing. A column with `b == 0` and
/// `q > 0` makes the result infinite.
pub fn kl_divergence(query_freq: &[f64], back_freq: &[f64]) -> f64 {
    query_freq
        .iter()
        .zip(back_freq)
        .filter(|&(&q, _)| q != 0.0)
        .map(|(&q, &b)| q * (q / b).ln())
        .sum()
}
