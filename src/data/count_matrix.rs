//! Dense count matrix of symbol occurrences per sequence.

use crate::data::Alphabet;
use crate::error::{ProfilerError, Result};
use nalgebra::DMatrix;

/// A dense count matrix storing symbol occurrences across sequences.
///
/// Rows represent sequences (independent observational units), columns
/// represent alphabet symbols in a fixed caller-supplied order. A query
/// matrix and a background matrix compared together must share the same
/// column order.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMatrix {
    /// Dense matrix (sequences × symbols)
    data: DMatrix<u64>,
}

impl CountMatrix {
    /// Wrap an existing dense matrix.
    pub fn new(data: DMatrix<u64>) -> Self {
        Self { data }
    }

    /// Build a matrix from row vectors; all rows must have equal length.
    pub fn from_rows(rows: &[Vec<u64>]) -> Result<Self> {
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        for row in rows {
            if row.len() != n_cols {
                return Err(ProfilerError::ShapeMismatch {
                    expected: n_cols,
                    actual: row.len(),
                });
            }
        }
        let flat: Vec<u64> = rows.iter().flatten().copied().collect();
        Ok(Self::new(DMatrix::from_row_slice(rows.len(), n_cols, &flat)))
    }

    /// Count alphabet symbols in each sequence, one row per sequence.
    ///
    /// Symbols outside the alphabet are skipped without error.
    pub fn from_sequences<S: AsRef<[u8]>>(sequences: &[S], alphabet: &Alphabet) -> Self {
        let mut data = DMatrix::zeros(sequences.len(), alphabet.len());
        for (row, seq) in sequences.iter().enumerate() {
            for &b in seq.as_ref() {
                if let Some(col) = alphabet.index_of(b) {
                    data[(row, col)] += 1;
                }
            }
        }
        Self::new(data)
    }

    /// Get the value at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.data[(row, col)]
    }

    /// Number of sequences (rows).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of symbols (columns).
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    /// Whether the matrix has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Get the underlying dense matrix.
    #[inline]
    pub fn data(&self) -> &DMatrix<u64> {
        &self.data
    }

    /// Get a dense vector for a specific row (sequence).
    pub fn row(&self, row: usize) -> Vec<u64> {
        self.data.row(row).iter().copied().collect()
    }

    /// Compute column sums (total occurrences per symbol).
    pub fn col_sums(&self) -> Vec<u64> {
        self.data
            .column_iter()
            .map(|col| col.iter().sum())
            .collect()
    }

    /// Column sums over a selection of rows; indices may repeat.
    pub fn col_sums_over(&self, rows: &[usize]) -> Vec<u64> {
        let mut sums = vec![0u64; self.n_cols()];
        for &row in rows {
            for (col, sum) in sums.iter_mut().enumerate() {
                *sum += self.data[(row, col)];
            }
        }
        sums
    }

    /// Total of all counts.
    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }

    /// Copy rows into a row-major flat buffer.
    pub fn to_row_major(&self) -> Vec<u64> {
        let mut flat = Vec::with_capacity(self.n_rows() * self.n_cols());
        for row in self.data.row_iter() {
            flat.extend(row.iter().copied());
        }
        flat
    }

    /// Append the columns of `other` to the right of this matrix.
    pub fn concat_cols(&self, other: &CountMatrix) -> Result<Self> {
        if other.n_rows() != self.n_rows() {
            return Err(ProfilerError::InvalidParameter(format!(
                "Cannot append columns: {} rows vs {} rows",
                self.n_rows(),
                other.n_rows()
            )));
        }
        let n_cols = self.n_cols() + other.n_cols();
        let data = DMatrix::from_fn(self.n_rows(), n_cols, |r, c| {
            if c < self.n_cols() {
                self.data[(r, c)]
            } else {
                other.data[(r, c - self.n_cols())]
            }
        });
        Ok(Self::new(data))
    }

    /// Stack the rows of `other` below this matrix.
    pub fn concat_rows(&self, other: &CountMatrix) -> Result<Self> {
        if other.n_cols() != self.n_cols() {
            return Err(ProfilerError::ShapeMismatch {
                expected: self.n_cols(),
                actual: other.n_cols(),
            });
        }
        let n_rows = self.n_rows() + other.n_rows();
        let data = DMatrix::from_fn(n_rows, self.n_cols(), |r, c| {
            if r < self.n_rows() {
                self.data[(r, c)]
            } else {
                other.data[(r - self.n_rows(), c)]
            }
        });
        Ok(Self::new(data))
    }

    /// Fail with `ShapeMismatch` unless the matrix has `expected` columns.
    pub fn require_cols(&self, expected: usize) -> Result<()> {
        if self.n_cols() != expected {
            return Err(ProfilerError::ShapeMismatch {
                expected,
                actual: self.n_cols(),
            });
        }
        Ok(())
    }

    /// Fail with `EmptyInput` if the matrix has no rows.
    pub fn require_rows(&self, label: &str) -> Result<()> {
        if self.is_empty() {
            return Err(ProfilerError::EmptyInput(format!(
                "{} count matrix has no sequences",
                label
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_matrix() -> CountMatrix {
        // 3 sequences × 4 symbols
        CountMatrix::from_rows(&[
            vec![10, 20, 0, 5],
            vec![1, 2, 3, 4],
            vec![0, 0, 7, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_dimensions() {
        let mat = create_test_matrix();
        assert_eq!(mat.n_rows(), 3);
        assert_eq!(mat.n_cols(), 4);
        assert_eq!(mat.get(0, 1), 20);
        assert_eq!(mat.get(2, 2), 7);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = CountMatrix::from_rows(&[vec![1, 2, 3], vec![1, 2]]);
        assert!(matches!(
            result,
            Err(ProfilerError::ShapeMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_col_sums() {
        let mat = create_test_matrix();
        assert_eq!(mat.col_sums(), vec![11, 22, 10, 9]);
        assert_eq!(mat.total(), 52);
    }

    #[test]
    fn test_col_sums_over_repeated_rows() {
        let mat = create_test_matrix();
        assert_eq!(mat.col_sums_over(&[1, 1, 2]), vec![2, 4, 13, 8]);
        assert_eq!(mat.col_sums_over(&[]), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_from_sequences_skips_unknown() {
        let alphabet = Alphabet::new("ACGT").unwrap();
        let mat = CountMatrix::from_sequences(&["ACGTNNA", "xxGG"], &alphabet);
        assert_eq!(mat.row(0), vec![2, 1, 1, 1]);
        assert_eq!(mat.row(1), vec![0, 0, 2, 0]);
    }

    #[test]
    fn test_concat_cols_and_rows() {
        let mat = create_test_matrix();
        let extra = CountMatrix::from_rows(&[vec![1], vec![2], vec![3]]).unwrap();
        let wide = mat.concat_cols(&extra).unwrap();
        assert_eq!(wide.n_cols(), 5);
        assert_eq!(wide.row(1), vec![1, 2, 3, 4, 2]);

        let tall = mat.concat_rows(&mat).unwrap();
        assert_eq!(tall.n_rows(), 6);
        assert_eq!(tall.row(5), vec![0, 0, 7, 0]);

        assert!(mat.concat_rows(&wide).is_err());
    }

    #[test]
    fn test_row_major_layout() {
        let mat = CountMatrix::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(mat.to_row_major(), vec![1, 2, 3, 4]);
    }
}
