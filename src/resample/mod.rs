//! Shared resampling primitives: label permutation and bootstrap draws.
//!
//! All randomness flows through a caller-supplied generator handle, so the
//! engines are deterministic given the generator state. Sequential runs
//! consume the handle directly. Parallel runs draw a single base seed from
//! it and derive one independent generator per iteration, which keeps the
//! exceedance counts independent of thread scheduling.

use crate::data::CountMatrix;
use crate::error::{ProfilerError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 128;

/// Default number of resampling iterations.
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Create a reproducible generator from a seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// How shuffled pooled rows are split back into query and background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitGap {
    /// Drop the row right after the pseudo-query block, so the
    /// pseudo-background has one row fewer than the real background.
    #[default]
    SkipOne,
    /// Use every remaining row as the pseudo-background.
    Contiguous,
}

/// Configuration for permutation and bootstrap loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Number of resampling iterations.
    pub iterations: usize,
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Whether to use parallel computation.
    pub parallel: bool,
    /// Re-split rule for pooled permutations.
    pub split_gap: SplitGap,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
            parallel: false,
            split_gap: SplitGap::SkipOne,
        }
    }
}

impl ResampleConfig {
    /// Create a quick configuration for testing (fewer iterations).
    pub fn quick() -> Self {
        Self {
            iterations: 1_000,
            ..Default::default()
        }
    }

    /// 10,000 iterations.
    pub fn standard() -> Self {
        Self::default()
    }

    /// 50,000 iterations.
    pub fn extended() -> Self {
        Self {
            iterations: 50_000,
            ..Default::default()
        }
    }

    /// 100,000 iterations.
    pub fn thorough() -> Self {
        Self {
            iterations: 100_000,
            ..Default::default()
        }
    }

    /// Set the iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable parallel iteration.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the re-split rule.
    pub fn with_split_gap(mut self, split_gap: SplitGap) -> Self {
        self.split_gap = split_gap;
        self
    }

    /// Generator seeded from this configuration.
    pub fn rng(&self) -> StdRng {
        seeded_rng(self.seed)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ProfilerError::InvalidParameter(
                "Number of iterations must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

/// Row-major copy of a count matrix for fast repeated row summation.
#[derive(Debug, Clone)]
pub(crate) struct FlatCounts {
    data: Vec<u64>,
    n_rows: usize,
    n_cols: usize,
}

impl FlatCounts {
    pub(crate) fn new(counts: &CountMatrix) -> Self {
        Self {
            data: counts.to_row_major(),
            n_rows: counts.n_rows(),
            n_cols: counts.n_cols(),
        }
    }

    #[inline]
    pub(crate) fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    fn row(&self, row: usize) -> &[u64] {
        &self.data[row * self.n_cols..(row + 1) * self.n_cols]
    }

    /// Column sums over the given rows; rows may repeat.
    pub(crate) fn sum_rows<I: IntoIterator<Item = usize>>(&self, rows: I) -> Vec<u64> {
        let mut sums = vec![0u64; self.n_cols];
        for row in rows {
            for (sum, &v) in sums.iter_mut().zip(self.row(row)) {
                *sum += v;
            }
        }
        sums
    }

    /// Column sums over a with-replacement sample of `n_rows` rows.
    pub(crate) fn bootstrap_sums<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u64> {
        let n = self.n_rows;
        self.sum_rows((0..n).map(|_| rng.gen_range(0..n)))
    }
}

/// Query and background rows pooled for label permutation.
#[derive(Debug, Clone)]
pub(crate) struct PooledCounts {
    rows: FlatCounts,
    n_query: usize,
    grand_total: Vec<u64>,
}

impl PooledCounts {
    pub(crate) fn new(query: &CountMatrix, background: &CountMatrix) -> Result<Self> {
        let pooled = query.concat_rows(background)?;
        let grand_total = pooled.col_sums();
        Ok(Self {
            rows: FlatCounts::new(&pooled),
            n_query: query.n_rows(),
            grand_total,
        })
    }

    #[inline]
    pub(crate) fn n_rows(&self) -> usize {
        self.rows.n_rows()
    }

    /// Pseudo-query and pseudo-background column sums for a row order.
    ///
    /// The first `n_query` rows of `order` form the pseudo-query. The
    /// pseudo-background is the rest, minus the next row under
    /// [`SplitGap::SkipOne`].
    pub(crate) fn split_sums(&self, order: &[usize], gap: SplitGap) -> (Vec<u64>, Vec<u64>) {
        let query = self.rows.sum_rows(order[..self.n_query].iter().copied());
        let mut background: Vec<u64> = self
            .grand_total
            .iter()
            .zip(&query)
            .map(|(&total, &q)| total - q)
            .collect();

        if gap == SplitGap::SkipOne {
            if let Some(&skipped) = order.get(self.n_query) {
                for (b, &v) in background.iter_mut().zip(self.rows.row(skipped)) {
                    *b -= v;
                }
            }
        }

        (query, background)
    }
}

/// Run a permutation loop and count, per statistic, how often a shuffled
/// split is at least as extreme as observed.
///
/// `tally` receives the pseudo-query and pseudo-background column sums and
/// increments the counters of every statistic it considers exceeded.
pub(crate) fn permutation_exceedances<R, F>(
    pooled: &PooledCounts,
    config: &ResampleConfig,
    rng: &mut R,
    n_stats: usize,
    tally: F,
) -> Vec<usize>
where
    R: Rng + ?Sized,
    F: Fn(&[u64], &[u64], &mut [usize]) + Sync,
{
    let n_rows = pooled.n_rows();

    if config.parallel {
        let base_seed: u64 = rng.gen();
        (0..config.iterations)
            .into_par_iter()
            .fold(
                || vec![0usize; n_stats],
                |mut counts, i| {
                    let mut local = seeded_rng(base_seed.wrapping_add(i as u64));
                    let mut order: Vec<usize> = (0..n_rows).collect();
                    order.shuffle(&mut local);
                    let (q, b) = pooled.split_sums(&order, config.split_gap);
                    tally(&q, &b, &mut counts);
                    counts
                },
            )
            .reduce(
                || vec![0usize; n_stats],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            )
    } else {
        let mut counts = vec![0usize; n_stats];
        // The order is shuffled in place each round, compounding like the
        // pooled matrix itself would.
        let mut order: Vec<usize> = (0..n_rows).collect();
        for _ in 0..config.iterations {
            order.shuffle(rng);
            let (q, b) = pooled.split_sums(&order, config.split_gap);
            tally(&q, &b, &mut counts);
        }
        counts
    }
}

/// Run a bootstrap loop, resampling query and background rows independently
/// with replacement, and collect one statistic vector per iteration.
pub(crate) fn bootstrap_statistics<R, F>(
    query: &FlatCounts,
    background: &FlatCounts,
    config: &ResampleConfig,
    rng: &mut R,
    statistic: F,
) -> Vec<Vec<f64>>
where
    R: Rng + ?Sized,
    F: Fn(&[u64], &[u64]) -> Vec<f64> + Sync,
{
    if config.parallel {
        let base_seed: u64 = rng.gen();
        (0..config.iterations)
            .into_par_iter()
            .map(|i| {
                let mut local = seeded_rng(base_seed.wrapping_add(i as u64));
                let q = query.bootstrap_sums(&mut local);
                let b = background.bootstrap_sums(&mut local);
                statistic(&q, &b)
            })
            .collect()
    } else {
        (0..config.iterations)
            .map(|_| {
                let q = query.bootstrap_sums(rng);
                let b = background.bootstrap_sums(rng);
                statistic(&q, &b)
            })
            .collect()
    }
}
