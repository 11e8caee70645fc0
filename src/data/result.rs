//! Result types for composition analysis.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Outcome of the significance test for one symbol or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Significantly more frequent in the query set.
    Enriched,
    /// Significantly less frequent in the query set.
    Depleted,
    /// Not significant
    NotSignificant,
}

impl Classification {
    /// Classify an effect size and p-value against a threshold.
    ///
    /// A zero or undefined effect is never significant.
    pub fn from_test(effect: f64, p_value: f64, alpha: f64) -> Self {
        if p_value < alpha && effect > 0.0 {
            Self::Enriched
        } else if p_value < alpha && effect < 0.0 {
            Self::Depleted
        } else {
            Self::NotSignificant
        }
    }

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enriched => "Enriched",
            Self::Depleted => "Depleted",
            Self::NotSignificant => "Not significant",
        }
    }

    /// Whether this is a significant outcome.
    pub fn is_significant(&self) -> bool {
        !matches!(self, Self::NotSignificant)
    }
}

/// A Monte Carlo p-value with its finite resolution made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PValue {
    /// At least one resample was as extreme as the observed statistic.
    Exact(f64),
    /// No resample was as extreme; the p-value is below `1 / iterations`.
    LessThan(f64),
}

impl PValue {
    /// Build from an exceedance count.
    pub fn from_counts(n_extreme: usize, n_iterations: usize) -> Self {
        if n_extreme == 0 {
            Self::LessThan(1.0 / n_iterations as f64)
        } else {
            Self::Exact(n_extreme as f64 / n_iterations as f64)
        }
    }
}

impl std::fmt::Display for PValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(p) => write!(f, "P-value = {}", p),
            Self::LessThan(bound) => write!(f, "P-value < {}", bound),
        }
    }
}

/// Result for a single symbol or symbol group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionResult {
    /// Symbol or group name.
    pub name: String,
    /// Fractional difference `(query - background) / background`.
    pub effect: f64,
    /// Permutation p-value, `n_extreme / n_iterations`.
    pub p_value: f64,
    /// Number of permutations at least as extreme as observed.
    pub n_extreme: usize,
    /// Number of permutations run.
    pub n_iterations: usize,
    /// Test outcome.
    pub classification: Classification,
}

impl CompositionResult {
    /// Create a result, deriving the p-value and classification.
    pub fn new(
        name: String,
        effect: f64,
        n_extreme: usize,
        n_iterations: usize,
        alpha: f64,
    ) -> Self {
        let p_value = n_extreme as f64 / n_iterations as f64;
        Self {
            name,
            effect,
            p_value,
            n_extreme,
            n_iterations,
            classification: Classification::from_test(effect, p_value, alpha),
        }
    }

    /// P-value with explicit resolution.
    pub fn p_value_bound(&self) -> PValue {
        PValue::from_counts(self.n_extreme, self.n_iterations)
    }
}

/// Ordered results of a discovery run: alphabet symbols first, then groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResults {
    /// One record per symbol, then one per group.
    pub results: Vec<CompositionResult>,
    /// Significance threshold the classifications were made against.
    pub alpha: f64,
    /// Number of permutations.
    pub n_iterations: usize,
    /// Number of leading records that are single symbols.
    pub n_symbols: usize,
}

impl DiscoveryResults {
    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Option<&CompositionResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Records for single symbols.
    pub fn symbols(&self) -> &[CompositionResult] {
        &self.results[..self.n_symbols]
    }

    /// Records for groups.
    pub fn groups(&self) -> &[CompositionResult] {
        &self.results[self.n_symbols..]
    }

    /// Enriched or depleted records, in table order.
    pub fn significant(&self) -> Vec<&CompositionResult> {
        self.results
            .iter()
            .filter(|r| r.classification.is_significant())
            .collect()
    }

    /// Count outcomes.
    pub fn summary(&self) -> DiscoverySummary {
        let count = |c: Classification| {
            self.results
                .iter()
                .filter(|r| r.classification == c)
                .count()
        };
        DiscoverySummary {
            total: self.len(),
            enriched: count(Classification::Enriched),
            depleted: count(Classification::Depleted),
            not_significant: count(Classification::NotSignificant),
            alpha: self.alpha,
            n_iterations: self.n_iterations,
        }
    }

    /// Write results to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_tsv(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write results as TSV to any writer.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "test_name\teffect\tp_value\tn_extreme\ttest_result")?;
        for r in &self.results {
            writeln!(
                writer,
                "{}\t{:.6}\t{}\t{}\t{}",
                r.name,
                r.effect,
                r.p_value,
                r.n_extreme,
                r.classification.name()
            )?;
        }
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Iterate over results.
    pub fn iter(&self) -> impl Iterator<Item = &CompositionResult> {
        self.results.iter()
    }
}

/// Summary counts for a discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySummary {
    pub total: usize,
    pub enriched: usize,
    pub depleted: usize,
    pub not_significant: usize,
    pub alpha: f64,
    pub n_iterations: usize,
}

impl std::fmt::Display for DiscoverySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tests performed: {}", self.total)?;
        writeln!(f, "Permutations:    {}", self.n_iterations)?;
        writeln!(f, "Alpha:           {}", self.alpha)?;
        writeln!(f, "Enriched:        {}", self.enriched)?;
        writeln!(f, "Depleted:        {}", self.depleted)?;
        writeln!(f, "Not significant: {}", self.not_significant)?;
        Ok(())
    }
}
