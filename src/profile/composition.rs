//! Composition profiles: per-symbol fractional differences with bootstrap
//! standard errors.
//!
//! A profile is the numeric content of a composition bar chart. Rendering
//! is left to the caller; [`OutputFormat`] only tells it what to produce.
//! The core writes the plain-text variant itself.

use crate::data::{Alphabet, CountMatrix};
use crate::error::{ProfilerError, Result};
use crate::frequency::{column_frequencies, fractional_difference, frequencies_from_sums};
use crate::resample::{bootstrap_statistics, FlatCounts, ResampleConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Destination format for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Pdf,
    Eps,
    /// Tab-separated `residue, fracdiff, stderr` lines.
    Txt,
}

impl OutputFormat {
    /// File extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Eps => "eps",
            Self::Txt => "txt",
        }
    }

    /// Whether the format is produced by a graphics renderer.
    pub fn is_graphical(&self) -> bool {
        !matches!(self, Self::Txt)
    }

    /// Parse from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            "eps" => Some(Self::Eps),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }
}

/// Configuration for profile computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Sort symbols by ascending fractional difference.
    pub reorder: bool,
    /// Bootstrap settings.
    pub resample: ResampleConfig,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            reorder: true,
            resample: ResampleConfig::default(),
        }
    }
}

/// Asymmetric error bar for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorBar {
    pub lower: f64,
    pub upper: f64,
}

/// Fractional differences and standard errors per symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionProfile {
    /// Symbols, in display order.
    pub residues: Vec<char>,
    /// Observed fractional difference per symbol.
    pub fracdiff: Vec<f64>,
    /// Bootstrap standard error per symbol.
    pub stderr: Vec<f64>,
    /// Number of bootstrap iterations.
    pub n_iterations: usize,
}

impl CompositionProfile {
    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Indices that sort the profile by ascending fractional difference.
    ///
    /// The sort is stable; NaN entries go last.
    pub fn effect_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            let (x, y) = (self.fracdiff[a], self.fracdiff[b]);
            x.partial_cmp(&y)
                .unwrap_or_else(|| x.is_nan().cmp(&y.is_nan()))
        });
        order
    }

    /// Reorder by ascending fractional difference.
    ///
    /// An optional per-symbol list (e.g. colors) is permuted in lock-step.
    pub fn reorder_by_effect<C: Clone>(&mut self, colors: Option<&mut [C]>) -> Result<()> {
        let order = self.effect_order();
        if let Some(colors) = colors {
            if colors.len() != self.len() {
                return Err(ProfilerError::ShapeMismatch {
                    expected: self.len(),
                    actual: colors.len(),
                });
            }
            let permuted = permute(colors, &order);
            colors.clone_from_slice(&permuted);
        }
        self.residues = permute(&self.residues, &order);
        self.fracdiff = permute(&self.fracdiff, &order);
        self.stderr = permute(&self.stderr, &order);
        Ok(())
    }

    /// Reordered copy of this profile.
    pub fn sorted_by_effect(&self) -> Self {
        let order = self.effect_order();
        Self {
            residues: permute(&self.residues, &order),
            fracdiff: permute(&self.fracdiff, &order),
            stderr: permute(&self.stderr, &order),
            n_iterations: self.n_iterations,
        }
    }

    /// Split each standard error into upper and lower bars.
    ///
    /// Positive differences get an upper bar, negative ones a lower bar, and
    /// an exact zero gets both.
    pub fn error_bars(&self) -> Vec<ErrorBar> {
        self.fracdiff
            .iter()
            .zip(&self.stderr)
            .map(|(&d, &e)| ErrorBar {
                lower: if d <= 0.0 { e } else { 0.0 },
                upper: if d >= 0.0 { e } else { 0.0 },
            })
            .collect()
    }

    /// Write `residue\tfracdiff\tstderr` lines with three decimals.
    pub fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        for ((r, d), e) in self.residues.iter().zip(&self.fracdiff).zip(&self.stderr) {
            writeln!(writer, "{}\t{:.3}\t{:.3}", r, d, e)?;
        }
        Ok(())
    }

    /// Write the text form to a file.
    pub fn to_text_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_text(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn permute<T: Clone>(values: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| values[i].clone()).collect()
}

/// Compute a composition profile.
///
/// # Arguments
/// * `query` - Query counts, columns in `alphabet` order
/// * `background` - Background counts with the same column order
/// * `alphabet` - Symbols labelling the columns
/// * `config` - Reordering and bootstrap settings
/// * `rng` - Generator driving the bootstrap draws
///
/// # Returns
/// Fractional differences normalized over all columns, with the population
/// standard deviation of the bootstrap differences as standard error.
pub fn compute_profile<R: Rng + ?Sized>(
    query: &CountMatrix,
    background: &CountMatrix,
    alphabet: &Alphabet,
    config: &ProfileConfig,
    rng: &mut R,
) -> Result<CompositionProfile> {
    config.resample.validate()?;
    query.require_cols(alphabet.len())?;
    background.require_cols(alphabet.len())?;
    query.require_rows("Query")?;
    background.require_rows("Background")?;

    let k = alphabet.len();
    let fracdiff = fractional_difference(
        &column_frequencies(query, k)?,
        &column_frequencies(background, k)?,
    );

    log::debug!(
        "compute_profile: {} symbols, {} bootstrap iterations",
        k,
        config.resample.iterations
    );

    let samples = bootstrap_statistics(
        &FlatCounts::new(query),
        &FlatCounts::new(background),
        &config.resample,
        rng,
        |q, b| fractional_difference(&frequencies_from_sums(q, k), &frequencies_from_sums(b, k)),
    );

    let stderr: Vec<f64> = (0..k)
        .map(|col| samples.iter().map(|s| s[col]).population_std_dev())
        .collect();

    let mut profile = CompositionProfile {
        residues: alphabet.symbols().iter().map(|&b| b as char).collect(),
        fracdiff,
        stderr,
        n_iterations: config.resample.iterations,
    };

    if config.reorder {
        profile.reorder_by_effect::<()>(None)?;
    }

    Ok(profile)
}

/// What the core hands back for a requested output format.
#[derive(Debug, Clone)]
pub enum ProfileOutput {
    /// Text was written to the destination.
    Written,
    /// The caller's renderer must draw this profile in the given format.
    Rendered {
        profile: CompositionProfile,
        error_bars: Vec<ErrorBar>,
        format: OutputFormat,
    },
}

/// Emit a profile for a destination format.
///
/// Only [`OutputFormat::Txt`] is written by the core; graphical formats are
/// returned for an external renderer with the same numbers.
pub fn emit_profile<P: AsRef<Path>>(
    profile: &CompositionProfile,
    format: OutputFormat,
    path: P,
) -> Result<ProfileOutput> {
    match format {
        OutputFormat::Txt => {
            profile.to_text_file(path)?;
            Ok(ProfileOutput::Written)
        }
        OutputFormat::Png | OutputFormat::Pdf | OutputFormat::Eps => Ok(ProfileOutput::Rendered {
            profile: profile.clone(),
            error_bars: profile.error_bars(),
            format,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::seeded_rng;
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;

    fn create_test_data() -> (CountMatrix, CountMatrix, Alphabet) {
        let alphabet = Alphabet::new("ACGT").unwrap();
        let query: Vec<Vec<u64>> = (0..20).map(|i| vec![8 + (i % 3), 2, 5, 5 + (i % 2)]).collect();
        let background: Vec<Vec<u64>> = (0..30).map(|i| vec![5, 5 + (i % 4), 5, 5]).collect();
        (
            CountMatrix::from_rows(&query).unwrap(),
            CountMatrix::from_rows(&background).unwrap(),
            alphabet,
        )
    }

    fn quick_config(reorder: bool) -> ProfileConfig {
        ProfileConfig {
            reorder,
            resample: ResampleConfig::quick().with_iterations(300),
        }
    }

    #[test]
    fn test_profile_unordered() {
        let (query, background, alphabet) = create_test_data();
        let profile =
            compute_profile(&query, &background, &alphabet, &quick_config(false), &mut seeded_rng(1))
                .unwrap();

        assert_eq!(profile.residues, vec!['A', 'C', 'G', 'T']);
        assert!(profile.fracdiff[0] > 0.0);
        assert!(profile.fracdiff[1] < 0.0);
        for e in &profile.stderr {
            assert!(e.is_finite() && *e > 0.0);
        }
    }

    #[test]
    fn test_profile_reordered_ascending() {
        let (query, background, alphabet) = create_test_data();
        let profile =
            compute_profile(&query, &background, &alphabet, &quick_config(true), &mut seeded_rng(1))
                .unwrap();

        for w in profile.fracdiff.windows(2) {
            assert!(w[0] <= w[1]);
        }
        assert_eq!(profile.residues[0], 'C');
        assert_eq!(*profile.residues.last().unwrap(), 'A');
    }

    #[test]
    fn test_reorder_is_permutation_with_colors() {
        let mut profile = CompositionProfile {
            residues: vec!['A', 'B', 'C', 'D'],
            fracdiff: vec![0.3, -0.1, 0.3, -0.5],
            stderr: vec![0.01, 0.02, 0.03, 0.04],
            n_iterations: 10,
        };
        let mut colors = vec!["red", "green", "blue", "black"];
        let before: Vec<(char, f64, f64, &str)> = (0..4)
            .map(|i| (profile.residues[i], profile.fracdiff[i], profile.stderr[i], colors[i]))
            .collect();

        let sorted = profile.sorted_by_effect();
        profile.reorder_by_effect(Some(colors.as_mut_slice())).unwrap();
        assert_eq!(sorted.residues, profile.residues);

        // Stable: A stays ahead of C on the tie at 0.3
        assert_eq!(profile.residues, vec!['D', 'B', 'A', 'C']);
        assert_eq!(colors, vec!["black", "green", "red", "blue"]);
        for i in 0..4 {
            let tuple = (profile.residues[i], profile.fracdiff[i], profile.stderr[i], colors[i]);
            assert!(before.contains(&tuple));
        }
    }

    #[test]
    fn test_reorder_color_length_mismatch() {
        let mut profile = CompositionProfile {
            residues: vec!['A', 'B'],
            fracdiff: vec![0.1, -0.1],
            stderr: vec![0.0, 0.0],
            n_iterations: 1,
        };
        let mut colors = vec!["red"];
        assert!(profile.reorder_by_effect(Some(colors.as_mut_slice())).is_err());
    }

    #[test]
    fn test_error_bars() {
        let profile = CompositionProfile {
            residues: vec!['A', 'B', 'C'],
            fracdiff: vec![0.2, -0.3, 0.0],
            stderr: vec![0.05, 0.07, 0.01],
            n_iterations: 1,
        };
        let bars = profile.error_bars();
        assert_eq!(bars[0], ErrorBar { lower: 0.0, upper: 0.05 });
        assert_eq!(bars[1], ErrorBar { lower: 0.07, upper: 0.0 });
        assert_eq!(bars[2], ErrorBar { lower: 0.01, upper: 0.01 });
    }

    #[test]
    fn test_stderr_shrinks_with_more_rows() {
        let alphabet = Alphabet::new("AB").unwrap();
        let make = |n: usize, a: u64| -> CountMatrix {
            let rows: Vec<Vec<u64>> = (0..n)
                .map(|i| if i % 2 == 0 { vec![a, 2] } else { vec![2, a] })
                .collect();
            CountMatrix::from_rows(&rows).unwrap()
        };
        let config = quick_config(false);

        let small = compute_profile(&make(10, 6), &make(10, 4), &alphabet, &config, &mut seeded_rng(4))
            .unwrap();
        let large = compute_profile(&make(1000, 6), &make(1000, 4), &alphabet, &config, &mut seeded_rng(4))
            .unwrap();

        assert!(large.stderr[0] < small.stderr[0]);
        assert!(large.stderr[0] < 0.05);
    }

    #[test]
    fn test_identical_rows_have_zero_stderr() {
        let alphabet = Alphabet::new("AB").unwrap();
        let query = CountMatrix::from_rows(&[vec![3, 1], vec![3, 1], vec![3, 1]]).unwrap();
        let background = CountMatrix::from_rows(&[vec![1, 1], vec![1, 1]]).unwrap();
        let profile =
            compute_profile(&query, &background, &alphabet, &quick_config(false), &mut seeded_rng(1))
                .unwrap();
        assert_relative_eq!(profile.fracdiff[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(profile.stderr[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(profile.stderr[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_text_output() {
        let profile = CompositionProfile {
            residues: vec!['A', 'C'],
            fracdiff: vec![-0.21777, 0.5],
            stderr: vec![0.01234, 0.0],
            n_iterations: 1,
        };
        let file = NamedTempFile::new().unwrap();
        let output = emit_profile(&profile, OutputFormat::Txt, file.path()).unwrap();
        assert!(matches!(output, ProfileOutput::Written));

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, "A\t-0.218\t0.012\nC\t0.500\t0.000\n");
    }

    #[test]
    fn test_graphical_output_returned_for_rendering() {
        let profile = CompositionProfile {
            residues: vec!['A'],
            fracdiff: vec![0.1],
            stderr: vec![0.02],
            n_iterations: 1,
        };
        match emit_profile(&profile, OutputFormat::Png, "unused.png").unwrap() {
            ProfileOutput::Rendered { error_bars, format, .. } => {
                assert_eq!(format, OutputFormat::Png);
                assert_eq!(error_bars[0].upper, 0.02);
            }
            other => panic!("expected render request, got {:?}", other),
        }
        assert_eq!(OutputFormat::from_extension("EPS"), Some(OutputFormat::Eps));
        assert!(!OutputFormat::Txt.is_graphical());
    }
}
