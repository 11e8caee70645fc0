//! Analysis runner: a serializable description of one composition analysis.

use crate::data::{AminoAcidGroup, Alphabet, CountMatrix, DiscoveryResults, SymbolGroup};
use crate::error::{ProfilerError, Result};
use crate::profile::{compute_profile, CompositionProfile, ProfileConfig};
use crate::resample::ResampleConfig;
use crate::test::{discover, relative_entropy, DiscoveryConfig, RelativeEntropyResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn default_alpha() -> f64 {
    0.05
}

fn default_reorder() -> bool {
    true
}

/// The analysis to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Analysis {
    /// Permutation test over every symbol and group.
    Discover {
        #[serde(default = "default_alpha")]
        alpha: f64,
        #[serde(default)]
        bonferroni: bool,
        #[serde(default)]
        groups: Vec<SymbolGroup>,
    },
    /// Fractional differences with bootstrap standard errors.
    Profile {
        #[serde(default = "default_reorder")]
        reorder: bool,
    },
    /// Relative entropy with a one-tailed permutation p-value.
    RelativeEntropy,
}

impl Analysis {
    /// Discovery over all amino acid groups.
    pub fn discover_amino_acids(alpha: f64, bonferroni: bool) -> Self {
        Self::Discover {
            alpha,
            bonferroni,
            groups: AminoAcidGroup::all_groups(),
        }
    }

    /// Short name of the analysis.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Discover { .. } => "discover",
            Self::Profile { .. } => "profile",
            Self::RelativeEntropy => "relative_entropy",
        }
    }

    /// Run the analysis with a generator seeded from `resample.seed`.
    pub fn run(
        &self,
        query: &CountMatrix,
        background: &CountMatrix,
        alphabet: &Alphabet,
        resample: &ResampleConfig,
    ) -> Result<AnalysisOutput> {
        let mut rng = resample.rng();
        log::debug!(
            "Running {} analysis (seed {}, {} iterations)",
            self.name(),
            resample.seed,
            resample.iterations
        );

        match self {
            Self::Discover {
                alpha,
                bonferroni,
                groups,
            } => {
                let config = DiscoveryConfig {
                    alpha: *alpha,
                    bonferroni: *bonferroni,
                    resample: resample.clone(),
                };
                discover(query, background, alphabet, groups, &config, &mut rng)
                    .map(AnalysisOutput::Discovery)
            }
            Self::Profile { reorder } => {
                let config = ProfileConfig {
                    reorder: *reorder,
                    resample: resample.clone(),
                };
                compute_profile(query, background, alphabet, &config, &mut rng)
                    .map(AnalysisOutput::Profile)
            }
            Self::RelativeEntropy => {
                query.require_cols(alphabet.len())?;
                relative_entropy(query, background, resample, &mut rng)
                    .map(AnalysisOutput::RelativeEntropy)
            }
        }
    }
}

/// Result of a single analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "result", rename_all = "snake_case")]
pub enum AnalysisOutput {
    Discovery(DiscoveryResults),
    Profile(CompositionProfile),
    RelativeEntropy(RelativeEntropyResult),
}

impl AnalysisOutput {
    /// Write the plain-text form: a TSV table for discovery, profile lines,
    /// or the entropy summary.
    pub fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::Discovery(results) => results.write_tsv(writer),
            Self::Profile(profile) => profile.write_text(writer),
            Self::RelativeEntropy(result) => {
                write!(writer, "{}", result)?;
                Ok(())
            }
        }
    }

    /// Write the plain-text form to a file.
    pub fn to_text_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_text(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ProfilerError::from)
    }
}

/// Analysis configuration for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Name of the run.
    #[serde(default = "default_name")]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Column symbols, amino acids unless set.
    #[serde(default = "Alphabet::amino_acids")]
    pub alphabet: Alphabet,
    /// Analysis to run.
    pub analysis: Analysis,
    /// Resampling settings shared by every engine.
    #[serde(default)]
    pub resample: ResampleConfig,
}

fn default_name() -> String {
    "unnamed".to_string()
}

impl AnalysisConfig {
    /// Create a configuration over the amino acid alphabet.
    pub fn new(analysis: Analysis) -> Self {
        Self {
            name: default_name(),
            description: None,
            alphabet: Alphabet::amino_acids(),
            analysis,
            resample: ResampleConfig::default(),
        }
    }

    /// Set the run name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the column alphabet.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Set resampling settings.
    pub fn with_resample(mut self, resample: ResampleConfig) -> Self {
        self.resample = resample;
        self
    }

    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(ProfilerError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ProfilerError::from)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ProfilerError::from)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Run on count matrices whose columns follow `self.alphabet`.
    pub fn run(&self, query: &CountMatrix, background: &CountMatrix) -> Result<AnalysisOutput> {
        log::info!("Starting analysis '{}'", self.name);
        self.analysis
            .run(query, background, &self.alphabet, &self.resample)
    }

    /// Count raw sequences against `self.alphabet` and run.
    ///
    /// Symbols outside the alphabet are skipped.
    pub fn run_sequences<S: AsRef<[u8]>>(
        &self,
        query: &[S],
        background: &[S],
    ) -> Result<AnalysisOutput> {
        let query = CountMatrix::from_sequences(query, &self.alphabet);
        let background = CountMatrix::from_sequences(background, &self.alphabet);
        self.run(&query, &background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_counts() -> (CountMatrix, CountMatrix) {
        let query: Vec<Vec<u64>> = (0..12).map(|i| vec![6 + (i % 2), 2, 3, 3]).collect();
        let background: Vec<Vec<u64>> = (0..15).map(|i| vec![3, 3 + (i % 3), 3, 3]).collect();
        (
            CountMatrix::from_rows(&query).unwrap(),
            CountMatrix::from_rows(&background).unwrap(),
        )
    }

    fn dna_config(analysis: Analysis) -> AnalysisConfig {
        AnalysisConfig::new(analysis)
            .name("test")
            .with_alphabet(Alphabet::new("ACGT").unwrap())
            .with_resample(ResampleConfig::quick().with_iterations(200))
    }

    #[test]
    fn test_run_each_analysis() {
        let (query, background) = create_test_counts();
        let groups = vec![SymbolGroup::new("strong", "Strong", "GC")];

        let discovery = dna_config(Analysis::Discover {
            alpha: 0.05,
            bonferroni: true,
            groups,
        })
        .run(&query, &background)
        .unwrap();
        match discovery {
            AnalysisOutput::Discovery(results) => {
                assert_eq!(results.len(), 5);
                assert_eq!(results.results[4].name, "Strong");
            }
            other => panic!("unexpected output {:?}", other),
        }

        let profile = dna_config(Analysis::Profile { reorder: false })
            .run(&query, &background)
            .unwrap();
        assert!(matches!(profile, AnalysisOutput::Profile(p) if p.len() == 4));

        let entropy = dna_config(Analysis::RelativeEntropy)
            .run(&query, &background)
            .unwrap();
        assert!(matches!(entropy, AnalysisOutput::RelativeEntropy(r) if r.divergence > 0.0));
    }

    #[test]
    fn test_same_seed_same_output() {
        let (query, background) = create_test_counts();
        let config = dna_config(Analysis::RelativeEntropy);
        let a = config.run(&query, &background).unwrap().to_json().unwrap();
        let b = config.run(&query, &background).unwrap().to_json().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_yaml() {
        let yaml = r#"
name: surface
alphabet: ACGT
analysis:
  type: discover
  alpha: 0.01
  groups:
    - key: strong
      name: Strong
      members: GC
resample:
  iterations: 500
  split_gap: contiguous
"#;
        let config = AnalysisConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, "surface");
        assert_eq!(config.alphabet.len(), 4);
        assert_eq!(config.resample.iterations, 500);
        assert_eq!(config.resample.seed, 128);
        match &config.analysis {
            Analysis::Discover {
                alpha,
                bonferroni,
                groups,
            } => {
                assert_eq!(*alpha, 0.01);
                assert!(!bonferroni);
                assert_eq!(groups.len(), 1);
            }
            other => panic!("unexpected analysis {:?}", other),
        }

        let round = AnalysisConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(round.alphabet, config.alphabet);
        assert_eq!(round.analysis.name(), "discover");
    }

    #[test]
    fn test_config_defaults() {
        let config = AnalysisConfig::from_json(r#"{"analysis": {"type": "profile"}}"#).unwrap();
        assert_eq!(config.alphabet, Alphabet::amino_acids());
        assert_eq!(config.resample.iterations, 10_000);
        assert!(matches!(config.analysis, Analysis::Profile { reorder: true }));
    }

    #[test]
    fn test_run_sequences_skips_unknown_symbols() {
        let config = dna_config(Analysis::RelativeEntropy);
        let query = ["AAAC", "AANAC", "AAGA"];
        let background = ["ACGT", "ACGT", "CCGT", "ACGX"];
        let output = config.run_sequences(&query, &background).unwrap();
        assert!(matches!(output, AnalysisOutput::RelativeEntropy(_)));
    }

    #[test]
    fn test_error_handling() {
        let (query, background) = create_test_counts();
        let config = AnalysisConfig::new(Analysis::RelativeEntropy)
            .with_resample(ResampleConfig::quick().with_iterations(10));
        // Four columns against the 20-symbol default alphabet
        assert!(matches!(
            config.run(&query, &background),
            Err(ProfilerError::ShapeMismatch { .. })
        ));
        assert!(AnalysisConfig::from_yaml("analysis: {type: unknown}").is_err());
    }
}
