//! Composition Profiler Library
//!
//! Compares the symbol composition of a query set of sequences against a
//! background set and reports which symbols, and which named symbol groups,
//! are enriched or depleted.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (CountMatrix, Alphabet, SymbolGroup, results)
//! - **frequency**: Group counts, frequencies, fractional difference, KL divergence
//! - **resample**: Seeded permutation and bootstrap loops
//! - **test**: Discovery and relative entropy permutation tests
//! - **profile**: Fractional differences with bootstrap standard errors
//! - **correct**: Multiple testing correction (Bonferroni)
//! - **pipeline**: Serializable analysis configuration and execution
//!
//! # Example
//!
//! ```no_run
//! use composition_profiler::prelude::*;
//!
//! let alphabet = Alphabet::amino_acids();
//! let query = CountMatrix::from_sequences(&["MKWVTFISLL", "MKAILVVLLY"], &alphabet);
//! let background = CountMatrix::from_sequences(&["MSTNPKPQRK", "MAEEKAAPGS"], &alphabet);
//!
//! let config = DiscoveryConfig::default().with_bonferroni(true);
//! let results = discover_amino_acids(&query, &background, &config, &mut seeded_rng(128)).unwrap();
//! results.to_tsv("discovery.tsv").unwrap();
//! ```

pub mod correct;
pub mod data;
pub mod error;
pub mod frequency;
pub mod pipeline;
pub mod profile;
pub mod resample;
pub mod test;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::correct::{bonferroni_alpha, correct_bonferroni};
    pub use crate::data::{
        Alphabet, AminoAcidGroup, Classification, CompositionResult, CountMatrix,
        DiscoveryResults, DiscoverySummary, PValue, SymbolGroup, AMINO_ACIDS,
    };
    pub use crate::error::{ProfilerError, Result};
    pub use crate::frequency::{
        column_frequencies, fractional_difference, group_counts, kl_divergence,
    };
    pub use crate::pipeline::{Analysis, AnalysisConfig, AnalysisOutput};
    pub use crate::profile::{
        compute_profile, emit_profile, CompositionProfile, ErrorBar, OutputFormat, ProfileConfig,
        ProfileOutput,
    };
    pub use crate::resample::{seeded_rng, ResampleConfig, SplitGap};
    pub use crate::test::{
        discover, discover_amino_acids, relative_entropy, DiscoveryConfig, RelativeEntropyResult,
    };
}
