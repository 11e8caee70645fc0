//! Data structures for composition analysis.

mod alphabet;
mod count_matrix;
mod result;

pub use alphabet::{Alphabet, AminoAcidGroup, SymbolGroup, AMINO_ACIDS};
pub use count_matrix::CountMatrix;
pub use result::{
    Classification, CompositionResult, DiscoveryResults, DiscoverySummary, PValue,
};
