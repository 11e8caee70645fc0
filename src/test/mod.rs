//! Permutation tests comparing query and background composition.


pub use discovery::{discover, discover_amino_acids, DiscoveryConfig};
pub use entropy::{relative_entropy, RelativeEntropyResult};
