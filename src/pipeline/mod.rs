//! Configurable analysis runs over query and background counts.

mod runner;

pub use runner::{Analysis, AnalysisConfig, AnalysisOutput};
