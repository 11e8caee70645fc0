//! Composition profiling: fractional differences with bootstrap error bars.

mod composition;

pub use composition::{
    compute_profile, emit_profile, CompositionProfile, ErrorBar, OutputFormat, ProfileConfig,
    ProfileOutput,
};
