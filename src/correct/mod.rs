//! Multiple testing correction.

pub mod bonferroni;

pub use bonferroni::{bonferroni_alpha, correct_bonferroni};
