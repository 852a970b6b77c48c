//! Genetics module - sex, mating tallies and trait inheritance.

pub mod crossover;
pub mod sex;

pub use crossover::blend_traits;
pub use sex::{MatingOutcome, MatingTally, Sex};
