//! Sex determination and mating bookkeeping.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Biological sex for sexual reproduction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Generate random sex (50/50) from the simulation RNG
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    #[inline]
    pub fn is_opposite(self, other: Sex) -> bool {
        self != other
    }
}

/// Outcome of one mating attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatingOutcome {
    /// Offspring placed on the grid
    Birth,
    /// One of the partners failed the libido check
    Refused,
    /// Both consented but every neighbouring cell was taken
    NoSpace,
}

/// Running tally of mating attempts
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatingTally {
    pub births: u64,
    pub refused: u64,
    pub no_space: u64,
}

impl MatingTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: MatingOutcome) {
        match outcome {
            MatingOutcome::Birth => self.births += 1,
            MatingOutcome::Refused => self.refused += 1,
            MatingOutcome::NoSpace => self.no_space += 1,
        }
    }

    pub fn attempts(&self) -> u64 {
        self.births + self.refused + self.no_space
    }

    /// Get mating success rate
    pub fn success_rate(&self) -> f64 {
        let total = self.attempts();
        if total == 0 {
            0.0
        } else {
            self.births as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_sex_random() {
        let mut rng = create_rng(5);
        let mut males = 0;
        let mut females = 0;

        for _ in 0..1000 {
            match Sex::random(&mut rng) {
                Sex::Male => males += 1,
                Sex::Female => females += 1,
            }
        }

        // Should be roughly 50/50 (within 10%)
        assert!(males > 400 && males < 600);
        assert!(females > 400 && females < 600);
    }

    #[test]
    fn test_opposite() {
        assert!(Sex::Male.is_opposite(Sex::Female));
        assert!(!Sex::Female.is_opposite(Sex::Female));
    }

    #[test]
    fn test_tally() {
        let mut tally = MatingTally::new();
        assert_eq!(tally.success_rate(), 0.0);

        tally.record(MatingOutcome::Birth);
        tally.record(MatingOutcome::Refused);
        tally.record(MatingOutcome::Refused);
        tally.record(MatingOutcome::NoSpace);

        assert_eq!(tally.attempts(), 4);
        assert!((tally.success_rate() - 0.25).abs() < 1e-12);
    }
}
