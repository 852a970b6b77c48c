//! Animal state, heritable traits and species tags.

use crate::genetics::Sex;
use crate::grid::{Direction, Position};
use crate::rng::gaussian;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique animal identifier, never reused within a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimalId(pub u64);

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Species tag selecting an animal's behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Rabbit,
    Fox,
}

impl Species {
    /// Code used in occupancy maps
    pub fn code(self) -> u32 {
        match self {
            Species::Rabbit => 1,
            Species::Fox => 2,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Rabbit => write!(f, "rabbit"),
            Species::Fox => write!(f, "fox"),
        }
    }
}

/// Cause of death tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Starvation,
    Predation,
    OldAge,
}

/// Heritable traits, fixed for an animal's lifetime
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    /// Tiles an animal may move per cycle (rounded)
    pub speed: f64,
    pub sight_radius: f64,
    pub max_hunger: f64,
    pub max_age: f64,
    /// Libido an animal must exceed before it agrees to mate
    pub reproductive_drive: f64,
    /// Hunger removed from a predator that eats this animal
    pub nutritional_value: f64,
}

impl Traits {
    /// Draw every trait from a normal distribution around `means`.
    /// Samples are floored at zero.
    pub fn sample<R: Rng + ?Sized>(means: &Traits, std: f64, rng: &mut R) -> Self {
        Self {
            speed: gaussian(rng, means.speed, std).max(0.0),
            sight_radius: gaussian(rng, means.sight_radius, std).max(0.0),
            max_hunger: gaussian(rng, means.max_hunger, std).max(0.0),
            max_age: gaussian(rng, means.max_age, std).max(0.0),
            reproductive_drive: gaussian(rng, means.reproductive_drive, std).max(0.0),
            nutritional_value: gaussian(rng, means.nutritional_value, std).max(0.0),
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [
            self.speed,
            self.sight_radius,
            self.max_hunger,
            self.max_age,
            self.reproductive_drive,
            self.nutritional_value,
        ]
    }
}

/// Names of the columns produced by `Animal::trait_vector`
pub const TRAIT_NAMES: [&str; 8] = [
    "speed",
    "reproductive_drive",
    "sight_radius",
    "max_hunger",
    "max_age",
    "age",
    "hunger",
    "libido",
];

/// An animal on the grid
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Animal {
    // Identity
    pub id: AnimalId,
    pub species: Species,
    pub sex: Sex,
    pub generation: u32,
    pub parents: Option<(AnimalId, AnimalId)>,

    // State
    pub position: Position,
    pub age: u32,
    pub hunger: f64,
    pub libido: f64,
    pub steps_taken: u32,
    /// Set once the animal has been counted as having used up its cycle
    pub exhausted: bool,
    pub last_direction: Option<Direction>,

    pub traits: Traits,
}

impl Animal {
    pub fn new(id: AnimalId, species: Species, sex: Sex, position: Position, traits: Traits) -> Self {
        Self {
            id,
            species,
            sex,
            generation: 0,
            parents: None,
            position,
            age: 0,
            hunger: 0.0,
            libido: 0.0,
            steps_taken: 0,
            exhausted: false,
            last_direction: None,
            traits,
        }
    }

    /// Why the animal should be removed, if it should
    pub fn death_cause(&self) -> Option<DeathCause> {
        if self.age as f64 > self.traits.max_age {
            Some(DeathCause::OldAge)
        } else if self.hunger > self.traits.max_hunger {
            Some(DeathCause::Starvation)
        } else {
            None
        }
    }

    /// Whole steps the animal may take per cycle: a move is allowed while
    /// `steps_taken < speed`, so fractional speeds round up
    #[inline]
    pub fn movement_budget(&self) -> u32 {
        self.traits.speed.ceil().max(0.0) as u32
    }

    /// Willing to mate: accumulated libido above the reproductive drive
    #[inline]
    pub fn libido_check(&self) -> bool {
        self.libido > self.traits.reproductive_drive
    }

    /// Hunger above `fraction` of the maximum
    #[inline]
    pub fn is_hungry(&self, fraction: f64) -> bool {
        self.hunger > self.traits.max_hunger * fraction
    }

    /// Remove `amount` of hunger, never going below zero
    pub fn feed(&mut self, amount: f64) {
        self.hunger = (self.hunger - amount).max(0.0);
    }

    /// Values aggregated per epoch, in `TRAIT_NAMES` order
    pub fn trait_vector(&self) -> [f64; 8] {
        [
            self.traits.speed,
            self.traits.reproductive_drive,
            self.traits.sight_radius,
            self.traits.max_hunger,
            self.traits.max_age,
            self.age as f64,
            self.hunger,
            self.libido,
        ]
    }

    /// Per-epoch bookkeeping: clear the turn budget, then age and metabolise
    pub fn advance_epoch(&mut self) {
        self.steps_taken = 0;
        self.exhausted = false;
        self.age += 1;
        self.hunger += 1.0;
        self.libido += 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    fn traits() -> Traits {
        Traits {
            speed: 2.0,
            sight_radius: 3.0,
            max_hunger: 10.0,
            max_age: 5.0,
            reproductive_drive: 2.0,
            nutritional_value: 4.0,
        }
    }

    #[test]
    fn test_death_causes() {
        let mut a = Animal::new(AnimalId(1), Species::Rabbit, Sex::Male, Position::new(0, 0), traits());
        assert_eq!(a.death_cause(), None);

        a.age = 5;
        assert_eq!(a.death_cause(), None);
        a.age = 6;
        assert_eq!(a.death_cause(), Some(DeathCause::OldAge));

        a.age = 0;
        a.hunger = 10.5;
        assert_eq!(a.death_cause(), Some(DeathCause::Starvation));
    }

    #[test]
    fn test_libido_check_is_strict() {
        let mut a = Animal::new(AnimalId(1), Species::Fox, Sex::Female, Position::new(0, 0), traits());
        a.libido = 2.0;
        assert!(!a.libido_check());
        a.libido = 2.5;
        assert!(a.libido_check());
    }

    #[test]
    fn test_advance_epoch() {
        let mut a = Animal::new(AnimalId(1), Species::Rabbit, Sex::Male, Position::new(0, 0), traits());
        a.steps_taken = 2;
        a.exhausted = true;
        a.advance_epoch();

        assert_eq!(a.steps_taken, 0);
        assert!(!a.exhausted);
        assert_eq!(a.age, 1);
        assert_eq!(a.hunger, 1.0);
        assert_eq!(a.libido, 1.0);
    }

    #[test]
    fn test_feed_floors_at_zero() {
        let mut a = Animal::new(AnimalId(1), Species::Rabbit, Sex::Male, Position::new(0, 0), traits());
        a.hunger = 3.0;
        a.feed(5.0);
        assert_eq!(a.hunger, 0.0);
    }

    #[test]
    fn test_sample_with_zero_std_returns_means() {
        let mut rng = create_rng(3);
        let t = Traits::sample(&traits(), 0.0, &mut rng);
        assert_eq!(t, traits());
    }

    #[test]
    fn test_movement_budget_rounds_up() {
        let mut t = traits();
        for (speed, budget) in [(2.6, 3), (1.4, 2), (0.4, 1), (2.0, 2), (0.0, 0)] {
            t.speed = speed;
            let a = Animal::new(AnimalId(1), Species::Rabbit, Sex::Male, Position::new(0, 0), t);
            assert_eq!(a.movement_budget(), budget, "speed {}", speed);
        }
    }
}
