//! Foxes: predators that hunt rabbits and never touch food.

use super::behavior::{wander, Behavior, Interaction, Surroundings};
use crate::animal::{Animal, Species};
use crate::food::Food;
use crate::grid::{Direction, Layer};
use crate::rng::SimRng;

/// Hunger fraction above which a fox starts hunting
pub const HUNT_THRESHOLD: f64 = 0.25;

/// Predator species
#[derive(Clone, Copy, Debug, Default)]
pub struct Fox;

impl Behavior for Fox {
    fn food_interaction(&self, _animal: &Animal, _food: &Layer<Food>) -> bool {
        false
    }

    fn pathfinding(&self, animal: &Animal, view: &Surroundings<'_>, rng: &mut SimRng) -> Direction {
        let from = animal.position;
        let radius = animal.traits.sight_radius;

        if animal.is_hungry(HUNT_THRESHOLD) {
            if let Some(dir) = view
                .nearest_animal(from, radius, |other| other.species == Species::Rabbit)
                .and_then(|prey| view.approach(from, prey.position))
            {
                return dir;
            }
        }

        if animal.libido_check() {
            if let Some(dir) = view
                .nearest_animal(from, radius, |other| {
                    other.species == Species::Fox && other.sex.is_opposite(animal.sex)
                })
                .and_then(|mate| view.approach(from, mate.position))
            {
                return dir;
            }
        }

        wander(animal, rng)
    }

    fn interact(&self, animal: &Animal, other: &Animal) -> Interaction {
        match other.species {
            Species::Rabbit => Interaction::Predation {
                prey: other.id,
                nourishment: other.traits.nutritional_value,
            },
            Species::Fox if other.sex.is_opposite(animal.sex) && animal.libido_check() => {
                Interaction::Mating
            }
            Species::Fox => Interaction::Ignore,
        }
    }
}
