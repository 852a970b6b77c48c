//! Rabbits: grazers that eat food and flee nothing.

use super::behavior::{wander, Behavior, Interaction, Surroundings};
use crate::animal::{Animal, Species};
use crate::food::Food;
use crate::grid::{Direction, Layer};
use crate::rng::SimRng;

/// Hunger fraction above which a rabbit goes looking for food
pub const FORAGE_THRESHOLD: f64 = 0.5;

/// Grazing prey species
#[derive(Clone, Copy, Debug, Default)]
pub struct Rabbit;

impl Behavior for Rabbit {
    fn food_interaction(&self, animal: &Animal, food: &Layer<Food>) -> bool {
        animal.hunger > 0.0 && food.is_occupied(animal.position)
    }

    fn pathfinding(&self, animal: &Animal, view: &Surroundings<'_>, rng: &mut SimRng) -> Direction {
        let from = animal.position;
        let radius = animal.traits.sight_radius;

        if animal.is_hungry(FORAGE_THRESHOLD) {
            if let Some(dir) = view
                .nearest_food(from, radius)
                .and_then(|food| view.approach(from, food.position))
            {
                return dir;
            }
        }

        if animal.libido_check() {
            if let Some(dir) = view
                .nearest_animal(from, radius, |other| {
                    other.species == Species::Rabbit && other.sex.is_opposite(animal.sex)
                })
                .and_then(|mate| view.approach(from, mate.position))
            {
                return dir;
            }
        }

        wander(animal, rng)
    }

    fn interact(&self, animal: &Animal, other: &Animal) -> Interaction {
        if other.species == Species::Rabbit
            && other.sex.is_opposite(animal.sex)
            && animal.libido_check()
        {
            Interaction::Mating
        } else {
            Interaction::Ignore
        }
    }
}
