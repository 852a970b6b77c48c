//! Species capabilities: what an animal eats, where it walks and how it
//! treats a neighbour.
//!
//! Behaviors only decide. The world engine applies every resulting change
//! (clearing food, moving, deleting prey, spawning offspring), which keeps
//! the grid single-writer.

use crate::animal::{Animal, AnimalId, DeathCause, Species};
use crate::food::Food;
use crate::grid::{Direction, Grid, Layer, Position};
use crate::rng::SimRng;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

/// Result of one animal examining an adjacent animal
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
    /// Nothing happens
    Ignore,
    /// The actor kills and eats `prey`, losing `nourishment` hunger
    Predation { prey: AnimalId, nourishment: f64 },
    /// The actor asks the neighbour to mate
    Mating,
}

impl Interaction {
    pub fn birth_requested(&self) -> bool {
        matches!(self, Interaction::Mating)
    }

    /// Whether the interaction spends the actor's turn
    pub fn occurred(&self) -> bool {
        !matches!(self, Interaction::Ignore)
    }
}

/// Read-only view of both layers handed to pathfinding
pub struct Surroundings<'a> {
    grid: &'a Grid,
    animals: &'a BTreeMap<AnimalId, Animal>,
    doomed: Option<&'a BTreeMap<AnimalId, DeathCause>>,
}

impl<'a> Surroundings<'a> {
    pub fn new(grid: &'a Grid, animals: &'a BTreeMap<AnimalId, Animal>) -> Self {
        Self {
            grid,
            animals,
            doomed: None,
        }
    }

    /// Hide animals already scheduled for deletion this step
    pub fn skipping(mut self, doomed: &'a BTreeMap<AnimalId, DeathCause>) -> Self {
        self.doomed = Some(doomed);
        self
    }

    fn is_doomed(&self, id: &AnimalId) -> bool {
        self.doomed.map_or(false, |d| d.contains_key(id))
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Closest animal within `radius` (toroidal Manhattan) matching `filter`,
    /// ties resolved in row-major order. The cell at `from` is skipped.
    pub fn nearest_animal<F>(&self, from: Position, radius: f64, filter: F) -> Option<&'a Animal>
    where
        F: Fn(&Animal) -> bool,
    {
        let size = self.size();
        self.grid
            .animals
            .entities()
            .filter(|(pos, id)| *pos != from && !self.is_doomed(id))
            .filter_map(|(pos, id)| self.animals.get(id).map(|a| (pos.distance(from, size), a)))
            .filter(|(dist, a)| *dist as f64 <= radius && filter(*a))
            .min_by_key(|(dist, _)| *dist)
            .map(|(_, a)| a)
    }

    /// Closest food within `radius`, including the cell at `from`
    pub fn nearest_food(&self, from: Position, radius: f64) -> Option<&'a Food> {
        let size = self.size();
        self.grid
            .food
            .entities()
            .map(|(pos, food)| (pos.distance(from, size), food))
            .filter(|(dist, _)| *dist as f64 <= radius)
            .min_by_key(|(dist, _)| *dist)
            .map(|(_, food)| food)
    }

    /// Direction that closes in on `target`, if it is not `from` itself
    pub fn approach(&self, from: Position, target: Position) -> Option<Direction> {
        Direction::toward(from.offset_to(target, self.size()))
    }
}

/// Keep heading the same way most of the time, turning now and then
pub fn wander(animal: &Animal, rng: &mut SimRng) -> Direction {
    match animal.last_direction {
        Some(direction) if rng.gen::<f64>() < 0.75 => direction,
        Some(direction) => direction.rotate(if rng.gen::<bool>() { 1 } else { -1 }),
        None => Direction::random(rng),
    }
}

/// Per-species capability supplied to the engine
pub trait Behavior {
    /// Whether the animal eats the food on its own cell
    fn food_interaction(&self, animal: &Animal, food: &Layer<Food>) -> bool;

    /// Where the animal wants to go this turn
    fn pathfinding(&self, animal: &Animal, view: &Surroundings<'_>, rng: &mut SimRng) -> Direction;

    /// What the animal does to an occupied neighbouring cell
    fn interact(&self, animal: &Animal, other: &Animal) -> Interaction;
}

/// Maps a species tag to its behavior
pub struct BehaviorRegistry {
    behaviors: HashMap<Species, Box<dyn Behavior>>,
}

impl BehaviorRegistry {
    /// Registry without any behavior
    pub fn empty() -> Self {
        Self {
            behaviors: HashMap::new(),
        }
    }

    /// Registry with the built-in rabbit and fox behaviors
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Species::Rabbit, Box::new(super::Rabbit));
        registry.register(Species::Fox, Box::new(super::Fox));
        registry
    }

    /// Install or replace the behavior of a species
    pub fn register(&mut self, species: Species, behavior: Box<dyn Behavior>) {
        self.behaviors.insert(species, behavior);
    }

    pub fn get(&self, species: Species) -> Option<&dyn Behavior> {
        self.behaviors.get(&species).map(|b| b.as_ref())
    }

    pub fn contains(&self, species: Species) -> bool {
        self.behaviors.contains_key(&species)
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animal::Traits;
    use crate::food::FoodKind;
    use crate::genetics::Sex;
    use crate::rng::create_rng;

    fn traits() -> Traits {
        Traits {
            speed: 1.0,
            sight_radius: 3.0,
            max_hunger: 10.0,
            max_age: 10.0,
            reproductive_drive: 1.0,
            nutritional_value: 2.0,
        }
    }

    fn setup(entries: &[(u64, Species, Position)]) -> (Grid, BTreeMap<AnimalId, Animal>) {
        let mut grid = Grid::new(8);
        let mut animals = BTreeMap::new();
        for &(id, species, pos) in entries {
            let id = AnimalId(id);
            grid.animals.place(pos, id).unwrap();
            animals.insert(id, Animal::new(id, species, Sex::Male, pos, traits()));
        }
        (grid, animals)
    }

    #[test]
    fn test_nearest_animal_respects_radius_and_wraps() {
        let (grid, animals) = setup(&[
            (1, Species::Fox, Position::new(0, 0)),
            (2, Species::Rabbit, Position::new(7, 0)),
            (3, Species::Rabbit, Position::new(4, 4)),
        ]);
        let view = Surroundings::new(&grid, &animals);

        let found = view
            .nearest_animal(Position::new(0, 0), 3.0, |a| a.species == Species::Rabbit)
            .unwrap();
        assert_eq!(found.id, AnimalId(2));
        assert_eq!(
            view.approach(Position::new(0, 0), found.position),
            Some(Direction::North)
        );

        assert!(view
            .nearest_animal(Position::new(4, 0), 1.0, |a| a.species == Species::Rabbit)
            .is_none());
    }

    #[test]
    fn test_nearest_animal_skips_doomed() {
        let (grid, animals) = setup(&[
            (1, Species::Fox, Position::new(0, 0)),
            (2, Species::Rabbit, Position::new(0, 1)),
            (3, Species::Rabbit, Position::new(0, 3)),
        ]);
        let mut doomed = BTreeMap::new();
        doomed.insert(AnimalId(2), DeathCause::Predation);
        let view = Surroundings::new(&grid, &animals).skipping(&doomed);

        let found = view
            .nearest_animal(Position::new(0, 0), 5.0, |a| a.species == Species::Rabbit)
            .unwrap();
        assert_eq!(found.id, AnimalId(3));
    }

    #[test]
    fn test_nearest_food() {
        let (mut grid, animals) = setup(&[]);
        grid.food
            .place(Position::new(2, 2), Food::new(FoodKind::Carrot, Position::new(2, 2), 1.0))
            .unwrap();
        let view = Surroundings::new(&grid, &animals);

        assert!(view.nearest_food(Position::new(0, 0), 4.0).is_some());
        assert!(view.nearest_food(Position::new(0, 0), 3.0).is_none());
    }

    #[test]
    fn test_wander_without_history_is_random_but_valid() {
        let mut rng = create_rng(4);
        let a = Animal::new(AnimalId(1), Species::Rabbit, Sex::Male, Position::new(0, 0), traits());
        let d = wander(&a, &mut rng);
        assert!(Direction::ALL.contains(&d));
    }

    #[test]
    fn test_interaction_accessors() {
        let kill = Interaction::Predation {
            prey: AnimalId(9),
            nourishment: 3.0,
        };
        assert!(!kill.birth_requested());
        assert!(kill.occurred());
        assert!(Interaction::Mating.birth_requested());
        assert!(!Interaction::Ignore.occurred());
    }

    #[test]
    fn test_registry_defaults() {
        let registry = BehaviorRegistry::with_defaults();
        assert!(registry.contains(Species::Rabbit));
        assert!(registry.contains(Species::Fox));
        assert!(BehaviorRegistry::empty().get(Species::Fox).is_none());
    }
}
