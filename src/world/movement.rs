//! Movement and collision resolution.

use super::{behavior_for, World};
use crate::animal::AnimalId;
use crate::ecology::Surroundings;
use crate::error::{Result, SimError};
use crate::grid::Direction;
use rand::Rng;

/// Quarter turns tried after the requested direction is blocked
pub const MAX_MOVE_RETRIES: u32 = 4;

impl World {
    /// Ask the species where to go, then try to get there
    pub(super) fn move_with_behavior(&mut self, id: AnimalId) -> Result<()> {
        let direction = {
            let animal = self.animals.get(&id).ok_or(SimError::UnknownAnimal(id))?;
            let behavior = behavior_for(&self.registry, animal.species)?;
            let view =
                Surroundings::new(&self.grid, &self.animals).skipping(&self.pending_deaths);
            behavior.pathfinding(animal, &view, &mut self.rng)
        };

        self.move_animal(id, direction)?;
        Ok(())
    }

    /// Move one tile towards `direction`, turning a quarter either way at
    /// random each time the target cell is taken.
    ///
    /// Returns `false` when every attempt was blocked. The animal is then
    /// left untouched and its move is forfeited for this step.
    pub fn move_animal(&mut self, id: AnimalId, direction: Direction) -> Result<bool> {
        let from = self
            .animals
            .get(&id)
            .ok_or(SimError::UnknownAnimal(id))?
            .position;
        let size = self.grid.size();
        let mut direction = direction;

        for attempt in 0..=MAX_MOVE_RETRIES {
            let to = from.step(direction, size);

            if !self.grid.animals.is_occupied(to) {
                self.grid.move_animal(from, to)?;

                let animal = self.animals.get_mut(&id).ok_or(SimError::UnknownAnimal(id))?;
                animal.position = to;
                animal.hunger += self.config.world.move_cost;
                animal.steps_taken += 1;
                animal.last_direction = Some(direction);
                return Ok(true);
            }

            if attempt < MAX_MOVE_RETRIES {
                let turn = if self.rng.gen::<bool>() { 1 } else { -1 };
                direction = direction.rotate(turn);
            }
        }

        self.events.forfeited_moves += 1;
        log::trace!("{} is boxed in at {}, move forfeited", id, from);
        Ok(false)
    }
}
