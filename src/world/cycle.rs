//! Cycle scheduling: per-animal turns, neighbour interactions and the
//! deferred deletion pass.

use super::{behavior_for, World};
use crate::animal::{AnimalId, DeathCause};
use crate::ecology::Interaction;
use crate::error::{Result, SimError};

impl World {
    /// Repeat cycle steps until every live animal is exhausted or the step
    /// cap is reached.
    pub(super) fn cycle(&mut self) -> Result<()> {
        let cap = self.config.world.max_cycle_steps;
        let mut steps = 0;

        while steps < cap && self.exhausted < self.animals.len() {
            self.cycle_step()?;
            steps += 1;
        }

        self.events.cycle_steps = steps;
        Ok(())
    }

    /// One cycle step: every animal active at the start takes a turn, then
    /// the step's deletions are applied.
    pub fn cycle_step(&mut self) -> Result<()> {
        // Later animals see earlier moves, but nobody acts twice or is
        // born into this step
        let active: Vec<AnimalId> = self.grid.animals.entities().map(|(_, id)| *id).collect();

        for id in active {
            if self.pending_deaths.contains_key(&id) {
                continue;
            }
            self.take_turn(id)?;
        }

        self.delete_animals()
    }

    fn take_turn(&mut self, id: AnimalId) -> Result<()> {
        let animal = self.animals.get_mut(&id).ok_or(SimError::UnknownAnimal(id))?;

        if let Some(cause) = animal.death_cause() {
            self.pending_deaths.entry(id).or_insert(cause);
            return Ok(());
        }

        if animal.steps_taken < animal.movement_budget() {
            self.feed_on_food(id)?;
            if !self.neighbor_interactions(id)? {
                self.move_with_behavior(id)?;
            }
        } else if !animal.exhausted {
            animal.exhausted = true;
            self.exhausted += 1;
        }

        Ok(())
    }

    /// Let the animal eat whatever lies on its own cell
    fn feed_on_food(&mut self, id: AnimalId) -> Result<()> {
        let animal = self.animals.get(&id).ok_or(SimError::UnknownAnimal(id))?;
        let behavior = behavior_for(&self.registry, animal.species)?;
        if !behavior.food_interaction(animal, &self.grid.food) {
            return Ok(());
        }

        let position = animal.position;
        if let Some(food) = self.grid.food.remove(position) {
            if let Some(animal) = self.animals.get_mut(&id) {
                animal.feed(food.nutritional_value);
                log::trace!("{} {} ate {} at {}", animal.species, id, food.kind, position);
            }
        }
        Ok(())
    }

    /// Resolve interactions with the four neighbours. Returns whether any
    /// of them spent the turn.
    fn neighbor_interactions(&mut self, id: AnimalId) -> Result<bool> {
        let animal = self.animals.get(&id).ok_or(SimError::UnknownAnimal(id))?;
        let species = animal.species;

        let mut neighbors: Vec<AnimalId> = Vec::with_capacity(4);
        for position in animal.position.neighbors(self.grid.size()) {
            if let Some(&other) = self.grid.animals.occupant(position) {
                // Small grids wrap onto the same cell more than once
                if other != id && !neighbors.contains(&other) {
                    neighbors.push(other);
                }
            }
        }

        let mut spent = false;
        for other_id in neighbors {
            if self.pending_deaths.contains_key(&other_id) {
                continue;
            }

            let interaction = {
                let behavior = behavior_for(&self.registry, species)?;
                let actor = self.animals.get(&id).ok_or(SimError::UnknownAnimal(id))?;
                let other = self
                    .animals
                    .get(&other_id)
                    .ok_or(SimError::UnknownAnimal(other_id))?;
                behavior.interact(actor, other)
            };

            if !interaction.occurred() {
                continue;
            }
            spent = true;

            if let Interaction::Predation { prey, nourishment } = interaction {
                if !self.pending_deaths.contains_key(&prey) {
                    self.pending_deaths.insert(prey, DeathCause::Predation);
                    self.events.kills += 1;
                    log::debug!("{} {} killed {}", species, id, prey);
                }
                if let Some(hunter) = self.animals.get_mut(&id) {
                    hunter.feed(nourishment);
                }
            }

            if interaction.birth_requested() {
                let outcome = self.sex_attempt(id, other_id)?;
                self.events.matings.record(outcome);
            }
        }

        Ok(spent)
    }

    /// Apply the deletion set of the finished step
    pub(super) fn delete_animals(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending_deaths);

        for (id, cause) in pending {
            let animal = self.animals.remove(&id).ok_or(SimError::UnknownAnimal(id))?;
            self.grid.animals.remove(animal.position);

            if animal.exhausted {
                self.exhausted = self.exhausted.saturating_sub(1);
            }

            match cause {
                DeathCause::OldAge => self.events.deaths_old_age += 1,
                DeathCause::Starvation => self.events.deaths_starvation += 1,
                // Counted when the kill happened
                DeathCause::Predation => {}
            }

            log::debug!(
                "{} {} died of {:?} at {} (age {}, gen {})",
                animal.species,
                id,
                cause,
                animal.position,
                animal.age,
                animal.generation
            );
        }

        Ok(())
    }
}
