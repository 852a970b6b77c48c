//! Mating consent and offspring placement.

use super::World;
use crate::animal::AnimalId;
use crate::error::{Result, SimError};
use crate::genetics::{blend_traits, MatingOutcome, Sex};

impl World {
    /// `initiator` asks `partner` to mate.
    ///
    /// Both need to pass their libido check. A refusal costs the initiator
    /// `reproduction.libido_penalty`. The child goes to the first free cell
    /// around the initiator; when there is none nothing happens.
    pub(super) fn sex_attempt(
        &mut self,
        initiator: AnimalId,
        partner: AnimalId,
    ) -> Result<MatingOutcome> {
        let a = self
            .animals
            .get(&initiator)
            .ok_or(SimError::UnknownAnimal(initiator))?;
        let b = self
            .animals
            .get(&partner)
            .ok_or(SimError::UnknownAnimal(partner))?;

        if !(a.libido_check() && b.libido_check()) {
            let penalty = self.config.reproduction.libido_penalty;
            if let Some(a) = self.animals.get_mut(&initiator) {
                a.libido -= penalty;
            }
            log::trace!("{} refused by {}", initiator, partner);
            return Ok(MatingOutcome::Refused);
        }

        let Some(position) = self.grid.free_neighbor(a.position) else {
            log::trace!("{} and {} found no room for offspring", initiator, partner);
            return Ok(MatingOutcome::NoSpace);
        };

        let species = a.species;
        let (traits_a, traits_b) = (a.traits, b.traits);
        let generation = a.generation.max(b.generation) + 1;
        let mutation_std = self
            .config
            .species_config(species)
            .map(|c| c.mutation_std)
            .ok_or(SimError::UnconfiguredSpecies(species))?;

        let traits = blend_traits(&traits_a, &traits_b, mutation_std, &mut self.rng);
        let sex = Sex::random(&mut self.rng);
        let child = self.spawn_animal(species, sex, position, traits)?;
        if let Some(c) = self.animals.get_mut(&child) {
            c.generation = generation;
            c.parents = Some((initiator, partner));
        }

        let cost = traits.max_hunger / 2.0;
        for parent in [initiator, partner] {
            if let Some(p) = self.animals.get_mut(&parent) {
                p.hunger += cost;
                p.libido = 0.0;
            }
        }

        self.events.births += 1;
        log::debug!(
            "{} {} born at {} to {} and {} (gen {})",
            species,
            child,
            position,
            initiator,
            partner,
            generation
        );

        Ok(MatingOutcome::Birth)
    }
}
