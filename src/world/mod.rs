//! World simulation engine - epoch driver and shared state.
//!
//! An epoch runs one cycle (see `cycle.rs`), then ages every survivor,
//! grows food and records statistics. The grid layers are the single source
//! of truth for occupancy; `Animal::position` and `Food::position` mirror them.

mod cycle;
mod movement;
mod reproduction;


pub use movement::MAX_MOVE_RETRIES;

use crate::animal::{Animal, AnimalId, DeathCause, Species, Traits};
use crate::checkpoint::Checkpoint;
use crate::config::Config;
use crate::ecology::{Behavior, BehaviorRegistry};
use crate::error::{GridError, Result, SimError};
use crate::food::{Food, FoodKind};
use crate::genetics::Sex;
use crate::grid::{Grid, Position};
use crate::rng::{create_rng, gaussian, SimRng};
use crate::stats::{process_statistics, EpochEvents, EpochStats, StatsHistory};
use ndarray::{Array2, Array4};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Outcome of `World::run`
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Epochs actually simulated by this call
    pub epochs_run: u64,
    /// Species that triggered an early stop, if any
    pub collapsed: Option<Species>,
    /// Epochs x (food kinds, then species), including the initial row
    pub populations: Array2<usize>,
    /// Epochs x species x traits x [mean, std], including the initial row
    pub traits: Array4<f64>,
}

/// The simulation world
pub struct World {
    // Configuration
    pub config: Config,

    // Environment
    grid: Grid,
    animals: BTreeMap<AnimalId, Animal>,
    registry: BehaviorRegistry,

    // State
    pub epoch: u64,
    next_animal_id: u64,
    /// Animals counted as having used up their movement budget this cycle
    exhausted: usize,
    /// Deletion set of the current cycle step
    pending_deaths: BTreeMap<AnimalId, DeathCause>,

    // Statistics
    events: EpochEvents,
    pub history: StatsHistory,

    // Random number generator (seeded for reproducibility)
    rng: SimRng,
    seed: u64,
}

/// Look up a species behavior without borrowing the whole world
fn behavior_for(registry: &BehaviorRegistry, species: Species) -> Result<&dyn Behavior> {
    registry
        .get(species)
        .ok_or(SimError::MissingBehavior(species))
}

impl World {
    /// Create a new world, seeded from the config or at random
    pub fn new(config: Config) -> Result<Self> {
        let seed = config
            .run
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Result<Self> {
        Self::with_registry(config, seed, BehaviorRegistry::with_defaults())
    }

    /// Create a world with custom species behaviors
    pub fn with_registry(config: Config, seed: u64, registry: BehaviorRegistry) -> Result<Self> {
        let mut world = Self::bare(config, seed, registry)?;
        world.spawn_entities()?;

        log::info!(
            "World ready: {}x{} grid, {} animals, {} food, seed {}",
            world.grid.size(),
            world.grid.size(),
            world.population(),
            world.food_count(),
            seed
        );

        Ok(world)
    }

    /// Validated world with empty layers
    fn bare(config: Config, seed: u64, registry: BehaviorRegistry) -> Result<Self> {
        config.validate()?;
        for entry in &config.animals {
            if !registry.contains(entry.species) {
                return Err(SimError::MissingBehavior(entry.species));
            }
        }

        let history = StatsHistory::new(
            config.animals.iter().map(|a| a.species).collect(),
            config.foods.iter().map(|f| f.kind).collect(),
        );

        Ok(Self {
            grid: Grid::new(config.world.grid_size),
            animals: BTreeMap::new(),
            registry,
            epoch: 0,
            next_animal_id: 0,
            exhausted: 0,
            pending_deaths: BTreeMap::new(),
            events: EpochEvents::default(),
            history,
            rng: create_rng(seed),
            seed,
            config,
        })
    }

    /// Restore world from checkpoint
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Result<Self> {
        Self::from_checkpoint_with_registry(checkpoint, BehaviorRegistry::with_defaults())
    }

    pub fn from_checkpoint_with_registry(
        checkpoint: Checkpoint,
        registry: BehaviorRegistry,
    ) -> Result<Self> {
        let mut world = Self::bare(checkpoint.config, checkpoint.random_seed, registry)?;
        world.epoch = checkpoint.epoch;
        world.next_animal_id = checkpoint.next_animal_id;
        world.rng = checkpoint.rng;
        world.history = checkpoint.history;

        for animal in checkpoint.animals {
            world.grid.animals.place(animal.position, animal.id)?;
            world.animals.insert(animal.id, animal);
        }
        for food in checkpoint.foods {
            world.grid.food.place(food.position, food)?;
        }

        Ok(world)
    }

    /// Create checkpoint of current state
    pub fn create_checkpoint(&self) -> Checkpoint {
        Checkpoint::new(
            self.epoch,
            self.config.clone(),
            self.animals.values().cloned().collect(),
            self.grid.food.entities().map(|(_, f)| *f).collect(),
            self.next_animal_id,
            self.rng.clone(),
            self.seed,
            self.history.clone(),
        )
    }

    /// Populate both layers at random from the configured counts
    fn spawn_entities(&mut self) -> Result<()> {
        let requested: usize = self.config.animals.iter().map(|a| a.initial_count).sum();
        let free = self.grid.animals.empty_cells();
        if requested > free.len() {
            return Err(GridError::LayerFull {
                requested,
                available: free.len(),
            }
            .into());
        }
        let mut positions: Vec<Position> = free
            .choose_multiple(&mut self.rng, requested)
            .copied()
            .collect();

        for entry in self.config.animals.clone() {
            for position in positions.drain(..entry.initial_count) {
                let traits = Traits::sample(&entry.traits, entry.mutation_std, &mut self.rng);
                let sex = Sex::random(&mut self.rng);
                let id = self.spawn_animal(entry.species, sex, position, traits)?;

                let age_cap = (traits.max_age as u32).max(1);
                let age = self.rng.gen_range(0..age_cap);
                let libido = gaussian(&mut self.rng, entry.initial_libido, entry.mutation_std).max(0.0);
                if let Some(animal) = self.animals.get_mut(&id) {
                    animal.age = age;
                    animal.libido = libido;
                }
            }
        }

        let requested: usize = self.config.foods.iter().map(|f| f.initial_count).sum();
        let free = self.grid.food.empty_cells();
        if requested > free.len() {
            return Err(GridError::LayerFull {
                requested,
                available: free.len(),
            }
            .into());
        }
        let mut positions: Vec<Position> = free
            .choose_multiple(&mut self.rng, requested)
            .copied()
            .collect();

        for entry in self.config.foods.clone() {
            for position in positions.drain(..entry.initial_count) {
                self.place_food(entry.kind, position)?;
            }
        }

        Ok(())
    }

    /// Put a new animal on an empty cell of the animal layer
    pub fn spawn_animal(
        &mut self,
        species: Species,
        sex: Sex,
        position: Position,
        traits: Traits,
    ) -> Result<AnimalId> {
        if self.config.species_index(species).is_none() {
            return Err(SimError::UnconfiguredSpecies(species));
        }
        if !self.registry.contains(species) {
            return Err(SimError::MissingBehavior(species));
        }

        let id = AnimalId(self.next_animal_id);
        self.grid.animals.place(position, id)?;
        self.next_animal_id += 1;
        self.animals
            .insert(id, Animal::new(id, species, sex, position, traits));
        Ok(id)
    }

    /// Put food of a configured kind on an empty cell of the food layer
    pub fn place_food(&mut self, kind: FoodKind, position: Position) -> Result<()> {
        let value = self
            .config
            .foods
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.nutritional_value)
            .ok_or(SimError::UnconfiguredFood(kind))?;
        self.grid
            .food
            .place(position, Food::new(kind, position, value))?;
        Ok(())
    }

    /// One epoch: a full cycle, then aging, food growth and statistics
    pub fn epoch(&mut self) -> Result<()> {
        self.cycle()?;
        self.reset_animals();
        self.spawn_food()?;
        self.epoch += 1;
        self.write_stats();
        Ok(())
    }

    /// Run up to `epochs` epochs, stopping early on population collapse
    /// when `run.stop_at_zero` is set.
    pub fn run(&mut self, epochs: u64) -> Result<RunReport> {
        self.run_with_callback(epochs, |_| {})
    }

    /// Run simulation with callback after every epoch
    pub fn run_with_callback<F>(&mut self, epochs: u64, mut callback: F) -> Result<RunReport>
    where
        F: FnMut(&World),
    {
        if self.history.is_empty() {
            self.write_stats();
        }

        let interval = self.config.logging.stats_interval.max(1);
        let mut collapsed = None;
        let mut epochs_run = 0;

        for i in 0..epochs {
            if i > 0 && self.config.run.stop_at_zero {
                if let Some(species) = self
                    .history
                    .collapsed_species(self.config.run.collapse_threshold)
                {
                    log::warn!(
                        "Population of {} collapsed at epoch {}, stopping early",
                        species,
                        self.epoch
                    );
                    collapsed = Some(species);
                    break;
                }
            }

            self.epoch()?;
            epochs_run += 1;

            if self.epoch % interval == 0 {
                if let Some(latest) = self.history.latest() {
                    log::info!("{}", self.history.summary(latest));
                }
            }

            callback(self);
        }

        Ok(RunReport {
            epochs_run,
            collapsed,
            populations: self.history.population_matrix(),
            traits: self.history.trait_tensor(),
        })
    }

    /// Clear turn budgets, then age and metabolise every animal
    fn reset_animals(&mut self) {
        for animal in self.animals.values_mut() {
            animal.advance_epoch();
        }
        self.exhausted = 0;
    }

    /// Grow food on empty food cells, kind by kind
    fn spawn_food(&mut self) -> Result<()> {
        for entry in self.config.foods.clone() {
            if entry.spawn_chance <= 0.0 {
                continue;
            }
            for position in self.grid.food.empty_cells() {
                if self.rng.gen_bool(entry.spawn_chance) {
                    self.place_food(entry.kind, position)?;
                }
            }
        }
        Ok(())
    }

    /// Snapshot counts and trait statistics into the history
    fn write_stats(&mut self) {
        let mut food_counts = vec![0usize; self.config.foods.len()];
        for (_, food) in self.grid.food.entities() {
            if let Some(i) = self.config.food_index(food.kind) {
                food_counts[i] += 1;
            }
        }

        let mut animal_counts = vec![0usize; self.config.animals.len()];
        let mut samples = Vec::with_capacity(self.animals.len());
        for (_, id) in self.grid.animals.entities() {
            let Some(animal) = self.animals.get(id) else {
                continue;
            };
            if let Some(i) = self.config.species_index(animal.species) {
                animal_counts[i] += 1;
                samples.push((i, animal.trait_vector()));
            }
        }

        let traits = process_statistics(&samples, self.config.animals.len());
        self.history.record(EpochStats {
            epoch: self.epoch,
            food_counts,
            animal_counts,
            traits,
            events: std::mem::take(&mut self.events),
        });
    }

    /// Get current population count
    pub fn population(&self) -> usize {
        self.animals.len()
    }

    pub fn species_population(&self, species: Species) -> usize {
        self.animals
            .values()
            .filter(|a| a.species == species)
            .count()
    }

    pub fn food_count(&self) -> usize {
        self.grid.food.count()
    }

    /// Check if every animal is gone
    pub fn is_extinct(&self) -> bool {
        self.animals.is_empty()
    }

    pub fn animal(&self, id: AnimalId) -> Option<&Animal> {
        self.animals.get(&id)
    }

    /// Mutable access for setting up scenarios. Position changes must go
    /// through `move_animal`.
    pub fn animal_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.animals.get_mut(&id)
    }

    /// Live animals in id order
    pub fn animals(&self) -> impl Iterator<Item = &Animal> {
        self.animals.values()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Events accumulated since the last statistics snapshot
    pub fn events(&self) -> &EpochEvents {
        &self.events
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Identifier map for renderers: species code plus ten times food code
    pub fn occupancy_codes(&self) -> Array2<u32> {
        let size = self.grid.size();
        let mut codes = Array2::<u32>::zeros((size, size));
        for (pos, id) in self.grid.animals.entities() {
            if let Some(animal) = self.animals.get(id) {
                codes[[pos.row, pos.col]] += animal.species.code();
            }
        }
        for (pos, food) in self.grid.food.entities() {
            codes[[pos.row, pos.col]] += food.kind.code() * 10;
        }
        codes
    }

    /// Grid and animal table agree in both directions
    pub fn is_consistent(&self) -> bool {
        let grid_matches = self.grid.animals.entities().all(|(pos, id)| {
            self.animals
                .get(id)
                .map_or(false, |a| a.position == pos && a.id == *id)
        });
        let food_matches = self.grid.food.entities().all(|(pos, f)| f.position == pos);

        grid_matches && food_matches && self.grid.animals.count() == self.animals.len()
    }
}
