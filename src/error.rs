//! Error types for configuration, placement and simulation failures.
//!
//! Only invariant violations and bad configuration surface here. Forfeited
//! moves and refused matings are ordinary outcomes and never become errors.

use crate::animal::{AnimalId, Species};
use crate::food::FoodKind;
use crate::grid::Position;
use thiserror::Error;

/// Invalid or unreadable configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid_size must be > 0")]
    InvalidGridSize,

    #[error("max_cycle_steps must be > 0")]
    InvalidCycleSteps,

    #[error("spawn_chance for {kind} must be within [0, 1], got {value}")]
    InvalidSpawnChance { kind: String, value: f64 },

    #[error("{field} for {owner} must be finite and non-negative, got {value}")]
    InvalidValue {
        owner: String,
        field: &'static str,
        value: f64,
    },

    #[error("{owner} appears more than once")]
    Duplicate { owner: String },

    #[error("{owner} asks for {requested} entities but the grid only has {capacity} cells")]
    Overpopulated {
        owner: String,
        requested: usize,
        capacity: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Occupancy violations on a grid layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("cell {0} is already occupied")]
    Occupied(Position),

    #[error("cell {position} lies outside a {size}x{size} grid")]
    OutOfBounds { position: Position, size: usize },

    #[error("cannot place {requested} entities on {available} free cells")]
    LayerFull { requested: usize, available: usize },
}

/// Fatal simulation failures
#[derive(Error, Debug)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("placement error: {0}")]
    Placement(#[from] GridError),

    #[error("no behavior registered for species {0}")]
    MissingBehavior(Species),

    #[error("species {0} is not part of the configuration")]
    UnconfiguredSpecies(Species),

    #[error("food kind {0} is not part of the configuration")]
    UnconfiguredFood(FoodKind),

    #[error("animal {0} is referenced by the grid but not tracked")]
    UnknownAnimal(AnimalId),
}

pub type Result<T> = std::result::Result<T, SimError>;
