//! Configuration system for the ecosystem simulation.
//!
//! Supports YAML configuration files with sensible defaults.

use crate::animal::{Species, Traits};
use crate::error::ConfigError;
use crate::food::FoodKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    #[serde(default)]
    pub reproduction: ReproductionConfig,
    #[serde(default)]
    pub run: RunConfig,
    /// Species present at start, in statistics order
    pub animals: Vec<SpeciesConfig>,
    /// Food kinds present at start, in statistics order
    pub foods: Vec<FoodConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World/environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Size of the square toroidal grid
    pub grid_size: usize,
    /// Cap on cycle steps before a cycle is cut short
    pub max_cycle_steps: u32,
    /// Hunger added by every committed move
    pub move_cost: f64,
}

/// Mating configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReproductionConfig {
    /// Libido removed from an initiator whose mating attempt is refused
    pub libido_penalty: f64,
}

/// Run driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of epochs to simulate
    pub epochs: u64,
    /// Stop early once any species collapses
    pub stop_at_zero: bool,
    /// A species counts as collapsed at or below this population
    pub collapse_threshold: usize,
    /// Random seed for reproducibility (random when absent)
    pub seed: Option<u64>,
}

/// Per-species starting population and trait distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub species: Species,
    pub initial_count: usize,
    /// Std used both for initial trait sampling and for offspring mutation
    pub mutation_std: f64,
    /// Mean starting libido of the initial population
    #[serde(default)]
    pub initial_libido: f64,
    /// Trait means of the initial population
    pub traits: Traits,
}

/// Per-kind food configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodConfig {
    pub kind: FoodKind,
    pub initial_count: usize,
    /// Chance per empty food cell per epoch of growing this kind
    pub spawn_chance: f64,
    pub nutritional_value: f64,
}

/// Logging and checkpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Epochs between info-level summaries
    pub stats_interval: u64,
    /// Epochs between checkpoints (CLI only)
    pub checkpoint_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            reproduction: ReproductionConfig::default(),
            run: RunConfig::default(),
            animals: vec![SpeciesConfig::rabbit(), SpeciesConfig::fox()],
            foods: vec![FoodConfig::carrot()],
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            max_cycle_steps: 50,
            move_cost: 1.0,
        }
    }
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self { libido_penalty: 5.0 }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            stop_at_zero: true,
            collapse_threshold: 1,
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 10,
            checkpoint_interval: 50,
            log_level: "info".to_string(),
        }
    }
}

impl SpeciesConfig {
    pub fn rabbit() -> Self {
        Self {
            species: Species::Rabbit,
            initial_count: 40,
            mutation_std: 0.3,
            initial_libido: 0.0,
            traits: Traits {
                speed: 3.0,
                sight_radius: 4.0,
                max_hunger: 20.0,
                max_age: 30.0,
                reproductive_drive: 3.0,
                nutritional_value: 10.0,
            },
        }
    }

    pub fn fox() -> Self {
        Self {
            species: Species::Fox,
            initial_count: 8,
            mutation_std: 0.3,
            initial_libido: 0.0,
            traits: Traits {
                speed: 4.0,
                sight_radius: 6.0,
                max_hunger: 35.0,
                max_age: 45.0,
                reproductive_drive: 6.0,
                nutritional_value: 0.0,
            },
        }
    }
}

impl FoodConfig {
    pub fn carrot() -> Self {
        Self {
            kind: FoodKind::Carrot,
            initial_count: 60,
            spawn_chance: 0.02,
            nutritional_value: 6.0,
        }
    }
}

fn check_value(owner: &str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            owner: owner.to_string(),
            field,
            value,
        })
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Number of cells in each grid layer
    pub fn cell_count(&self) -> usize {
        self.world.grid_size * self.world.grid_size
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.grid_size == 0 {
            return Err(ConfigError::InvalidGridSize);
        }
        if self.world.max_cycle_steps == 0 {
            return Err(ConfigError::InvalidCycleSteps);
        }
        check_value("world", "move_cost", self.world.move_cost)?;
        check_value("reproduction", "libido_penalty", self.reproduction.libido_penalty)?;

        let capacity = self.cell_count();

        let mut seen = HashSet::new();
        for entry in &self.animals {
            let owner = entry.species.to_string();
            if !seen.insert(entry.species) {
                return Err(ConfigError::Duplicate { owner });
            }
            check_value(&owner, "mutation_std", entry.mutation_std)?;
            check_value(&owner, "initial_libido", entry.initial_libido)?;
            for (field, value) in [
                ("speed", entry.traits.speed),
                ("sight_radius", entry.traits.sight_radius),
                ("max_hunger", entry.traits.max_hunger),
                ("max_age", entry.traits.max_age),
                ("reproductive_drive", entry.traits.reproductive_drive),
                ("nutritional_value", entry.traits.nutritional_value),
            ] {
                check_value(&owner, field, value)?;
            }
        }

        let mut seen = HashSet::new();
        for entry in &self.foods {
            let owner = entry.kind.to_string();
            if !seen.insert(entry.kind) {
                return Err(ConfigError::Duplicate { owner });
            }
            if !(entry.spawn_chance.is_finite() && (0.0..=1.0).contains(&entry.spawn_chance)) {
                return Err(ConfigError::InvalidSpawnChance {
                    kind: owner,
                    value: entry.spawn_chance,
                });
            }
            check_value(&owner, "nutritional_value", entry.nutritional_value)?;
        }

        // Animals share one layer, food kinds share the other
        let animal_total: usize = self.animals.iter().map(|a| a.initial_count).sum();
        if animal_total > capacity {
            return Err(ConfigError::Overpopulated {
                owner: "animals".to_string(),
                requested: animal_total,
                capacity,
            });
        }
        let food_total: usize = self.foods.iter().map(|f| f.initial_count).sum();
        if food_total > capacity {
            return Err(ConfigError::Overpopulated {
                owner: "foods".to_string(),
                requested: food_total,
                capacity,
            });
        }

        Ok(())
    }

    /// Statistics column of a species
    pub fn species_index(&self, species: Species) -> Option<usize> {
        self.animals.iter().position(|a| a.species == species)
    }

    /// Statistics column of a food kind
    pub fn food_index(&self, kind: FoodKind) -> Option<usize> {
        self.foods.iter().position(|f| f.kind == kind)
    }

    pub fn species_config(&self, species: Species) -> Option<&SpeciesConfig> {
        self.animals.iter().find(|a| a.species == species)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.world.grid_size, loaded.world.grid_size);
        assert_eq!(loaded.animals.len(), 2);
        assert_eq!(loaded.foods[0].kind, FoodKind::Carrot);
    }

    #[test]
    fn test_zero_grid_rejected() {
        let mut config = Config::default();
        config.world.grid_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGridSize)));
    }

    #[test]
    fn test_spawn_chance_range() {
        let mut config = Config::default();
        config.foods[0].spawn_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpawnChance { .. })
        ));

        config.foods[0].spawn_chance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overpopulation_rejected() {
        let mut config = Config::default();
        config.world.grid_size = 5;
        config.animals[0].initial_count = 20;
        config.animals[1].initial_count = 6;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Overpopulated { requested: 26, capacity: 25, .. })
        ));
    }

    #[test]
    fn test_duplicate_species_rejected() {
        let mut config = Config::default();
        config.animals.push(SpeciesConfig::rabbit());
        assert!(matches!(config.validate(), Err(ConfigError::Duplicate { .. })));
    }

    #[test]
    fn test_unknown_species_tag_rejected() {
        let mut yaml = serde_yaml::to_string(&Config::default()).unwrap();
        yaml = yaml.replace("species: fox", "species: wolf");
        assert!(matches!(Config::from_yaml(&yaml), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_negative_std_rejected() {
        let mut config = Config::default();
        config.animals[1].mutation_std = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "mutation_std", .. })
        ));
    }
}
