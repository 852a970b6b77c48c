//! # ECOGRID
//!
//! Discrete-time predator/prey ecosystem on a toroidal grid.
//!
//! ## Features
//!
//! - **Two-layer grid**: one animal and one food item per cell, edges wrap
//! - **Turn-based**: cycles of per-animal steps, epochs of aging and regrowth
//! - **Heritable traits**: offspring blend their parents with Gaussian mutation
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: Seeded random number generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ecogrid::{Config, World};
//!
//! let mut world = World::new(Config::default()).unwrap();
//! let report = world.run(100).unwrap();
//!
//! println!("Epochs run: {}", report.epochs_run);
//! println!("Population: {}", world.population());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use ecogrid::Config;
//!
//! let mut config = Config::default();
//! config.world.grid_size = 30;
//! config.animals[0].initial_count = 80;
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Checkpoints
//!
//! ```rust,no_run
//! use ecogrid::{Config, World};
//! use ecogrid::checkpoint::Checkpoint;
//!
//! let mut world = World::new(Config::default()).unwrap();
//! world.run(50).unwrap();
//!
//! world.create_checkpoint().save("checkpoint.bin").unwrap();
//!
//! let loaded = Checkpoint::load("checkpoint.bin").unwrap();
//! let restored = World::from_checkpoint(loaded).unwrap();
//! ```

pub mod animal;
pub mod checkpoint;
pub mod config;
pub mod ecology;
pub mod error;
pub mod export;
pub mod food;
pub mod genetics;
pub mod grid;
pub mod rng;
pub mod stats;
pub mod world;

// Re-export main types
pub use animal::{Animal, AnimalId, Species, Traits};
pub use config::Config;
pub use error::{ConfigError, GridError, SimError};
pub use food::{Food, FoodKind};
pub use grid::{Direction, Position};
pub use world::{RunReport, World};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark on the default configuration
pub fn benchmark(epochs: u64, grid_size: usize, seed: u64) -> error::Result<BenchmarkResult> {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.grid_size = grid_size;
    config.run.stop_at_zero = false;

    // Keep the default densities on other board sizes
    let scale = (grid_size * grid_size) as f64 / 400.0;
    for entry in &mut config.animals {
        entry.initial_count = (entry.initial_count as f64 * scale).round() as usize;
    }
    for entry in &mut config.foods {
        entry.initial_count = (entry.initial_count as f64 * scale).round() as usize;
    }

    let mut world = World::new_with_seed(config, seed)?;
    let initial_population = world.population();

    let start = Instant::now();
    let report = world.run(epochs)?;
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        epochs: report.epochs_run,
        initial_population,
        final_population: world.population(),
        elapsed_secs: elapsed.as_secs_f64(),
        epochs_per_second: report.epochs_run as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        max_generation: world.animals().map(|a| a.generation).max().unwrap_or(0),
    })
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub epochs: u64,
    pub initial_population: usize,
    pub final_population: usize,
    pub elapsed_secs: f64,
    pub epochs_per_second: f64,
    pub max_generation: u32,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Epochs: {}", self.epochs)?;
        writeln!(f, "Population: {} -> {}", self.initial_population, self.final_population)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} epochs/s", self.epochs_per_second)?;
        writeln!(f, "Max generation: {}", self.max_generation)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let mut config = Config::default();
        config.run.stop_at_zero = false;
        let mut world = World::new_with_seed(config, 1).unwrap();

        let report = world.run(20).unwrap();

        assert_eq!(report.epochs_run, 20);
        assert_eq!(world.epoch, 20);
        assert_eq!(report.populations.shape()[0], 21);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(10, 20, 3).unwrap();

        assert_eq!(result.epochs, 10);
        assert_eq!(result.initial_population, 48);
        assert!(result.epochs_per_second > 0.0);
    }
}
