//! Per-epoch population counts and trait statistics.

use crate::animal::{Species, TRAIT_NAMES};
use crate::food::FoodKind;
use crate::genetics::MatingTally;
use ndarray::{Array2, Array3, Array4, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Traits aggregated per species
pub const TRAIT_COUNT: usize = TRAIT_NAMES.len();
/// Index of the mean in the last tensor axis
pub const MEAN: usize = 0;
/// Index of the standard deviation in the last tensor axis
pub const STD: usize = 1;

/// Event counters accumulated over one epoch
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpochEvents {
    pub births: u64,
    pub kills: u64,
    pub deaths_old_age: u64,
    pub deaths_starvation: u64,
    pub matings: MatingTally,
    /// Moves abandoned after every retry hit an occupied cell
    pub forfeited_moves: u64,
    /// Cycle steps executed before quiescence or the cap
    pub cycle_steps: u32,
}

impl EpochEvents {
    pub fn deaths(&self) -> u64 {
        self.kills + self.deaths_old_age + self.deaths_starvation
    }
}

/// Statistics snapshot taken at the end of an epoch
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EpochStats {
    /// Epochs completed when the snapshot was taken
    pub epoch: u64,
    /// Live food per kind, in configuration order
    pub food_counts: Vec<usize>,
    /// Live animals per species, in configuration order
    pub animal_counts: Vec<usize>,
    /// (species, trait, [mean, std])
    pub traits: Array3<f64>,
    pub events: EpochEvents,
}

impl EpochStats {
    pub fn population(&self) -> usize {
        self.animal_counts.iter().sum()
    }
}

/// Mean and population standard deviation of every trait, per species.
///
/// `samples` pairs a species column with that animal's trait vector.
/// Species without samples keep zeros.
pub fn process_statistics(samples: &[(usize, [f64; TRAIT_COUNT])], species_count: usize) -> Array3<f64> {
    let mut out = Array3::<f64>::zeros((species_count, TRAIT_COUNT, 2));
    let mut counts = vec![0usize; species_count];

    for (species, values) in samples {
        counts[*species] += 1;
        for (t, v) in values.iter().enumerate() {
            out[[*species, t, MEAN]] += v;
        }
    }
    for (s, &n) in counts.iter().enumerate() {
        if n == 0 {
            continue;
        }
        for t in 0..TRAIT_COUNT {
            out[[s, t, MEAN]] /= n as f64;
        }
    }

    for (species, values) in samples {
        for (t, v) in values.iter().enumerate() {
            let d = v - out[[*species, t, MEAN]];
            out[[*species, t, STD]] += d * d;
        }
    }
    for (s, &n) in counts.iter().enumerate() {
        if n == 0 {
            continue;
        }
        for t in 0..TRAIT_COUNT {
            out[[s, t, STD]] = (out[[s, t, STD]] / n as f64).sqrt();
        }
    }

    out
}

/// Time series of epoch snapshots
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// Column order of `animal_counts` and trait tensors
    pub species: Vec<Species>,
    /// Column order of `food_counts`
    pub foods: Vec<FoodKind>,
    /// All recorded stats snapshots, oldest first
    pub snapshots: Vec<EpochStats>,
}

impl StatsHistory {
    pub fn new(species: Vec<Species>, foods: Vec<FoodKind>) -> Self {
        Self {
            species,
            foods,
            snapshots: Vec::new(),
        }
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: EpochStats) {
        self.snapshots.push(stats);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&EpochStats> {
        self.snapshots.last()
    }

    /// First species whose latest count is at or below `threshold`
    pub fn collapsed_species(&self, threshold: usize) -> Option<Species> {
        let latest = self.latest()?;
        self.species
            .iter()
            .zip(&latest.animal_counts)
            .find(|(_, &count)| count <= threshold)
            .map(|(&species, _)| species)
    }

    /// Epochs x (food kinds, then species) population counts
    pub fn population_matrix(&self) -> Array2<usize> {
        let cols = self.foods.len() + self.species.len();
        Array2::from_shape_fn((self.snapshots.len(), cols), |(i, j)| {
            let s = &self.snapshots[i];
            if j < self.foods.len() {
                s.food_counts[j]
            } else {
                s.animal_counts[j - self.foods.len()]
            }
        })
    }

    /// Epochs x species x traits x [mean, std]
    pub fn trait_tensor(&self) -> Array4<f64> {
        let mut tensor =
            Array4::<f64>::zeros((self.snapshots.len(), self.species.len(), TRAIT_COUNT, 2));
        for (i, s) in self.snapshots.iter().enumerate() {
            tensor.index_axis_mut(Axis(0), i).assign(&s.traits);
        }
        tensor
    }

    /// Get population of one species over time
    pub fn population_series(&self, species: Species) -> Vec<(u64, usize)> {
        match self.species.iter().position(|&s| s == species) {
            Some(col) => self
                .snapshots
                .iter()
                .map(|s| (s.epoch, s.animal_counts[col]))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Get amount of one food kind over time
    pub fn food_series(&self, kind: FoodKind) -> Vec<(u64, usize)> {
        match self.foods.iter().position(|&k| k == kind) {
            Some(col) => self
                .snapshots
                .iter()
                .map(|s| (s.epoch, s.food_counts[col]))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Mating attempts summed over every snapshot
    pub fn mating_totals(&self) -> MatingTally {
        let mut total = MatingTally::new();
        for s in &self.snapshots {
            total.births += s.events.matings.births;
            total.refused += s.events.matings.refused;
            total.no_space += s.events.matings.no_space;
        }
        total
    }

    /// Format a snapshot as a one-line summary
    pub fn summary(&self, stats: &EpochStats) -> String {
        let mut line = format!("E:{:5} | Pop:{:5}", stats.epoch, stats.population());
        for (species, count) in self.species.iter().zip(&stats.animal_counts) {
            line.push_str(&format!(" | {}:{:4}", species, count));
        }
        for (kind, count) in self.foods.iter().zip(&stats.food_counts) {
            line.push_str(&format!(" | {}:{:4}", kind, count));
        }
        line.push_str(&format!(
            " | Births:{} Deaths:{} Kills:{}",
            stats.events.births,
            stats.events.deaths(),
            stats.events.kills
        ));
        line
    }

    /// Save history to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
