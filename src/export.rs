//! Data export for analysis in external tools.

use crate::animal::{Animal, TRAIT_NAMES};
use crate::stats::{StatsHistory, MEAN, STD};
use crate::world::World;
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::{Path, PathBuf};

/// Export system for saving simulation data
pub struct ExportSystem;

impl ExportSystem {
    /// Export live animals to CSV
    pub fn export_animals_csv<'a, P, I>(animals: I, path: P) -> Result<()>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = &'a Animal>,
    {
        let mut file = BufWriter::new(File::create(path)?);

        writeln!(
            file,
            "id,species,sex,row,col,age,hunger,libido,generation,speed,sight_radius,max_hunger,max_age,reproductive_drive,nutritional_value"
        )?;

        for animal in animals {
            write!(
                file,
                "{},{},{:?},{},{},{},{:.2},{:.2},{}",
                animal.id.0,
                animal.species,
                animal.sex,
                animal.position.row,
                animal.position.col,
                animal.age,
                animal.hunger,
                animal.libido,
                animal.generation,
            )?;
            for value in animal.traits.as_array() {
                write!(file, ",{:.3}", value)?;
            }
            writeln!(file)?;
        }

        file.flush()
    }

    /// One row per epoch: food counts, then animal counts
    pub fn export_population_csv<P: AsRef<Path>>(history: &StatsHistory, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);

        write!(file, "epoch")?;
        for kind in &history.foods {
            write!(file, ",{}", kind)?;
        }
        for species in &history.species {
            write!(file, ",{}", species)?;
        }
        writeln!(file, ",births,kills,deaths")?;

        let matrix = history.population_matrix();
        for (snapshot, row) in history.snapshots.iter().zip(matrix.rows()) {
            write!(file, "{}", snapshot.epoch)?;
            for count in row {
                write!(file, ",{}", count)?;
            }
            writeln!(
                file,
                ",{},{},{}",
                snapshot.events.births,
                snapshot.events.kills,
                snapshot.events.deaths()
            )?;
        }

        file.flush()
    }

    /// Long format: one row per epoch, species and trait
    pub fn export_traits_csv<P: AsRef<Path>>(history: &StatsHistory, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "epoch,species,trait,mean,std")?;

        let tensor = history.trait_tensor();
        for (i, snapshot) in history.snapshots.iter().enumerate() {
            for (s, species) in history.species.iter().enumerate() {
                for (t, name) in TRAIT_NAMES.iter().enumerate() {
                    writeln!(
                        file,
                        "{},{},{},{:.4},{:.4}",
                        snapshot.epoch,
                        species,
                        name,
                        tensor[[i, s, t, MEAN]],
                        tensor[[i, s, t, STD]],
                    )?;
                }
            }
        }

        file.flush()
    }

    /// Export world snapshot to JSON
    pub fn export_world_json<P: AsRef<Path>>(world: &World, path: P) -> Result<()> {
        let snapshot = WorldSnapshot {
            epoch: world.epoch,
            seed: world.seed(),
            population: world.population(),
            food: world.food_count(),
            animals: world.animals().cloned().collect(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)
    }

    /// Write every export into `base_path`
    pub fn export_full_state<P: AsRef<Path>>(world: &World, base_path: P) -> Result<ExportManifest> {
        let base = base_path.as_ref();
        std::fs::create_dir_all(base)?;

        let animals_file = base.join("animals.csv");
        let population_file = base.join("population.csv");
        let traits_file = base.join("traits.csv");
        let snapshot_file = base.join("snapshot.json");

        Self::export_animals_csv(world.animals(), &animals_file)?;
        Self::export_population_csv(&world.history, &population_file)?;
        Self::export_traits_csv(&world.history, &traits_file)?;
        Self::export_world_json(world, &snapshot_file)?;

        Ok(ExportManifest {
            epoch: world.epoch,
            animals_file,
            population_file,
            traits_file,
            snapshot_file,
        })
    }
}

/// Manifest of exported files
#[derive(Debug)]
pub struct ExportManifest {
    pub epoch: u64,
    pub animals_file: PathBuf,
    pub population_file: PathBuf,
    pub traits_file: PathBuf,
    pub snapshot_file: PathBuf,
}

#[derive(serde::Serialize)]
struct WorldSnapshot {
    epoch: u64,
    seed: u64,
    population: usize,
    food: usize,
    animals: Vec<Animal>,
}
