//! Checkpoint system for saving and loading simulation state.
//!
//! Checkpoints are taken between epochs, when no cycle is in flight, so
//! turn budgets and the deletion set are always empty and not stored.

use crate::animal::Animal;
use crate::config::Config;
use crate::food::Food;
use crate::rng::SimRng;
use crate::stats::StatsHistory;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const MAGIC: &[u8; 4] = b"ECOG";

/// Complete simulation state for checkpointing
#[derive(Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Version for compatibility checking
    pub version: u32,
    /// Epochs completed
    pub epoch: u64,
    pub config: Config,
    /// Live animals in id order
    pub animals: Vec<Animal>,
    /// Food in row-major order
    pub foods: Vec<Food>,
    pub next_animal_id: u64,
    /// Generator state, so a resumed run continues the same sequence
    pub rng: SimRng,
    /// Seed the run was started from
    pub random_seed: u64,
    pub history: StatsHistory,
}

impl Checkpoint {
    /// Current checkpoint version
    pub const VERSION: u32 = 1;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        epoch: u64,
        config: Config,
        animals: Vec<Animal>,
        foods: Vec<Food>,
        next_animal_id: u64,
        rng: SimRng,
        random_seed: u64,
        history: StatsHistory,
    ) -> Self {
        Self {
            version: Self::VERSION,
            epoch,
            config,
            animals,
            foods,
            next_animal_id,
            rng,
            random_seed,
            history,
        }
    }

    /// Save checkpoint to binary file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        let encoded = bincode::serialize(self)?;
        writer.write_all(&encoded)?;
        writer.flush()?;

        Ok(())
    }

    /// Load checkpoint from binary file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(CheckpointError::InvalidFormat(
                "missing ECOG header".to_string(),
            ));
        }

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        let checkpoint: Checkpoint = bincode::deserialize(&buffer)?;

        if checkpoint.version != Self::VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: Self::VERSION,
                found: checkpoint.version,
            });
        }

        Ok(checkpoint)
    }

    /// Get approximate size in bytes
    pub fn size_bytes(&self) -> usize {
        bincode::serialized_size(self).unwrap_or(0) as usize
    }
}

/// Errors that can occur during checkpoint operations
#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Checkpoint manager for periodic saving
pub struct CheckpointManager {
    pub base_dir: PathBuf,
    /// Epochs between checkpoints
    pub interval: u64,
    /// Maximum checkpoints to keep
    pub max_checkpoints: usize,
    last_checkpoint: u64,
}

impl CheckpointManager {
    pub fn new<P: Into<PathBuf>>(
        base_dir: P,
        interval: u64,
        max_checkpoints: usize,
    ) -> Result<Self, CheckpointError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;

        Ok(Self {
            base_dir,
            interval,
            max_checkpoints,
            last_checkpoint: 0,
        })
    }

    /// Check if a checkpoint is due after `epoch`
    pub fn should_save(&self, epoch: u64) -> bool {
        self.interval > 0 && epoch > 0 && epoch % self.interval == 0 && epoch != self.last_checkpoint
    }

    pub fn checkpoint_path(&self, epoch: u64) -> PathBuf {
        self.base_dir.join(format!("checkpoint_{:08}.bin", epoch))
    }

    /// Save checkpoint and prune old ones
    pub fn save(&mut self, checkpoint: &Checkpoint) -> Result<PathBuf, CheckpointError> {
        let path = self.checkpoint_path(checkpoint.epoch);
        checkpoint.save(&path)?;
        self.last_checkpoint = checkpoint.epoch;
        log::info!("Checkpoint written to {}", path.display());

        self.cleanup()?;

        Ok(path)
    }

    fn checkpoint_files(&self) -> Result<Vec<std::fs::DirEntry>, CheckpointError> {
        Ok(std::fs::read_dir(&self.base_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("checkpoint_")
            })
            .collect())
    }

    /// Remove old checkpoints beyond max limit
    fn cleanup(&self) -> Result<(), CheckpointError> {
        let mut checkpoints = self.checkpoint_files()?;

        if checkpoints.len() > self.max_checkpoints {
            // Zero-padded names sort by epoch
            checkpoints.sort_by_key(|e| e.file_name());

            let to_remove = checkpoints.len() - self.max_checkpoints;
            for entry in checkpoints.into_iter().take(to_remove) {
                log::debug!("Removing old checkpoint {}", entry.path().display());
                std::fs::remove_file(entry.path())?;
            }
        }

        Ok(())
    }

    /// Find latest checkpoint in directory
    pub fn find_latest(&self) -> Option<PathBuf> {
        self.checkpoint_files()
            .ok()?
            .into_iter()
            .max_by_key(|e| e.file_name())
            .map(|e| e.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    fn create_test_checkpoint() -> Checkpoint {
        let mut config = Config::default();
        config.world.grid_size = 10;
        config.animals[0].initial_count = 6;
        config.animals[1].initial_count = 2;
        config.foods[0].initial_count = 10;
        let mut world = World::new_with_seed(config, 12345).unwrap();
        world.run(2).unwrap();
        world.create_checkpoint()
    }

    #[test]
    fn test_checkpoint_roundtrip() {
        let checkpoint = create_test_checkpoint();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.bin");

        checkpoint.save(&path).unwrap();
        let loaded = Checkpoint::load(&path).unwrap();

        assert_eq!(loaded.epoch, checkpoint.epoch);
        assert_eq!(loaded.animals.len(), checkpoint.animals.len());
        assert_eq!(loaded.foods.len(), checkpoint.foods.len());
        assert_eq!(loaded.random_seed, 12345);
        assert_eq!(loaded.history.len(), checkpoint.history.len());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.bin");
        std::fs::write(&path, b"XXXXxxxx").unwrap();

        assert!(matches!(
            Checkpoint::load(&path),
            Err(CheckpointError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_manager_prunes_old_checkpoints() {
        let checkpoint = create_test_checkpoint();
        let dir = tempfile::tempdir().unwrap();
        let mut manager = CheckpointManager::new(dir.path(), 1, 2).unwrap();

        for epoch in 1..=4 {
            let mut c = checkpoint.clone();
            c.epoch = epoch;
            assert!(manager.should_save(epoch));
            manager.save(&c).unwrap();
        }

        assert_eq!(manager.checkpoint_files().unwrap().len(), 2);
        assert_eq!(manager.find_latest(), Some(manager.checkpoint_path(4)));
        assert!(!manager.should_save(4));
    }

    #[test]
    fn test_checkpoint_size() {
        let checkpoint = create_test_checkpoint();
        let size = checkpoint.size_bytes();

        assert!(size > 0);
        assert!(size < 1_000_000);
    }
}
