//! ECOGRID - CLI Entry Point
//!
//! Predator/prey ecosystem simulator.

use clap::{Parser, Subcommand};
use ecogrid::checkpoint::{Checkpoint, CheckpointManager};
use ecogrid::export::ExportSystem;
use ecogrid::stats::MEAN;
use ecogrid::{benchmark, Config, World};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ecogrid")]
#[command(version)]
#[command(about = "Predator/prey ecosystem simulator on a toroidal grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of epochs to simulate (defaults to run.epochs)
        #[arg(short, long)]
        epochs: Option<u64>,

        /// Output directory for statistics and checkpoints
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Resume simulation from checkpoint
    Resume {
        /// Checkpoint file to resume from
        #[arg(short, long)]
        checkpoint: PathBuf,

        /// Number of additional epochs
        #[arg(short, long, default_value = "100")]
        epochs: u64,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of epochs
        #[arg(short, long, default_value = "200")]
        epochs: u64,

        /// Grid side length
        #[arg(short, long, default_value = "40")]
        grid_size: usize,

        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },

    /// Analyze a checkpoint file
    Analyze {
        /// Checkpoint file
        checkpoint: PathBuf,
    },
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            epochs,
            output,
            seed,
            quiet,
        } => run_simulation(config, epochs, output, seed, quiet),

        Commands::Resume {
            checkpoint,
            epochs,
            output,
        } => resume_simulation(checkpoint, epochs, output),

        Commands::Benchmark {
            epochs,
            grid_size,
            seed,
        } => {
            init_logging("warn");
            run_benchmark(epochs, grid_size, seed)
        }

        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }

        Commands::Analyze { checkpoint } => {
            init_logging("info");
            analyze_checkpoint(checkpoint)
        }
    }
}

/// Drive `world` for `epochs`, checkpointing along the way, then write
/// every export into `output`.
fn drive(
    world: &mut World,
    epochs: u64,
    output: &Path,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(output)?;

    let mut checkpoint_mgr = CheckpointManager::new(
        output.join("checkpoints"),
        world.config.logging.checkpoint_interval,
        10, // Keep last 10 checkpoints
    )?;

    let start = Instant::now();
    let report = world.run_with_callback(epochs, |w| {
        if checkpoint_mgr.should_save(w.epoch) {
            if let Err(e) = checkpoint_mgr.save(&w.create_checkpoint()) {
                log::error!("Checkpoint error: {}", e);
            }
        }
    })?;
    let elapsed = start.elapsed();

    if !quiet {
        println!();
        println!("=== Simulation Complete ===");
        println!("Time: {:.2}s", elapsed.as_secs_f64());
        println!("Epochs run: {}", report.epochs_run);
        println!(
            "Speed: {:.1} epochs/s",
            report.epochs_run as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );
        if let Some(species) = report.collapsed {
            println!("Stopped early: {} population collapsed", species);
        }
        let matings = world.history.mating_totals();
        println!(
            "Matings: {} attempts, {:.1}% successful",
            matings.attempts(),
            matings.success_rate() * 100.0
        );
        if let Some(latest) = world.history.latest() {
            println!("{}", world.history.summary(latest));
        }
    }

    let final_path = output.join("checkpoint_final.bin");
    world.create_checkpoint().save(&final_path)?;

    let stats_path = output.join("stats_history.json");
    world.history.save(&stats_path)?;

    let manifest = ExportSystem::export_full_state(world, output)?;
    if !quiet {
        println!("Final checkpoint: {}", final_path.display());
        println!("Stats history: {}", stats_path.display());
        println!("Population series: {}", manifest.population_file.display());
        println!("Trait statistics: {}", manifest.traits_file.display());
    }

    Ok(())
}

fn run_simulation(
    config_path: PathBuf,
    epochs: Option<u64>,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, source) = if config_path.exists() {
        (Config::from_file(&config_path)?, "file")
    } else {
        (Config::default(), "defaults")
    };
    init_logging(&config.logging.log_level);
    log::info!("Configuration loaded from {} ({})", config_path.display(), source);

    if seed.is_some() {
        config.run.seed = seed;
    }
    let epochs = epochs.unwrap_or(config.run.epochs);

    let mut world = World::new(config)?;

    if !quiet {
        println!("Starting simulation");
        println!("  Seed: {}", world.seed());
        println!("  Initial population: {}", world.population());
        println!(
            "  Grid size: {}x{}",
            world.config.world.grid_size, world.config.world.grid_size
        );
        println!("  Epochs: {}", epochs);
    }

    drive(&mut world, epochs, &output, quiet)
}

fn resume_simulation(
    checkpoint_path: PathBuf,
    epochs: u64,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let checkpoint = Checkpoint::load(&checkpoint_path)?;
    init_logging(&checkpoint.config.logging.log_level);

    let mut world = World::from_checkpoint(checkpoint)?;
    log::info!(
        "Resumed {} at epoch {} with {} animals",
        checkpoint_path.display(),
        world.epoch,
        world.population()
    );

    drive(&mut world, epochs, &output, false)
}

fn run_benchmark(epochs: u64, grid_size: usize, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ECOGRID Benchmark ===");
    println!("Epochs: {}", epochs);
    println!("Grid: {}x{}", grid_size, grid_size);
    println!();

    let result = benchmark(epochs, grid_size, seed)?;
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {}", output.display());
    Ok(())
}

fn analyze_checkpoint(checkpoint_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkpoint Analysis ===");
    println!("File: {}", checkpoint_path.display());
    println!();

    let checkpoint = Checkpoint::load(&checkpoint_path)?;

    println!("Epoch: {}", checkpoint.epoch);
    println!("Seed: {}", checkpoint.random_seed);
    println!("Animals: {}", checkpoint.animals.len());
    println!("Food: {}", checkpoint.foods.len());

    let history = &checkpoint.history;
    for (s, species) in history.species.iter().enumerate() {
        let members: Vec<_> = checkpoint
            .animals
            .iter()
            .filter(|a| a.species == *species)
            .collect();

        println!();
        println!("{}: {}", species, members.len());
        if members.is_empty() {
            continue;
        }

        let max_gen = members.iter().map(|a| a.generation).max().unwrap_or(0);
        println!("  Max generation: {}", max_gen);

        if let Some(latest) = history.latest() {
            for (t, name) in ecogrid::animal::TRAIT_NAMES.iter().enumerate() {
                println!("  {:<20} {:>8.2}", name, latest.traits[[s, t, MEAN]]);
            }
        }
    }

    if let Some(first) = history.snapshots.first() {
        println!();
        println!("Recorded epochs: {} (from {})", history.len(), first.epoch);
    }

    println!();
    println!(
        "Checkpoint size: {:.2} MB",
        checkpoint.size_bytes() as f64 / 1_000_000.0
    );

    Ok(())
}
