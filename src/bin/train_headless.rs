//! Windowless trainer: evolves controllers on a track as fast as the CPU allows.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use neuro_racer::simulation::config::Config;
use neuro_racer::simulation::evolution::{Population, RunOutcome, Trainer};
use neuro_racer::simulation::track::TrackMask;

#[derive(Debug, Parser)]
#[command(author, version, about = "Evolve track-driving controllers without a window")]
struct Args {
    /// PNG track image; border pixels are matched by exact colour.
    #[arg(long)]
    track: PathBuf,

    /// JSON config file. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of generations to evaluate.
    #[arg(long)]
    generations: Option<usize>,

    /// Resume from a population checkpoint instead of a fresh population.
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Directory that receives the population and best controller after the run.
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(generations) = args.generations {
        config.optimizer.max_generations = generations;
    }
    config.validate().context("invalid configuration")?;

    let mask = TrackMask::load_png(&args.track, &config.simulation)
        .with_context(|| format!("loading track {}", args.track.display()))?;

    let population = match &args.resume {
        Some(path) => {
            let mut population = Population::load_from_file(path)
                .with_context(|| format!("loading checkpoint {}", path.display()))?;
            if args.config.is_some() {
                population
                    .set_params(config.optimizer.clone())
                    .context("checkpoint does not match the config")?;
            } else if let Some(generations) = args.generations {
                population.set_max_generations(generations);
            }
            population
        }
        None => Population::new(config.optimizer.clone()),
    };
    population
        .validate(&config.simulation)
        .context("population does not fit the simulation")?;

    tracing::info!(
        population = population.genomes().len(),
        generations = population.params().max_generations,
        "starting headless training"
    );

    let quit = Arc::new(AtomicBool::new(false));
    {
        let quit = Arc::clone(&quit);
        ctrlc::set_handler(move || quit.store(true, Ordering::Relaxed))
            .context("installing Ctrl-C handler")?;
    }

    let mut trainer = Trainer::new(population, config.simulation);
    let outcome = trainer.run(&mask, || quit.load(Ordering::Relaxed))?;
    let population = trainer.into_optimizer();

    match outcome {
        RunOutcome::Finished { generations } => {
            tracing::info!(
                generations,
                best = ?population.statistics().best_ever(),
                "training finished"
            );
        }
        RunOutcome::Aborted {
            completed_generations,
        } => {
            tracing::warn!(completed_generations, "training aborted");
        }
    }

    if let Some(dir) = &args.checkpoint_dir {
        population.save_checkpoint(dir)?;
    }

    Ok(())
}
