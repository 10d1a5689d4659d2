use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use macroquad::prelude::*;
use neuro_racer::simulation::config::Config;
use neuro_racer::simulation::evolution::{NextGeneration, Population, Trainer};
use neuro_racer::simulation::runner::RunState;
use neuro_racer::simulation::track::{TrackMask, decode_png};

mod graphics;
mod ui;

#[derive(Debug, Parser)]
#[command(author, version, about = "Watch track-driving controllers evolve")]
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

    /// Directory that receives the population and best controller on exit.
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,

    /// Simulation ticks executed per rendered frame.
    #[arg(long, default_value_t = 1)]
    ticks_per_frame: u32,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Neuro Racer".to_string(),
        window_width: 1260,
        window_height: 600,
        window_resizable: true,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn quit_requested() -> bool {
    is_quit_requested() || is_key_pressed(KeyCode::Escape)
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    if let Err(e) = run(Args::parse()).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(generations) = args.generations {
        config.optimizer.max_generations = generations;
    }
    config.validate().context("invalid configuration")?;

    let track_bytes = std::fs::read(&args.track)
        .with_context(|| format!("reading track {}", args.track.display()))?;
    let image = decode_png(&track_bytes)?;
    let mask = TrackMask::from_image(&image, &config.simulation)?;
    let texture = Texture2D::from_image(&image);

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

    prevent_quit();
    let mut trainer = Trainer::new(population, config.simulation);
    let mut ui_state = ui::UIState::new(args.ticks_per_frame);
    let mut finished = false;

    tracing::info!(
        candidates = trainer.fitness().len(),
        "starting training"
    );

    'frames: loop {
        if !ui_state.paused {
            for _ in 0..ui_state.ticks_per_frame {
                if quit_requested() {
                    break 'frames;
                }
                if trainer.tick(&mask) == RunState::Terminated {
                    if trainer.finish_generation()? == NextGeneration::Finished {
                        finished = true;
                        break 'frames;
                    }
                    ui_state.status_message = Some(format!(
                        "Generations completed: {}",
                        trainer.completed_generations()
                    ));
                }
            }
        } else if quit_requested() {
            break;
        }

        clear_background(WHITE);
        if ui_state.rendering_enabled {
            graphics::draw_track(&texture);
            graphics::draw_agents(trainer.runner().agents(), trainer.params());
        }
        graphics::draw_alive_count(trainer.runner().alive());

        ui::draw_ui(&mut ui_state, &trainer);
        ui::process_egui();

        next_frame().await;
    }

    if finished {
        tracing::info!(
            generations = trainer.completed_generations(),
            "training finished"
        );
    } else {
        tracing::warn!(
            completed_generations = trainer.completed_generations(),
            "training aborted"
        );
    }

    if let Some(dir) = &args.checkpoint_dir {
        trainer.optimizer().save_checkpoint(dir)?;
    }

    Ok(())
}
