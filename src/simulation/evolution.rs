//! Evolution loop: the optimizer protocol, the bundled population optimizer,
//! and the trainer that drives generations through the simulation.
//!
//! The simulation only needs three things from an optimizer: the current
//! candidates, a way to report each candidate's fitness, and a way to advance
//! to the next generation. Everything else about how candidates are bred stays
//! behind [`Optimizer`].

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::controller::{Controller, NUM_OUTPUTS};
use super::error::{ConfigError, EvolutionError};
use super::params::{OptimizerParams, Params};
use super::runner::{GenerationOutcome, GenerationRunner, RunState};
use super::statistics::{GenerationStats, Statistics};
use super::step::FitnessAccumulator;
use super::track::Classifier;

/// Identifier of a candidate, unique within a run.
pub type CandidateId = u64;

/// A candidate as seen by the simulation: an id and a borrowed controller.
#[derive(Debug)]
pub struct Candidate<'a, C: ?Sized> {
    /// Candidate id, used when reporting fitness.
    pub id: CandidateId,
    /// The candidate's policy.
    pub controller: &'a C,
}

/// Result of advancing an optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextGeneration {
    /// A new set of candidates is ready.
    Ready,
    /// The run is over (generation limit or fitness threshold reached).
    Finished,
}

/// Population-based optimizer interface.
pub trait Optimizer {
    /// Policy type of each candidate.
    type Controller: Controller;

    /// Candidates of the current generation, in evaluation order.
    fn candidates(&self) -> Vec<Candidate<'_, Self::Controller>>;

    /// Records the final fitness of one candidate. Must be called exactly once
    /// per candidate per generation.
    fn report_fitness(&mut self, id: CandidateId, fitness: f64) -> Result<(), EvolutionError>;

    /// Consumes the reported fitness and produces the next generation.
    fn next_generation(&mut self) -> Result<NextGeneration, EvolutionError>;

    /// Zero-based index of the current generation.
    fn generation(&self) -> usize;
}

/// A candidate of the bundled optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    /// Unique id.
    pub id: CandidateId,
    /// Controller network.
    pub brain: Brain,
    /// Reported fitness, `None` until evaluated.
    pub fitness: Option<f64>,
}

/// Generational optimizer over [`Brain`] controllers.
///
/// Ranks candidates by fitness, carries the elite over unchanged and breeds
/// the rest from the top of the ranking by weighted crossover and mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    params: OptimizerParams,
    generation: usize,
    genomes: Vec<Genome>,
    next_id: CandidateId,
    best: Option<Genome>,
    statistics: Statistics,
}

impl Population {
    /// Creates a random initial population.
    pub fn new(params: OptimizerParams) -> Self {
        let layer_sizes = params.layer_sizes();
        let genomes: Vec<Genome> = (0..params.population_size as CandidateId)
            .map(|id| Genome {
                id,
                brain: Brain::new(&layer_sizes, params.init_scale),
                fitness: None,
            })
            .collect();
        let next_id = genomes.len() as CandidateId;

        Self {
            params,
            generation: 0,
            genomes,
            next_id,
            best: None,
            statistics: Statistics::default(),
        }
    }

    /// Current candidates.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Fittest genome seen in any finished generation.
    pub fn best(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    /// Fitness history.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Optimizer parameters.
    pub fn params(&self) -> &OptimizerParams {
        &self.params
    }

    /// Changes the generation limit, e.g. when extending a resumed run.
    pub fn set_max_generations(&mut self, max_generations: usize) {
        self.params.max_generations = max_generations;
    }

    /// Replaces the optimizer settings of a resumed population.
    ///
    /// The new settings must describe the same network layout as the stored
    /// controllers; everything else (population size, mutation, limits) may change.
    pub fn set_params(&mut self, params: OptimizerParams) -> Result<(), ConfigError> {
        let stored = self.params.layer_sizes();
        let requested = params.layer_sizes();
        if requested != stored {
            return Err(ConfigError::Topology {
                candidate: self.genomes.first().map_or(0, |g| g.id),
                expected: requested,
                actual: Some(stored),
            });
        }
        self.params = params;
        Ok(())
    }

    /// Checks a loaded population against the simulation it is about to drive.
    ///
    /// Every controller must read one input per ray and produce the three
    /// output channels, with the layer widths its settings describe.
    pub fn validate(&self, params: &Params) -> Result<(), ConfigError> {
        if self.params.num_inputs != params.num_sensors() {
            return Err(ConfigError::InputArity {
                expected: params.num_sensors(),
                actual: self.params.num_inputs,
            });
        }
        if self.params.num_outputs != NUM_OUTPUTS {
            return Err(ConfigError::OutputArity {
                expected: NUM_OUTPUTS,
                actual: self.params.num_outputs,
            });
        }

        let expected = self.params.layer_sizes();
        for genome in self.genomes.iter().chain(&self.best) {
            let brain = &genome.brain;
            if brain.num_inputs() != params.num_sensors() {
                return Err(ConfigError::InputArity {
                    expected: params.num_sensors(),
                    actual: brain.num_inputs(),
                });
            }
            if brain.num_outputs() != NUM_OUTPUTS {
                return Err(ConfigError::OutputArity {
                    expected: NUM_OUTPUTS,
                    actual: brain.num_outputs(),
                });
            }
            let actual = brain.layer_sizes();
            if actual.as_ref() != Some(&expected) {
                return Err(ConfigError::Topology {
                    candidate: genome.id,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Saves the full population state to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), EvolutionError> {
        write_json(path.as_ref(), self)
    }

    /// Loads a population saved with [`Population::save_to_file`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, EvolutionError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EvolutionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Saves the best genome seen so far, if any. Returns whether a file was written.
    pub fn save_best(&self, path: impl AsRef<Path>) -> Result<bool, EvolutionError> {
        match &self.best {
            Some(best) => write_json(path.as_ref(), best).map(|()| true),
            None => Ok(false),
        }
    }

    /// Writes `population-<timestamp>.json` and, when available,
    /// `best-<timestamp>.json` into `dir`. Returns the population file path.
    pub fn save_checkpoint(&self, dir: impl AsRef<Path>) -> Result<PathBuf, EvolutionError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|source| EvolutionError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let population_path = dir.join(format!("population-{stamp}.json"));
        self.save_to_file(&population_path)?;
        self.save_best(dir.join(format!("best-{stamp}.json")))?;

        tracing::info!(
            path = %population_path.display(),
            generation = self.generation,
            "checkpoint saved"
        );
        Ok(population_path)
    }

    fn breed(&mut self, mut ranked: Vec<Genome>) -> Vec<Genome> {
        ranked.sort_by(|a, b| {
            b.fitness
                .unwrap_or(f64::NEG_INFINITY)
                .total_cmp(&a.fitness.unwrap_or(f64::NEG_INFINITY))
        });

        let size = self.params.population_size;
        let mut next: Vec<Genome> = ranked
            .iter()
            .take(self.params.elitism.min(size))
            .map(|g| Genome {
                id: g.id,
                brain: g.brain.clone(),
                fitness: None,
            })
            .collect();

        let survivors = ((ranked.len() as f32 * self.params.survival_threshold).ceil() as usize)
            .max(2)
            .min(ranked.len());
        let mut rng = rand::rng();

        while next.len() < size {
            let first = rng.random_range(0..survivors);
            let parent_1 = &ranked[first].brain;
            let mut brain = if survivors >= 2 && rng.random::<f32>() < self.params.crossover_prob
            {
                let mut second = rng.random_range(0..survivors);
                while second == first {
                    second = rng.random_range(0..survivors);
                }
                Brain::crossover_weighted(parent_1, &ranked[second].brain, rng.random())
            } else {
                parent_1.clone()
            };

            let scale = sample_mutation_scale(
                self.params.mutation_scale_min,
                self.params.mutation_scale_max,
            );
            brain.mutate(self.params.mutation_rate, scale);

            next.push(Genome {
                id: self.next_id,
                brain,
                fitness: None,
            });
            self.next_id += 1;
        }

        next
    }
}

impl Optimizer for Population {
    type Controller = Brain;

    fn candidates(&self) -> Vec<Candidate<'_, Brain>> {
        self.genomes
            .iter()
            .map(|g| Candidate {
                id: g.id,
                controller: &g.brain,
            })
            .collect()
    }

    fn report_fitness(&mut self, id: CandidateId, fitness: f64) -> Result<(), EvolutionError> {
        let genome = self
            .genomes
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(EvolutionError::UnknownCandidate(id))?;
        if genome.fitness.is_some() {
            return Err(EvolutionError::DuplicateReport(id));
        }
        genome.fitness = Some(fitness);
        Ok(())
    }

    fn next_generation(&mut self) -> Result<NextGeneration, EvolutionError> {
        let fitness: Vec<f64> = self.genomes.iter().filter_map(|g| g.fitness).collect();
        let missing = self.genomes.len() - fitness.len();
        if missing > 0 {
            return Err(EvolutionError::MissingFitness { missing });
        }

        if let Some(stats) = GenerationStats::from_fitness(self.generation, &fitness) {
            tracing::info!(
                generation = stats.generation,
                best = stats.best,
                mean = stats.mean,
                stdev = stats.stdev,
                worst = stats.worst,
                "generation evaluated"
            );
            self.statistics.record(stats);
        }

        let champion = self
            .genomes
            .iter()
            .max_by(|a, b| a.fitness.unwrap_or(0.0).total_cmp(&b.fitness.unwrap_or(0.0)));
        if let Some(champion) = champion {
            let improved = self
                .best
                .as_ref()
                .is_none_or(|best| champion.fitness > best.fitness);
            if improved {
                self.best = Some(champion.clone());
            }
        }

        let threshold_reached = match (self.params.fitness_threshold, self.statistics.last()) {
            (Some(threshold), Some(last)) => last.best >= threshold,
            _ => false,
        };

        // Saved populations must hold unscored candidates, also after the last generation.
        self.generation += 1;
        let ranked = std::mem::take(&mut self.genomes);
        self.genomes = self.breed(ranked);

        if threshold_reached || self.generation >= self.params.max_generations {
            Ok(NextGeneration::Finished)
        } else {
            Ok(NextGeneration::Ready)
        }
    }

    fn generation(&self) -> usize {
        self.generation
    }
}

/// How a [`Trainer::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The optimizer reported that the run is over.
    Finished {
        /// Generations evaluated and reported.
        generations: usize,
    },
    /// The quit poll fired. The interrupted generation was not reported.
    Aborted {
        /// Generations fully evaluated and reported before the quit.
        completed_generations: usize,
    },
}

/// Drives an optimizer through the simulation, one generation at a time.
pub struct Trainer<O: Optimizer> {
    optimizer: O,
    params: Params,
    runner: GenerationRunner,
    fitness: Vec<FitnessAccumulator>,
    completed: usize,
    finished: bool,
}

impl<O: Optimizer> Trainer<O> {
    /// Creates a trainer and spawns the first generation.
    pub fn new(optimizer: O, params: Params) -> Self {
        let mut trainer = Self {
            optimizer,
            runner: GenerationRunner::new(0, &params),
            params,
            fitness: Vec::new(),
            completed: 0,
            finished: false,
        };
        trainer.begin_generation();
        trainer
    }

    fn begin_generation(&mut self) {
        self.fitness = self
            .optimizer
            .candidates()
            .iter()
            .map(|c| FitnessAccumulator::new(c.id))
            .collect();
        self.runner = GenerationRunner::new(self.fitness.len(), &self.params);
        tracing::debug!(
            generation = self.optimizer.generation(),
            candidates = self.fitness.len(),
            "generation started"
        );
    }

    /// Executes one tick of the current generation.
    pub fn tick<M: Classifier + ?Sized>(&mut self, mask: &M) -> RunState {
        let candidates = self.optimizer.candidates();
        let controllers: Vec<&O::Controller> = candidates.iter().map(|c| c.controller).collect();
        self.runner
            .tick(&controllers, &mut self.fitness, mask, &self.params)
    }

    /// Reports the terminated generation's fitness and advances the optimizer.
    ///
    /// When another generation follows, its agents are spawned immediately.
    /// Once the optimizer has finished, further calls report nothing and
    /// return [`NextGeneration::Finished`].
    pub fn finish_generation(&mut self) -> Result<NextGeneration, EvolutionError> {
        if self.finished {
            return Ok(NextGeneration::Finished);
        }
        if self.runner.state() != RunState::Terminated {
            return Err(EvolutionError::GenerationRunning);
        }
        tracing::debug!(
            generation = self.optimizer.generation(),
            ticks = self.runner.ticks(),
            alive = self.runner.alive(),
            "generation terminated"
        );

        for fitness in &self.fitness {
            self.optimizer.report_fitness(fitness.id, fitness.value)?;
        }
        self.completed += 1;

        match self.optimizer.next_generation()? {
            NextGeneration::Ready => self.begin_generation(),
            NextGeneration::Finished => self.finished = true,
        }
        Ok(if self.finished {
            NextGeneration::Finished
        } else {
            NextGeneration::Ready
        })
    }

    /// Runs generations until the optimizer finishes or `should_quit` fires.
    ///
    /// `should_quit` is polled once per tick.
    pub fn run<M: Classifier + ?Sized>(
        &mut self,
        mask: &M,
        mut should_quit: impl FnMut() -> bool,
    ) -> Result<RunOutcome, EvolutionError> {
        if self.finished {
            return Ok(RunOutcome::Finished {
                generations: self.completed,
            });
        }
        loop {
            let outcome = {
                let candidates = self.optimizer.candidates();
                let controllers: Vec<&O::Controller> =
                    candidates.iter().map(|c| c.controller).collect();
                self.runner.run(
                    &controllers,
                    &mut self.fitness,
                    mask,
                    &self.params,
                    &mut should_quit,
                )
            };

            if let GenerationOutcome::Aborted { ticks } = outcome {
                tracing::warn!(
                    generation = self.optimizer.generation(),
                    ticks,
                    completed = self.completed,
                    "run aborted"
                );
                return Ok(RunOutcome::Aborted {
                    completed_generations: self.completed,
                });
            }

            if self.finish_generation()? == NextGeneration::Finished {
                return Ok(RunOutcome::Finished {
                    generations: self.completed,
                });
            }
        }
    }

    /// The optimizer being trained.
    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Consumes the trainer and returns the optimizer.
    pub fn into_optimizer(self) -> O {
        self.optimizer
    }

    /// Runner for the current generation.
    pub fn runner(&self) -> &GenerationRunner {
        &self.runner
    }

    /// Running fitness of the current generation, in candidate order.
    pub fn fitness(&self) -> &[FitnessAccumulator] {
        &self.fitness
    }

    /// Simulation parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Generations fully evaluated and reported.
    pub fn completed_generations(&self) -> usize {
        self.completed
    }

    /// Whether the optimizer has ended the run.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Samples a mutation scale log-uniformly from `[min, max)`.
fn sample_mutation_scale(min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    let log_mutation_scale = rand::rng().random_range(min.ln()..max.ln());
    log_mutation_scale.exp()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), EvolutionError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| EvolutionError::Io {
        path: path.to_path_buf(),
        source,
    })
}
