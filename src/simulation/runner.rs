//! Generation runner: steps a cohort until everyone crashed or time ran out.

use super::agent::Agent;
use super::controller::Controller;
use super::params::Params;
use super::step::{FitnessAccumulator, step_cohort};
use super::track::Classifier;

/// Lifecycle of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Ticks are still being executed.
    Running,
    /// Every agent crashed or the frame cap was reached. Fitness is final.
    Terminated,
}

/// How a call to [`GenerationRunner::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The generation reached [`RunState::Terminated`].
    Completed {
        /// Ticks executed.
        ticks: u32,
        /// Agents still alive at the end.
        alive: usize,
    },
    /// The quit poll fired before termination. Fitness is partial.
    Aborted {
        /// Ticks executed before the quit.
        ticks: u32,
    },
}

/// Owns the agents of one generation and the tick counter.
#[derive(Debug, Clone)]
pub struct GenerationRunner {
    agents: Vec<Agent>,
    ticks: u32,
    alive: usize,
    state: RunState,
}

impl GenerationRunner {
    /// Spawns `cohort_size` agents at the start pose.
    pub fn new(cohort_size: usize, params: &Params) -> Self {
        Self::with_agents(vec![Agent::new(params); cohort_size])
    }

    /// Starts a generation from explicitly placed agents.
    pub fn with_agents(agents: Vec<Agent>) -> Self {
        let alive = agents.iter().filter(|a| a.alive).count();
        let state = if alive == 0 {
            RunState::Terminated
        } else {
            RunState::Running
        };
        Self {
            agents,
            ticks: 0,
            alive,
            state,
        }
    }

    /// Executes one tick if still running and returns the resulting state.
    ///
    /// `controllers` and `fitness` are indexed like the agents.
    pub fn tick<C, M>(
        &mut self,
        controllers: &[&C],
        fitness: &mut [FitnessAccumulator],
        mask: &M,
        params: &Params,
    ) -> RunState
    where
        C: Controller + ?Sized,
        M: Classifier + ?Sized,
    {
        if self.state == RunState::Terminated {
            return self.state;
        }
        debug_assert_eq!(controllers.len(), self.agents.len());
        debug_assert_eq!(fitness.len(), self.agents.len());

        self.alive = step_cohort(&mut self.agents, controllers, fitness, mask, params);
        self.ticks += 1;

        if self.alive == 0 || self.ticks >= params.frame_cap {
            self.state = RunState::Terminated;
        }
        self.state
    }

    /// Ticks until termination, polling `should_quit` once before every tick.
    pub fn run<C, M>(
        &mut self,
        controllers: &[&C],
        fitness: &mut [FitnessAccumulator],
        mask: &M,
        params: &Params,
        mut should_quit: impl FnMut() -> bool,
    ) -> GenerationOutcome
    where
        C: Controller + ?Sized,
        M: Classifier + ?Sized,
    {
        while self.state == RunState::Running {
            if should_quit() {
                return GenerationOutcome::Aborted { ticks: self.ticks };
            }
            self.tick(controllers, fitness, mask, params);
        }
        GenerationOutcome::Completed {
            ticks: self.ticks,
            alive: self.alive,
        }
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Ticks executed so far.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Agents alive after the last tick.
    pub fn alive(&self) -> usize {
        self.alive
    }

    /// The cohort, in candidate order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }
}
