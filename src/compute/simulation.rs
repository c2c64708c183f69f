//! Simulation driver - steps a population of agents on one landscape.

use std::collections::BTreeSet;
use std::sync::Arc;

use rayon::prelude::*;

use super::agent::Agent;
use super::landscape::NkLandscape;
use super::location::Location;
use super::rng::ExperimentRng;
use crate::schema::{ConfigError, SimulationConfig, SimulationReport, SimulationStats, StopReason};

/// A fixed population of agents advanced in lock-step.
#[derive(Debug)]
pub struct Simulation {
    landscape: Arc<NkLandscape>,
    agents: Vec<Agent>,
    parallel: bool,
    iterations: usize,
}

impl Simulation {
    /// Create `num_agents` agents through `factory`.
    pub fn new<F>(
        landscape: Arc<NkLandscape>,
        num_agents: usize,
        mut factory: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnMut(&Arc<NkLandscape>) -> Agent,
    {
        if num_agents == 0 {
            return Err(ConfigError::InvalidAgentCount);
        }
        let agents = (0..num_agents).map(|_| factory(&landscape)).collect();
        Ok(Self {
            landscape,
            agents,
            parallel: false,
            iterations: 0,
        })
    }

    /// Create the population described by `config`, seeding every agent
    /// from `rng`.
    pub fn from_config(
        landscape: Arc<NkLandscape>,
        config: &SimulationConfig,
        rng: &mut ExperimentRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let strategy = config.strategy;
        let simulation = Self::new(landscape, config.num_agents, |landscape| {
            Agent::new(Arc::clone(landscape), strategy, rng.fork())
        })?;
        Ok(simulation.with_parallel(config.parallel))
    }

    /// Step agents on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn landscape(&self) -> &Arc<NkLandscape> {
        &self.landscape
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Iterations run so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Step every agent once, in population order. Returns which agents moved.
    pub fn step(&mut self) -> Vec<bool> {
        self.iterations += 1;
        if self.parallel {
            // Agents share nothing but the landscape cache, which is thread-safe.
            self.agents.par_iter_mut().map(Agent::step).collect()
        } else {
            self.agents.iter_mut().map(Agent::step).collect()
        }
    }

    /// Step until no agent moves or `max_iterations` passes have run.
    ///
    /// Equal-fitness moves are accepted, so agents on a plateau may keep
    /// wandering; the cap bounds that.
    pub fn run(&mut self, max_iterations: usize) -> SimulationReport {
        let mut stop_reason = StopReason::IterationCap;
        for _ in 0..max_iterations {
            let moved = self.step();
            let moving = moved.iter().filter(|&&m| m).count();
            log::debug!(
                "iteration {}: {} of {} agents moved",
                self.iterations,
                moving,
                moved.len()
            );
            if moving == 0 {
                stop_reason = StopReason::Converged;
                break;
            }
        }

        if stop_reason == StopReason::IterationCap {
            log::warn!(
                "stopped after {} iterations with {} agents still active",
                self.iterations,
                self.active_count()
            );
        }

        self.report(stop_reason)
    }

    /// Snapshot of the current population as a report.
    pub fn report(&self, stop_reason: StopReason) -> SimulationReport {
        SimulationReport {
            iterations: self.iterations,
            stop_reason,
            fitnesses: self.fitnesses(),
            path_lengths: self.path_lengths(),
            peaks: self.peaks().into_iter().collect(),
            peak_heights: self.peak_heights(),
            stats: SimulationStats::from_simulation(self),
        }
    }

    /// Fitness of every agent.
    pub fn fitnesses(&self) -> Vec<f64> {
        self.agents.iter().map(Agent::fitness).collect()
    }

    /// Location of every agent.
    pub fn locations(&self) -> Vec<Location> {
        self.agents.iter().map(|a| a.location().clone()).collect()
    }

    /// Distinct agent locations.
    ///
    /// A lower bound on the number of local peaks: agents can share a peak,
    /// and some may still be climbing.
    pub fn peaks(&self) -> BTreeSet<Location> {
        self.agents.iter().map(|a| a.location().clone()).collect()
    }

    /// Distinct agent fitness values, ascending.
    pub fn peak_heights(&self) -> Vec<f64> {
        let mut heights = self.fitnesses();
        heights.sort_by(f64::total_cmp);
        heights.dedup_by(|a, b| a.to_bits() == b.to_bits());
        heights
    }

    /// Accepted moves of every agent.
    pub fn path_lengths(&self) -> Vec<usize> {
        self.agents.iter().map(Agent::moves).collect()
    }

    /// Agents that are not done yet.
    pub fn active_count(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_done()).count()
    }
}

impl SimulationStats {
    /// Compute statistics from a simulation.
    pub fn from_simulation(simulation: &Simulation) -> Self {
        let agents = simulation.agents.len();
        let count = agents.max(1) as f64;
        let fitnesses = simulation.fitnesses();

        Self {
            agents,
            active: simulation.active_count(),
            mean_fitness: fitnesses.iter().sum::<f64>() / count,
            max_fitness: fitnesses.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            distinct_peaks: simulation.peaks().len(),
            mean_path_length: simulation.path_lengths().iter().sum::<usize>() as f64 / count,
        }
    }
}
