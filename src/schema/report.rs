//! Result types produced by simulations and neutral network surveys.

use serde::{Deserialize, Serialize};

use super::ExperimentConfig;
use crate::compute::Location;

/// Reason the driving loop stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// A full pass moved no agent.
    Converged,
    /// Reached the iteration cap with agents still moving.
    IterationCap,
}

/// Population summary statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimulationStats {
    /// Number of agents.
    pub agents: usize,
    /// Agents that have not reached a peak yet.
    pub active: usize,
    /// Mean fitness across agents.
    pub mean_fitness: f64,
    /// Highest fitness across agents.
    pub max_fitness: f64,
    /// Distinct agent locations.
    pub distinct_peaks: usize,
    /// Mean accepted moves per agent.
    pub mean_path_length: f64,
}

/// Outcome of a driven simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Driver iterations performed.
    pub iterations: usize,
    pub stop_reason: StopReason,
    /// Final fitness per agent, in population order.
    pub fitnesses: Vec<f64>,
    /// Accepted moves per agent, in population order.
    pub path_lengths: Vec<usize>,
    /// Distinct final locations.
    pub peaks: Vec<Location>,
    /// Distinct final fitness values, ascending.
    pub peak_heights: Vec<f64>,
    pub stats: SimulationStats,
}

/// Neutral network measurements over a fully enumerated landscape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeutralNetworkReport {
    /// Locations enumerated (`A^N`).
    pub total_locations: u64,
    /// Distinct fitness values observed.
    pub fitness_levels: usize,
    /// Size of every neutral network, largest first.
    pub component_sizes: Vec<usize>,
    /// Mean neutral network size.
    pub mean_component_size: f64,
    /// Share of locations in networks larger than the mean.
    pub common_fraction: f64,
}

/// Everything a single experiment run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub config: ExperimentConfig,
    /// Seed actually used, so entropy-seeded runs can be replayed.
    pub random_seed: u64,
    pub simulation: SimulationReport,
    pub neutral_networks: Option<NeutralNetworkReport>,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
}
