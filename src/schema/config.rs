//! Configuration types for NK landscape experiments.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Hill-climbing iterations before the driver gives up on convergence.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

fn default_alleles() -> u8 {
    2
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

/// Landscape shape: `N` attributes, `K` interactions, `A` alleles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandscapeConfig {
    /// Number of attributes (N).
    pub n: usize,
    /// Number of neighbouring attributes each component reads besides its own (K).
    pub k: usize,
    /// Digits per attribute (A).
    #[serde(default = "default_alleles")]
    pub alleles: u8,
    /// How component values are generated on a cache miss.
    #[serde(default)]
    pub values: ComponentValues,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            n: 5,
            k: 2,
            alleles: 2,
            values: ComponentValues::Continuous,
        }
    }
}

/// Component value generator.
///
/// The NK model draws contributions from `[0, 1)`; the NKq model draws one of
/// `levels` equally spaced values in `[0, 1]`, which makes exact fitness ties
/// common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum ComponentValues {
    /// Uniform draw from `[0, 1)`.
    #[default]
    Continuous,
    /// Uniform level `l` in `[0, levels)`, stored as `l / (levels - 1)`.
    Quantized { levels: u32 },
}

/// Agent step strategy.
///
/// Only first-improvement hill climbing is provided. One-mutant-neighbour and
/// best-improvement climbers fit here as further variants; they must keep the
/// acceptance and `done` contract of [`crate::compute::Agent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum StepStrategy {
    /// Move to the first single-position mutation (in random order) that is
    /// at least as fit as the current location.
    #[default]
    Fitter,
}

/// Population and driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of agents.
    pub num_agents: usize,
    /// Strategy every agent uses.
    #[serde(default)]
    pub strategy: StepStrategy,
    /// Cap on driver iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Step agents on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_agents: 100,
            strategy: StepStrategy::Fitter,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parallel: false,
        }
    }
}

/// Top-level configuration for one experiment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub landscape: LandscapeConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Also enumerate the whole space and measure neutral networks.
    #[serde(default)]
    pub neutral_networks: bool,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            landscape: LandscapeConfig::default(),
            simulation: SimulationConfig::default(),
            neutral_networks: false,
            random_seed: None,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Attribute count N must be positive")]
    InvalidAttributeCount,
    #[error("Interaction width K={k} must be less than N={n}")]
    InvalidInteractionWidth { n: usize, k: usize },
    #[error("Allele count must be at least 2, got {0}")]
    InvalidAlleles(u8),
    #[error("Quantization needs at least 2 levels, got {0}")]
    InvalidQuantization(u32),
    #[error("Agent count must be positive")]
    InvalidAgentCount,
    #[error("Iteration cap must be positive")]
    InvalidIterationCap,
}

impl ComponentValues {
    /// Validate generator parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Continuous => Ok(()),
            Self::Quantized { levels } if levels < 2 => {
                Err(ConfigError::InvalidQuantization(levels))
            }
            Self::Quantized { .. } => Ok(()),
        }
    }
}

impl LandscapeConfig {
    /// Continuous NK landscape.
    pub fn nk(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            ..Default::default()
        }
    }

    /// Quantized NKq landscape with `levels` component levels.
    pub fn nkq(n: usize, k: usize, levels: u32) -> Self {
        Self {
            n,
            k,
            alleles: 2,
            values: ComponentValues::Quantized { levels },
        }
    }

    /// Validate landscape parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n == 0 {
            return Err(ConfigError::InvalidAttributeCount);
        }
        if self.k >= self.n {
            return Err(ConfigError::InvalidInteractionWidth {
                n: self.n,
                k: self.k,
            });
        }
        if self.alleles < 2 {
            return Err(ConfigError::InvalidAlleles(self.alleles));
        }
        self.values.validate()
    }
}

impl SimulationConfig {
    /// Validate population parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_agents == 0 {
            return Err(ConfigError::InvalidAgentCount);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidIterationCap);
        }
        Ok(())
    }
}

/// Errors raised while loading or running an experiment.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Neutral network survey failed: {0}")]
    Neutral(#[from] crate::compute::NeutralError),
}

impl ExperimentConfig {
    /// Validate the whole experiment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.landscape.validate()?;
        self.simulation.validate()
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ExperimentError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}
