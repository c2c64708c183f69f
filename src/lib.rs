//! NK landscapes - rugged fitness landscapes, hill climbing and neutral networks.
//!
//! This crate models Kauffman's NK fitness landscapes and the quantized NKq
//! variant. Fitness values are drawn lazily and memoized, agents climb the
//! landscape one mutation at a time, and a full enumeration of small
//! landscapes groups equal-fitness neighbours into neutral networks.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration and report types
//! - `compute`: Landscapes, agents, the simulation driver and neutral networks
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nk_landscape::{
//!     compute::{ExperimentRng, NeutralNetworkSurvey, NkLandscape, Simulation},
//!     schema::{LandscapeConfig, SimulationConfig},
//! };
//!
//! let mut rng = ExperimentRng::new(42);
//! let landscape =
//!     Arc::new(NkLandscape::new(LandscapeConfig::nkq(10, 2, 2), rng.next_seed()).unwrap());
//!
//! // Climb with 100 agents until nobody moves
//! let config = SimulationConfig::default();
//! let mut simulation = Simulation::from_config(landscape.clone(), &config, &mut rng).unwrap();
//! let report = simulation.run(config.max_iterations);
//! println!("{} distinct peaks", report.peaks.len());
//!
//! // Measure neutral networks over all 2^10 locations
//! let survey = NeutralNetworkSurvey::enumerate(&landscape).unwrap();
//! println!("common fraction: {:.3}", survey.common_fraction());
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{
    Agent, Location, NeutralNetworkGraph, NeutralNetworkSurvey, NkLandscape, Simulation,
};
pub use schema::{ExperimentConfig, LandscapeConfig, SimulationConfig, StepStrategy};
