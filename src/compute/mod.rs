//! Compute module - landscapes, agents, simulation and neutral networks.

mod agent;
mod experiment;
mod landscape;
mod location;
mod neutral;
mod rng;
mod simulation;

pub use agent::*;
pub use experiment::*;
pub use landscape::*;
pub use location::*;
pub use neutral::*;
pub use rng::*;
pub use simulation::*;
