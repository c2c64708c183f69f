//! One configured experiment: build a landscape, climb it, and optionally
//! survey its neutral networks.

use std::sync::Arc;
use std::time::Instant;

use super::landscape::NkLandscape;
use super::neutral::NeutralNetworkSurvey;
use super::rng::ExperimentRng;
use super::simulation::Simulation;
use crate::schema::{ExperimentConfig, ExperimentError, ExperimentReport};

/// Run the experiment described by `config`.
///
/// The landscape seed and every agent seed derive from
/// `config.random_seed` (or from entropy, in which case the chosen seed is
/// recorded in the report).
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport, ExperimentError> {
    config.validate()?;
    let start_time = Instant::now();

    let random_seed = config.random_seed.unwrap_or_else(rand::random);
    let mut rng = ExperimentRng::new(random_seed);

    let landscape = Arc::new(NkLandscape::new(config.landscape.clone(), rng.next_seed())?);
    log::info!(
        "landscape N={} K={} A={} ({:?}), seed {}",
        landscape.n(),
        landscape.k(),
        landscape.alleles(),
        config.landscape.values,
        random_seed
    );

    let mut simulation =
        Simulation::from_config(Arc::clone(&landscape), &config.simulation, &mut rng)?;
    let simulation_report = simulation.run(config.simulation.max_iterations);
    log::info!(
        "{} agents stopped after {} iterations ({:?}), {} distinct peaks",
        simulation_report.stats.agents,
        simulation_report.iterations,
        simulation_report.stop_reason,
        simulation_report.stats.distinct_peaks
    );

    let neutral_networks = if config.neutral_networks {
        let survey = NeutralNetworkSurvey::enumerate(&landscape)?;
        Some(survey.report())
    } else {
        None
    };

    Ok(ExperimentReport {
        config: config.clone(),
        random_seed,
        simulation: simulation_report,
        neutral_networks,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}
