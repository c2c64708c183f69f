//! End-to-end hill climbing on seeded landscapes.

use std::sync::Arc;

use nk_landscape::{
    compute::{Agent, ExperimentRng, NkLandscape, Simulation},
    schema::{LandscapeConfig, SimulationConfig, StepStrategy, StopReason},
};

#[test]
fn test_agents_end_on_local_peaks() {
    let mut rng = ExperimentRng::new(2024);
    let landscape =
        Arc::new(NkLandscape::new(LandscapeConfig::nk(12, 3), rng.next_seed()).unwrap());
    let config = SimulationConfig {
        num_agents: 50,
        ..Default::default()
    };
    let mut simulation =
        Simulation::from_config(Arc::clone(&landscape), &config, &mut rng).unwrap();

    let report = simulation.run(config.max_iterations);
    assert_eq!(report.stop_reason, StopReason::Converged);

    for peak in &report.peaks {
        let height = landscape.fitness(peak);
        for position in 0..12 {
            let neighbor = peak.with_digit(position, peak.digits()[position] ^ 1);
            assert!(landscape.fitness(&neighbor) < height);
        }
    }
}

#[test]
fn test_more_interactions_give_more_peaks() {
    // K=0 has a single global peak; K=N-1 is maximally rugged.
    let peaks = |k: usize| {
        let mut rng = ExperimentRng::new(11);
        let landscape =
            Arc::new(NkLandscape::new(LandscapeConfig::nk(10, k), rng.next_seed()).unwrap());
        let config = SimulationConfig {
            num_agents: 200,
            ..Default::default()
        };
        let mut simulation = Simulation::from_config(landscape, &config, &mut rng).unwrap();
        simulation.run(config.max_iterations).peaks.len()
    };

    assert_eq!(peaks(0), 1);
    assert!(peaks(9) > 1);
}

#[test]
fn test_plateaus_hit_iteration_cap() {
    // A flat landscape accepts every move, so nobody ever finishes.
    let landscape = NkLandscape::new(LandscapeConfig::nkq(6, 0, 2), 0).unwrap();
    for component in 0..6 {
        landscape.seed_component(component, &[0], 1.0);
        landscape.seed_component(component, &[1], 1.0);
    }
    let landscape = Arc::new(landscape);

    let mut rng = ExperimentRng::new(5);
    let mut simulation = Simulation::new(Arc::clone(&landscape), 4, |l| {
        Agent::new(Arc::clone(l), StepStrategy::Fitter, rng.fork())
    })
    .unwrap();

    let report = simulation.run(100);
    assert_eq!(report.stop_reason, StopReason::IterationCap);
    assert_eq!(report.iterations, 100);
    assert!(report.path_lengths.iter().all(|&moves| moves == 100));
    assert_eq!(report.peak_heights, vec![1.0]);
    assert_eq!(simulation.active_count(), 4);
}
