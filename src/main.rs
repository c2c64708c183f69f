//! NK landscape CLI - Run experiments from JSON configuration.

use std::fs;
use std::path::PathBuf;

use nk_landscape::{
    compute::run_experiment,
    schema::{ExperimentConfig, LandscapeConfig},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [report.json]", args[0]);
        eprintln!();
        eprintln!("Run an NK landscape experiment from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to experiment configuration file");
        eprintln!("  report.json  Where to write the full JSON report (optional)");
        eprintln!();
        eprintln!("An example configuration is printed with the --example flag.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let report_path = args.get(2).map(PathBuf::from);

    let config = ExperimentConfig::from_json_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    println!("NK Landscape Experiment");
    println!("=======================");
    println!(
        "N={} K={} A={} ({:?})",
        config.landscape.n, config.landscape.k, config.landscape.alleles, config.landscape.values
    );
    println!(
        "Agents: {} ({:?})",
        config.simulation.num_agents, config.simulation.strategy
    );
    println!();

    let report = run_experiment(&config).unwrap_or_else(|e| {
        eprintln!("Error running experiment: {}", e);
        std::process::exit(1);
    });

    let stats = &report.simulation.stats;
    println!("Hill climbing:");
    println!(
        "  Iterations: {} ({:?})",
        report.simulation.iterations, report.simulation.stop_reason
    );
    println!("  Distinct peaks: {}", stats.distinct_peaks);
    println!("  Distinct peak heights: {}", report.simulation.peak_heights.len());
    println!("  Mean fitness: {:.6}", stats.mean_fitness);
    println!("  Max fitness: {:.6}", stats.max_fitness);
    println!("  Mean path length: {:.2}", stats.mean_path_length);

    if let Some(neutral) = &report.neutral_networks {
        println!();
        println!("Neutral networks:");
        println!("  Locations: {}", neutral.total_locations);
        println!("  Fitness levels: {}", neutral.fitness_levels);
        println!("  Networks: {}", neutral.component_sizes.len());
        println!("  Mean network size: {:.3}", neutral.mean_component_size);
        println!("  Common fraction: {:.4}", neutral.common_fraction);
    }

    println!();
    println!(
        "Seed: {}  Time: {:.2}s",
        report.random_seed, report.elapsed_seconds
    );

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            eprintln!("Error serializing report: {}", e);
            std::process::exit(1);
        });
        if let Err(e) = fs::write(&path, json) {
            eprintln!("Error writing report: {}", e);
            std::process::exit(1);
        }
        println!("Report written to {}", path.display());
    }
}

fn print_example_config() {
    let config = ExperimentConfig {
        landscape: LandscapeConfig::nkq(12, 2, 2),
        neutral_networks: true,
        random_seed: Some(42),
        ..Default::default()
    };

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
