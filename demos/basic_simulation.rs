//! Basic withdrawal stress test.
//!
//! Runs the default plan, prints the headline figures, and shows the
//! deterministic expected path next to the Monte Carlo median.

use retirement_stress::core::config::SimulationConfig;
use retirement_stress::report::document::{format_currency, StressTestReport};
use retirement_stress::simulation::engine::{run, run_parallel};
use retirement_stress::simulation::sampler::{MeanSource, SeededSource};
use retirement_stress::simulation::summary::summarize;

fn main() {
    println!("╔═══════════════════════════════════════════════╗");
    println!("║  retirement-stress: Basic Simulation Example  ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let config = SimulationConfig::default();

    // --- Expected path: every month earns exactly the mean return ---
    println!("━━━ Expected Path (no volatility) ━━━\n");

    let expected = run(&config, &MeanSource).expect("default config is valid");
    for year in [1, 5, 10, 20, 30] {
        let month = year * 12 - 1;
        println!(
            "  Year {:>2}: {:>18}",
            year,
            format_currency(expected.path(0)[month])
        );
    }
    println!();

    // --- Monte Carlo ---
    println!("━━━ Monte Carlo ({} paths) ━━━\n", config.num_paths);

    let matrix = run_parallel(&config, &SeededSource::new(42)).expect("default config is valid");
    let stats = summarize(&matrix);
    println!("{}", stats);

    let report = StressTestReport::new(&stats, &config);
    println!("{}", report.headline());
}
