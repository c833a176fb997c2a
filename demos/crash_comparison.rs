//! Compare the built-in crash scenarios on one plan.
//!
//! Every scenario reuses the same seed, so each path sees the same
//! market draws and differences come from the shock alone.

use retirement_stress::core::config::SimulationConfig;
use retirement_stress::core::scenario::Scenario;
use retirement_stress::report::document::format_currency;
use retirement_stress::simulation::engine::run_parallel;
use retirement_stress::simulation::sampler::SeededSource;
use retirement_stress::simulation::summary::summarize;

fn main() {
    println!("━━━ Crash Scenarios: $1,000,000 portfolio, $4,000/month, 30 years ━━━\n");
    println!(
        "  {:<24} {:>9} {:>18} {:>10}",
        "Scenario", "Success", "Median End", "Depleted"
    );

    let source = SeededSource::new(1929);
    for scenario in Scenario::ALL {
        let config = SimulationConfig {
            scenario,
            num_paths: 1_000,
            ..Default::default()
        };
        let matrix = run_parallel(&config, &source).expect("built-in scenarios are valid");
        let stats = summarize(&matrix);
        println!(
            "  {:<24} {:>8.1}% {:>18} {:>10}",
            scenario.name(),
            stats.success_rate,
            format_currency(stats.median_ending_balance),
            stats.depleted_paths
        );
    }
}
