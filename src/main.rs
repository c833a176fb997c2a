//! retirement-stress CLI
//!
//! Run withdrawal stress tests from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Simulate with the default plan (form inputs in percent)
//! retirement-stress simulate --withdrawal 4500 --scenario "2008 Financial Crisis"
//!
//! # Load a full configuration and write the PDF report
//! retirement-stress simulate --config plan.json --seed 42 --report .
//!
//! # List the built-in crash scenarios
//! retirement-stress scenarios
//! ```

use retirement_stress::core::config::{FormInputs, SimulationConfig};
use retirement_stress::core::error::SimulationError;
use retirement_stress::core::scenario::Scenario;
use retirement_stress::report::chart::{ChartData, DEFAULT_CHART_PATHS};
use retirement_stress::report::document::{StressTestReport, REPORT_FILENAME, REPORT_MIME_TYPE};
use retirement_stress::simulation::engine;
use retirement_stress::simulation::matrix::PathMatrix;
use retirement_stress::simulation::sampler::{EntropySource, RandomSource, SeededSource};
use retirement_stress::simulation::summary::{summarize, SummaryStats};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

fn print_usage() {
    eprintln!(
        r#"retirement-stress — Monte Carlo withdrawal stress tester

USAGE:
    retirement-stress <COMMAND> [OPTIONS]

COMMANDS:
    simulate    Simulate a withdrawal plan and summarize the outcome
    scenarios   List the built-in crash scenarios
    help        Show this message

INPUT OPTIONS (simulate):
    --config <FILE>         JSON simulation config (rates as fractions)
    --initial <AMOUNT>      Current portfolio value (default: 1000000)
    --withdrawal <AMOUNT>   Monthly withdrawal (default: 4000)
    --years <N>             Years in retirement, 10-50 (default: 30)
    --return <PCT>          Expected annual return in percent (default: 7)
    --volatility <PCT>      Annual volatility in percent (default: 12)
    --inflation <PCT>       Expected inflation in percent (default: 3)
    --scenario <NAME>       Historical shock to apply (default: None)
    --paths <N>             Number of simulated paths (default: 500)

RUN OPTIONS (simulate):
    --seed <N>              Seed for reproducible runs
    --sequential            Simulate on one thread
    --format <FORMAT>       Output format: text (default) or json
    --chart <FILE>          Write chart data (JSON) to FILE
    --chart-paths <N>       Paths included in the chart (default: 100)
    --report <PATH>         Write the PDF report to PATH (file or directory)

EXAMPLES:
    retirement-stress simulate --withdrawal 5000 --years 35
    retirement-stress simulate --scenario "1929 Great Depression" --seed 7
    retirement-stress simulate --config plan.json --format json --report .
    retirement-stress scenarios"#
    );
}

/// JSON output schema for a simulation run.
#[derive(serde::Serialize)]
struct RunOutput<'a> {
    config: &'a SimulationConfig,
    seed: u64,
    summary: &'a SummaryStats,
    headline: String,
}

struct SimulateArgs {
    config_path: Option<String>,
    form: FormInputs,
    form_flags: Vec<String>,
    seed: Option<u64>,
    sequential: bool,
    format: String,
    chart_path: Option<String>,
    chart_paths: usize,
    report_path: Option<String>,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    process::exit(1);
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    args.get(i)
        .map(String::as_str)
        .unwrap_or_else(|| fail(format!("{} requires a value", flag)))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let raw = value(args, i, flag);
    raw.parse()
        .unwrap_or_else(|_| fail(format!("{} requires a number, got '{}'", flag, raw)))
}

fn parse_simulate_args(args: &[String]) -> SimulateArgs {
    let mut parsed = SimulateArgs {
        config_path: None,
        form: FormInputs::default(),
        form_flags: Vec::new(),
        seed: None,
        sequential: false,
        format: "text".to_string(),
        chart_path: None,
        chart_paths: DEFAULT_CHART_PATHS,
        report_path: None,
    };

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" => {
                i += 1;
                parsed.config_path = Some(value(args, i, flag).to_string());
            }
            "--initial" | "--withdrawal" | "--years" | "--return" | "--volatility"
            | "--inflation" | "--scenario" | "--paths" => {
                i += 1;
                let form = &mut parsed.form;
                match flag {
                    "--initial" => form.portfolio_value = number(args, i, flag),
                    "--withdrawal" => form.monthly_withdrawal = number(args, i, flag),
                    "--years" => form.years = number(args, i, flag),
                    "--return" => form.expected_return_pct = number(args, i, flag),
                    "--volatility" => form.volatility_pct = number(args, i, flag),
                    "--inflation" => form.inflation_pct = number(args, i, flag),
                    "--scenario" => {
                        form.scenario = value(args, i, flag).parse().unwrap_or_else(|e| fail(e))
                    }
                    _ => form.simulations = number(args, i, flag),
                }
                parsed.form_flags.push(flag.to_string());
            }
            "--seed" => {
                i += 1;
                parsed.seed = Some(number(args, i, flag));
            }
            "--sequential" => parsed.sequential = true,
            "--format" => {
                i += 1;
                parsed.format = value(args, i, flag).to_string();
                if parsed.format != "text" && parsed.format != "json" {
                    fail("--format requires 'text' or 'json'");
                }
            }
            "--chart" => {
                i += 1;
                parsed.chart_path = Some(value(args, i, flag).to_string());
            }
            "--chart-paths" => {
                i += 1;
                parsed.chart_paths = number(args, i, flag);
            }
            "--report" => {
                i += 1;
                parsed.report_path = Some(value(args, i, flag).to_string());
            }
            _ => fail(format!("Unknown option: {}", flag)),
        }
        i += 1;
    }
    parsed
}

fn load_config(path: &str) -> SimulationConfig {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path, e)));
    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format (any field may be omitted):");
        eprintln!(
            r#"{{
  "initial_investment": 1000000.0,
  "monthly_withdrawal": 4000.0,
  "years": 30,
  "annual_return": 0.07,
  "annual_volatility": 0.12,
  "annual_inflation": 0.03,
  "scenario": "2008 Financial Crisis",
  "num_paths": 500
}}"#
        );
        process::exit(1);
    })
}

fn simulate<S: RandomSource>(
    config: &SimulationConfig,
    source: &S,
    sequential: bool,
) -> Result<PathMatrix, SimulationError> {
    if sequential {
        engine::run(config, source)
    } else {
        engine::run_parallel(config, source)
    }
}

fn report_destination(path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_dir() {
        path.join(REPORT_FILENAME)
    } else {
        path.to_path_buf()
    }
}

fn cmd_simulate(args: &[String]) {
    let args = parse_simulate_args(args);

    let config = match &args.config_path {
        Some(path) => {
            if !args.form_flags.is_empty() {
                fail(format!(
                    "{} cannot be combined with --config",
                    args.form_flags.join(", ")
                ));
            }
            load_config(path)
        }
        None => args.form.clone().into_config().unwrap_or_else(|e| fail(e)),
    };

    let (seed, result) = match args.seed {
        Some(seed) => (seed, simulate(&config, &SeededSource::new(seed), args.sequential)),
        None => {
            let source = EntropySource::new();
            (source.seed(), simulate(&config, &source, args.sequential))
        }
    };
    log::info!("simulated {} paths with seed {}", config.num_paths, seed);
    let matrix = result.unwrap_or_else(|e| fail(e));

    let summary = summarize(&matrix);
    let report = StressTestReport::new(&summary, &config);

    if args.format == "json" {
        let output = RunOutput {
            config: &config,
            seed,
            summary: &summary,
            headline: report.headline(),
        };
        let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e));
        println!("{}", json);
    } else {
        println!("{}", report.headline());
        println!();
        println!("{}", summary);
        println!("Seed: {}", seed);
    }

    if let Some(path) = &args.chart_path {
        let chart = ChartData::from_matrix(&matrix, args.chart_paths);
        let json = serde_json::to_string(&chart).unwrap_or_else(|e| fail(e));
        fs::write(path, json)
            .unwrap_or_else(|e| fail(format!("writing chart to '{}': {}", path, e)));
        eprintln!("Wrote {} of {} paths → {}", chart.series.len(), chart.total_paths, path);
    }

    if let Some(path) = &args.report_path {
        let dest = report_destination(path);
        let pdf = report.to_pdf().unwrap_or_else(|e| fail(e));
        fs::write(&dest, pdf)
            .unwrap_or_else(|e| fail(format!("writing report to '{}': {}", dest.display(), e)));
        eprintln!("Wrote report ({}) → {}", REPORT_MIME_TYPE, dest.display());
    }
}

fn cmd_scenarios() {
    println!("{:<24} {:>8} {:>10}", "Scenario", "Drop", "Months");
    for scenario in Scenario::ALL {
        println!(
            "{:<24} {:>7.0}% {:>10}",
            scenario.name(),
            scenario.drop() * 100.0,
            scenario.duration()
        );
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "simulate" => cmd_simulate(rest),
        "scenarios" => cmd_scenarios(),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
