use criterion::{black_box, criterion_group, criterion_main, Criterion};
use retirement_stress::core::config::SimulationConfig;
use retirement_stress::core::scenario::Scenario;
use retirement_stress::simulation::engine::{run, run_parallel};
use retirement_stress::simulation::sampler::SeededSource;
use retirement_stress::simulation::summary::summarize;

fn config(num_paths: usize) -> SimulationConfig {
    SimulationConfig {
        num_paths,
        scenario: Scenario::FinancialCrisis2008,
        ..Default::default()
    }
}

fn bench_sequential_500_paths(c: &mut Criterion) {
    let config = config(500);
    let source = SeededSource::new(42);

    c.bench_function("sequential_500_paths_30y", |b| {
        b.iter(|| run(black_box(&config), &source))
    });
}

fn bench_parallel_500_paths(c: &mut Criterion) {
    let config = config(500);
    let source = SeededSource::new(42);

    c.bench_function("parallel_500_paths_30y", |b| {
        b.iter(|| run_parallel(black_box(&config), &source))
    });
}

fn bench_parallel_10000_paths(c: &mut Criterion) {
    let config = config(10_000);
    let source = SeededSource::new(42);

    c.bench_function("parallel_10000_paths_30y", |b| {
        b.iter(|| run_parallel(black_box(&config), &source))
    });
}

fn bench_summarize_10000_paths(c: &mut Criterion) {
    let matrix = run_parallel(&config(10_000), &SeededSource::new(42)).unwrap();

    c.bench_function("summarize_10000_paths", |b| {
        b.iter(|| summarize(black_box(&matrix)))
    });
}

criterion_group!(
    benches,
    bench_sequential_500_paths,
    bench_parallel_500_paths,
    bench_parallel_10000_paths,
    bench_summarize_10000_paths
);
criterion_main!(benches);
