//! # retirement-stress
//!
//! Monte Carlo stress tester for a systematic withdrawal plan.
//!
//! Given a starting portfolio, an inflation-adjusted monthly withdrawal
//! and normally distributed market returns, optionally hit by a
//! historical crash at the start of retirement, this engine simulates
//! many independent paths and reports how often the money lasts.
//!
//! ## Architecture
//!
//! - **core** — Configuration, scenario table, error taxonomy
//! - **simulation** — Random sources, path engine, path matrix, summary statistics
//! - **report** — Chart feed and the PDF stress-test report

pub mod core;
pub mod report;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::config::{FormInputs, SimulationConfig};
    pub use crate::core::error::SimulationError;
    pub use crate::core::scenario::Scenario;
    pub use crate::report::chart::ChartData;
    pub use crate::report::document::StressTestReport;
    pub use crate::simulation::engine::{run, run_parallel, run_with_cancel};
    pub use crate::simulation::matrix::PathMatrix;
    pub use crate::simulation::sampler::{RandomSource, ReturnSampler, SeededSource};
    pub use crate::simulation::summary::{summarize, SummaryStats};
}
