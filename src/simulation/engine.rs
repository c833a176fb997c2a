//! Monte Carlo engine for withdrawal sustainability.
//!
//! Each path starts from the configured portfolio, draws one normal
//! return per month, takes an inflation-growing withdrawal, and stops at
//! ruin. Paths share nothing, so the parallel entry point produces the
//! same matrix as the sequential one for the same [`RandomSource`].
//!
//! # Algorithm
//!
//! For month `m` of a path:
//!
//! 1. `r = draw(monthly_return, monthly_vol) + shock(m)`
//! 2. `balance = balance * (1 + r) - withdrawal`
//! 3. `withdrawal *= 1 + monthly_inflation`
//! 4. If `balance <= 0`, months `m..` are recorded as zero and the path ends.

use crate::core::config::{MonthlyRates, SimulationConfig};
use crate::core::error::SimulationError;
use crate::core::scenario::Scenario;
use crate::simulation::matrix::PathMatrix;
use crate::simulation::sampler::{RandomSource, ReturnSampler};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-run constants shared read-only by every path.
#[derive(Debug, Clone, Copy)]
struct PathPlan {
    initial_investment: f64,
    monthly_withdrawal: f64,
    rates: MonthlyRates,
    scenario: Scenario,
}

impl PathPlan {
    fn new(config: &SimulationConfig) -> Self {
        Self {
            initial_investment: config.initial_investment,
            monthly_withdrawal: config.monthly_withdrawal,
            rates: config.monthly_rates(),
            scenario: config.scenario,
        }
    }
}

/// Simulate every path in index order.
///
/// # Examples
///
/// ```
/// use retirement_stress::core::config::SimulationConfig;
/// use retirement_stress::simulation::engine::run;
/// use retirement_stress::simulation::sampler::SeededSource;
///
/// let config = SimulationConfig { num_paths: 20, ..Default::default() };
/// let matrix = run(&config, &SeededSource::new(7)).unwrap();
/// assert_eq!(matrix.num_paths(), 20);
/// assert_eq!(matrix.num_months(), 360);
/// ```
pub fn run<S: RandomSource>(
    config: &SimulationConfig,
    source: &S,
) -> Result<PathMatrix, SimulationError> {
    let plan = prepare(config)?;
    let mut matrix = PathMatrix::zeroed(config.num_paths, config.num_months());
    for (path, row) in matrix.rows_mut().enumerate() {
        let mut sampler = source.sampler_for_path(path);
        simulate_path(&plan, &mut sampler, path, row)?;
    }
    Ok(matrix)
}

/// Simulate paths across the rayon thread pool.
pub fn run_parallel<S: RandomSource>(
    config: &SimulationConfig,
    source: &S,
) -> Result<PathMatrix, SimulationError> {
    let plan = prepare(config)?;
    let num_months = config.num_months();
    let mut matrix = PathMatrix::zeroed(config.num_paths, num_months);
    matrix
        .balances_mut()
        .par_chunks_mut(num_months)
        .enumerate()
        .try_for_each(|(path, row)| {
            let mut sampler = source.sampler_for_path(path);
            simulate_path(&plan, &mut sampler, path, row)
        })?;
    Ok(matrix)
}

/// Sequential run that checks `cancel` before each path.
///
/// A raised flag aborts with [`SimulationError::Cancelled`]; no partial
/// matrix is returned.
pub fn run_with_cancel<S: RandomSource>(
    config: &SimulationConfig,
    source: &S,
    cancel: &AtomicBool,
) -> Result<PathMatrix, SimulationError> {
    let plan = prepare(config)?;
    let mut matrix = PathMatrix::zeroed(config.num_paths, config.num_months());
    for (path, row) in matrix.rows_mut().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            log::debug!("run cancelled before path {}", path);
            return Err(SimulationError::Cancelled);
        }
        let mut sampler = source.sampler_for_path(path);
        simulate_path(&plan, &mut sampler, path, row)?;
    }
    Ok(matrix)
}

fn prepare(config: &SimulationConfig) -> Result<PathPlan, SimulationError> {
    config.validate()?;
    let plan = PathPlan::new(config);
    log::debug!(
        "simulating {} paths over {} months, scenario '{}', monthly return {:.6}, vol {:.6}, inflation {:.6}",
        config.num_paths,
        config.num_months(),
        plan.scenario,
        plan.rates.mean_return,
        plan.rates.volatility,
        plan.rates.inflation
    );
    Ok(plan)
}

fn simulate_path<S: ReturnSampler>(
    plan: &PathPlan,
    sampler: &mut S,
    path: usize,
    row: &mut [f64],
) -> Result<(), SimulationError> {
    let rates = &plan.rates;
    let mut balance = plan.initial_investment;
    let mut withdrawal = plan.monthly_withdrawal;

    for month in 0..row.len() {
        let r = sampler.sample(rates.mean_return, rates.volatility)
            + plan.scenario.shock_for_month(month);
        balance = balance * (1.0 + r) - withdrawal;
        // Inflation applies even in the month the portfolio runs out.
        withdrawal *= 1.0 + rates.inflation;

        if !balance.is_finite() {
            log::warn!("path {} produced a non-finite balance at month {}", path, month);
            return Err(SimulationError::NumericOverflow { path, month });
        }
        if balance <= 0.0 {
            log::trace!("path {} depleted at month {}", path, month);
            row[month..].fill(0.0);
            return Ok(());
        }
        row[month] = balance;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::sampler::{MeanSource, SeededSource};
    use approx::assert_relative_eq;

    /// Replays a fixed list of returns, then repeats the last one.
    struct ScriptedSampler {
        returns: Vec<f64>,
        next: usize,
    }

    impl ReturnSampler for ScriptedSampler {
        fn sample(&mut self, _mean: f64, _std_dev: f64) -> f64 {
            let r = self.returns[self.next.min(self.returns.len() - 1)];
            self.next += 1;
            r
        }
    }

    struct ScriptedSource(Vec<f64>);

    impl RandomSource for ScriptedSource {
        type Sampler = ScriptedSampler;

        fn sampler_for_path(&self, _path: usize) -> Self::Sampler {
            ScriptedSampler {
                returns: self.0.clone(),
                next: 0,
            }
        }
    }

    fn deterministic_config() -> SimulationConfig {
        SimulationConfig {
            initial_investment: 1_000_000.0,
            monthly_withdrawal: 4_000.0,
            years: 30,
            annual_return: 0.07,
            annual_volatility: 0.0,
            annual_inflation: 0.0,
            scenario: Scenario::None,
            num_paths: 1,
        }
    }

    #[test]
    fn test_first_month_matches_hand_calculation() {
        let matrix = run(&deterministic_config(), &MeanSource).unwrap();
        let expected = 1_000_000.0 * 1.07f64.powf(1.0 / 12.0) - 4_000.0;
        assert_relative_eq!(matrix.path(0)[0], expected, max_relative = 1e-12);
        assert_relative_eq!(matrix.path(0)[0], 1_001_654.15, epsilon = 0.01);
    }

    #[test]
    fn test_inflation_grows_withdrawal_each_month() {
        let config = SimulationConfig {
            annual_return: 0.0,
            annual_inflation: 0.12,
            years: 1,
            ..deterministic_config()
        };
        let matrix = run(&config, &MeanSource).unwrap();
        let infl = 1.12f64.powf(1.0 / 12.0);
        let row = matrix.path(0);
        assert_relative_eq!(row[0], 1_000_000.0 - 4_000.0, max_relative = 1e-12);
        assert_relative_eq!(row[1], row[0] - 4_000.0 * infl, max_relative = 1e-12);
        assert_relative_eq!(row[2], row[1] - 4_000.0 * infl * infl, max_relative = 1e-12);
    }

    #[test]
    fn test_shock_applies_to_month_zero() {
        let config = SimulationConfig {
            scenario: Scenario::GreatDepression1929,
            ..deterministic_config()
        };
        let matrix = run(&config, &MeanSource).unwrap();
        let r = 1.07f64.powf(1.0 / 12.0) - 1.0 - 0.89 / 33.0;
        assert_relative_eq!(
            matrix.path(0)[0],
            1_000_000.0 * (1.0 + r) - 4_000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_shock_ends_after_window() {
        let config = SimulationConfig {
            scenario: Scenario::Custom { drop: -0.10, duration: 2 },
            annual_return: 0.0,
            years: 1,
            ..deterministic_config()
        };
        let matrix = run(&config, &MeanSource).unwrap();
        let row = matrix.path(0);
        let m0 = 1_000_000.0 * 0.95 - 4_000.0;
        let m1 = m0 * 0.95 - 4_000.0;
        let m2 = m1 - 4_000.0;
        assert_relative_eq!(row[0], m0, max_relative = 1e-12);
        assert_relative_eq!(row[1], m1, max_relative = 1e-12);
        assert_relative_eq!(row[2], m2, max_relative = 1e-12);
    }

    #[test]
    fn test_ruin_is_absorbing() {
        // A -60% month wipes the path out in month 1 despite gains afterwards.
        let source = ScriptedSource(vec![0.0, -0.6, 0.5]);
        let config = SimulationConfig {
            initial_investment: 10_000.0,
            monthly_withdrawal: 4_000.0,
            years: 1,
            ..deterministic_config()
        };
        let matrix = run(&config, &source).unwrap();
        let row = matrix.path(0);
        assert_relative_eq!(row[0], 6_000.0);
        assert!(row[1..].iter().all(|&b| b == 0.0));
        assert_eq!(matrix.depletion_month(0), Some(1));
    }

    #[test]
    fn test_exactly_zero_balance_counts_as_ruin() {
        let source = ScriptedSource(vec![0.0]);
        let config = SimulationConfig {
            initial_investment: 8_000.0,
            monthly_withdrawal: 4_000.0,
            years: 1,
            ..deterministic_config()
        };
        let matrix = run(&config, &source).unwrap();
        assert_eq!(matrix.path(0)[0], 4_000.0);
        assert_eq!(matrix.depletion_month(0), Some(1));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = SimulationConfig {
            years: 0,
            ..deterministic_config()
        };
        assert!(matches!(
            run(&config, &MeanSource),
            Err(SimulationError::InvalidConfiguration { .. })
        ));
        assert!(run_parallel(&config, &MeanSource).is_err());
    }

    #[test]
    fn test_unallocatable_path_count_is_rejected() {
        let config = SimulationConfig {
            num_paths: usize::MAX / 2,
            years: 1,
            ..deterministic_config()
        };
        let cancel = AtomicBool::new(false);
        for result in [
            run(&config, &MeanSource),
            run_parallel(&config, &MeanSource),
            run_with_cancel(&config, &MeanSource, &cancel),
        ] {
            assert!(matches!(
                result,
                Err(SimulationError::InvalidConfiguration { field: "num_paths", .. })
            ));
        }
    }

    #[test]
    fn test_total_loss_return_ruins_month_zero() {
        let config = SimulationConfig {
            annual_return: -1.0,
            num_paths: 3,
            ..deterministic_config()
        };
        let matrix = run(&config, &MeanSource).unwrap();
        for path in 0..3 {
            assert_eq!(matrix.depletion_month(path), Some(0));
        }
    }

    #[test]
    fn test_non_finite_return_is_overflow() {
        let source = ScriptedSource(vec![0.01, f64::INFINITY]);
        let result = run(&deterministic_config(), &source);
        assert_eq!(
            result,
            Err(SimulationError::NumericOverflow { path: 0, month: 1 })
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = SimulationConfig {
            num_paths: 64,
            years: 20,
            scenario: Scenario::DotCom2000,
            ..Default::default()
        };
        let source = SeededSource::new(31337);
        let sequential = run(&config, &source).unwrap();
        let parallel = run_parallel(&config, &source).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_cancel_flag_aborts() {
        let cancel = AtomicBool::new(true);
        let result = run_with_cancel(&SimulationConfig::default(), &SeededSource::new(1), &cancel);
        assert_eq!(result, Err(SimulationError::Cancelled));
    }

    #[test]
    fn test_cancel_flag_lowered_runs_to_completion() {
        let cancel = AtomicBool::new(false);
        let config = SimulationConfig {
            num_paths: 10,
            ..Default::default()
        };
        let source = SeededSource::new(5);
        let matrix = run_with_cancel(&config, &source, &cancel).unwrap();
        assert_eq!(matrix, run(&config, &source).unwrap());
    }
}
