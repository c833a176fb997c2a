use crate::core::error::SimulationError;
use crate::core::scenario::Scenario;
use serde::{Deserialize, Serialize};

/// Immutable input to one simulation run.
///
/// Rates are annual fractions (`0.07` is 7%). The engine converts them
/// to monthly figures with compounding; see [`MonthlyRates`].
///
/// # Examples
///
/// ```
/// use retirement_stress::core::config::SimulationConfig;
/// use retirement_stress::core::scenario::Scenario;
///
/// let config = SimulationConfig {
///     scenario: Scenario::FinancialCrisis2008,
///     num_paths: 100,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.num_months(), 360);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Starting portfolio value.
    pub initial_investment: f64,
    /// Nominal withdrawal taken in month 0.
    pub monthly_withdrawal: f64,
    /// Retirement horizon in years.
    pub years: u32,
    pub annual_return: f64,
    pub annual_volatility: f64,
    pub annual_inflation: f64,
    /// Crash overlaid on the start of the horizon.
    pub scenario: Scenario,
    /// Number of independent paths to simulate.
    pub num_paths: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_investment: 1_000_000.0,
            monthly_withdrawal: 4_000.0,
            years: 30,
            annual_return: 0.07,
            annual_volatility: 0.12,
            annual_inflation: 0.03,
            scenario: Scenario::None,
            num_paths: 500,
        }
    }
}

impl SimulationConfig {
    /// Length of each path in months.
    pub fn num_months(&self) -> usize {
        self.years as usize * 12
    }

    /// Reject configurations the engine cannot simulate.
    ///
    /// Nothing is clamped: the first offending field is reported.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.initial_investment.is_finite() || self.initial_investment <= 0.0 {
            return Err(SimulationError::invalid(
                "initial_investment",
                format!("must be positive and finite, got {}", self.initial_investment),
            ));
        }
        if !self.monthly_withdrawal.is_finite() || self.monthly_withdrawal <= 0.0 {
            return Err(SimulationError::invalid(
                "monthly_withdrawal",
                format!("must be positive and finite, got {}", self.monthly_withdrawal),
            ));
        }
        if self.years < 1 {
            return Err(SimulationError::invalid(
                "years",
                format!("must be at least 1, got {}", self.years),
            ));
        }
        if self.num_paths < 1 {
            return Err(SimulationError::invalid(
                "num_paths",
                format!("must be at least 1, got {}", self.num_paths),
            ));
        }
        if self.matrix_bytes().is_none() {
            return Err(SimulationError::invalid(
                "num_paths",
                format!(
                    "{} paths over {} months do not fit in memory",
                    self.num_paths,
                    self.num_months()
                ),
            ));
        }
        if !self.annual_return.is_finite() || self.annual_return < -1.0 {
            return Err(SimulationError::invalid(
                "annual_return",
                format!("must be finite and at least -100%, got {}", self.annual_return),
            ));
        }
        if !self.annual_volatility.is_finite() || self.annual_volatility < 0.0 {
            return Err(SimulationError::invalid(
                "annual_volatility",
                format!("must be non-negative and finite, got {}", self.annual_volatility),
            ));
        }
        if !self.annual_inflation.is_finite() || self.annual_inflation < -1.0 {
            return Err(SimulationError::invalid(
                "annual_inflation",
                format!("must be finite and at least -100%, got {}", self.annual_inflation),
            ));
        }
        self.scenario.validate()
    }

    /// Size of the balance matrix in bytes, or `None` when it cannot be
    /// allocated as a single `Vec<f64>`.
    fn matrix_bytes(&self) -> Option<usize> {
        self.num_paths
            .checked_mul(self.num_months())?
            .checked_mul(std::mem::size_of::<f64>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
    }

    /// Monthly equivalents of the annual assumptions.
    pub fn monthly_rates(&self) -> MonthlyRates {
        MonthlyRates::from_annual(
            self.annual_return,
            self.annual_volatility,
            self.annual_inflation,
        )
    }
}

/// Annual assumptions converted to a monthly step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRates {
    pub mean_return: f64,
    pub volatility: f64,
    pub inflation: f64,
}

impl MonthlyRates {
    /// Return and inflation compound geometrically; volatility scales
    /// with the square root of time.
    pub fn from_annual(annual_return: f64, annual_volatility: f64, annual_inflation: f64) -> Self {
        Self {
            mean_return: (1.0 + annual_return).powf(1.0 / 12.0) - 1.0,
            volatility: annual_volatility / 12f64.sqrt(),
            inflation: (1.0 + annual_inflation).powf(1.0 / 12.0) - 1.0,
        }
    }
}

/// Percent-based inputs as collected by the input controls.
///
/// The controls bound the horizon to 10–50 years and every rate to
/// 0–100%. [`FormInputs::into_config`] enforces those bounds and turns
/// percentages into fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInputs {
    pub portfolio_value: f64,
    pub monthly_withdrawal: f64,
    pub years: u32,
    pub expected_return_pct: f64,
    pub volatility_pct: f64,
    pub inflation_pct: f64,
    pub scenario: Scenario,
    pub simulations: usize,
}

pub const MIN_FORM_YEARS: u32 = 10;
pub const MAX_FORM_YEARS: u32 = 50;

impl Default for FormInputs {
    fn default() -> Self {
        Self {
            portfolio_value: 1_000_000.0,
            monthly_withdrawal: 4_000.0,
            years: 30,
            expected_return_pct: 7.0,
            volatility_pct: 12.0,
            inflation_pct: 3.0,
            scenario: Scenario::None,
            simulations: 500,
        }
    }
}

impl FormInputs {
    pub fn into_config(self) -> Result<SimulationConfig, SimulationError> {
        if !(MIN_FORM_YEARS..=MAX_FORM_YEARS).contains(&self.years) {
            return Err(SimulationError::invalid(
                "years",
                format!(
                    "must be between {MIN_FORM_YEARS} and {MAX_FORM_YEARS}, got {}",
                    self.years
                ),
            ));
        }
        let expected_return_pct = percent("annual_return", self.expected_return_pct)?;
        let volatility_pct = percent("annual_volatility", self.volatility_pct)?;
        let inflation_pct = percent("annual_inflation", self.inflation_pct)?;

        let config = SimulationConfig {
            initial_investment: self.portfolio_value,
            monthly_withdrawal: self.monthly_withdrawal,
            years: self.years,
            annual_return: expected_return_pct / 100.0,
            annual_volatility: volatility_pct / 100.0,
            annual_inflation: inflation_pct / 100.0,
            scenario: self.scenario,
            num_paths: self.simulations,
        };
        config.validate()?;
        Ok(config)
    }
}

fn percent(field: &'static str, value: f64) -> Result<f64, SimulationError> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(SimulationError::invalid(
            field,
            format!("must be a percentage between 0 and 100, got {value}"),
        ))
    }
}
