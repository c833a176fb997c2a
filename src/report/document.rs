use crate::core::config::SimulationConfig;
use crate::core::scenario::Scenario;
use crate::report::pdf::{Align, Font, PdfPage, ReportError};
use crate::simulation::summary::SummaryStats;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Download name for the rendered report.
pub const REPORT_FILENAME: &str = "Retirement_Stress_Test.pdf";
pub const REPORT_MIME_TYPE: &str = "application/pdf";

pub const REPORT_TITLE: &str = "Retirement SWP Simulation Report";

pub const DISCLAIMER: &str = "Disclaimer: This simulation uses a normal distribution of returns. \
     Historical stress tests simulate early-retirement shocks. \
     Past performance is not indicative of future results.";

/// The fixed-layout stress-test report.
///
/// # Examples
///
/// ```
/// use retirement_stress::core::config::SimulationConfig;
/// use retirement_stress::report::document::StressTestReport;
/// use retirement_stress::simulation::summary::SummaryStats;
///
/// let stats = SummaryStats::from_final_balances(&[0.0, 250_000.0, 1_500_000.0]);
/// let report = StressTestReport::new(&stats, &SimulationConfig::default());
/// assert_eq!(report.lines()[2], "Success Probability: 66.7%");
/// assert_eq!(report.lines()[3], "Median Ending Balance: $250,000.00");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestReport {
    pub scenario: Scenario,
    pub success_rate: f64,
    pub median_ending_balance: f64,
    pub years: u32,
    pub monthly_withdrawal: f64,
    pub generated_at: DateTime<Utc>,
}

impl StressTestReport {
    pub fn new(stats: &SummaryStats, config: &SimulationConfig) -> Self {
        Self {
            scenario: config.scenario,
            success_rate: stats.success_rate,
            median_ending_balance: stats.median_ending_balance,
            years: config.years,
            monthly_withdrawal: config.monthly_withdrawal,
            generated_at: Utc::now(),
        }
    }

    /// Report body in print order: title, five figures, disclaimer.
    pub fn lines(&self) -> Vec<String> {
        vec![
            REPORT_TITLE.to_string(),
            format!("Stress Test Scenario: {}", self.scenario),
            format!("Success Probability: {:.1}%", self.success_rate),
            format!(
                "Median Ending Balance: {}",
                format_currency(self.median_ending_balance)
            ),
            format!("Retirement Duration: {} years", self.years),
            format!(
                "Initial Monthly Withdrawal: {}",
                format_currency(self.monthly_withdrawal)
            ),
            DISCLAIMER.to_string(),
        ]
    }

    /// Dashboard headline: success rate, whole-dollar median, active scenario.
    pub fn headline(&self) -> String {
        format!(
            "Success Rate: {:.1}% | Median Ending Balance: {} | Stress Test Active: {}",
            self.success_rate,
            format_money(self.median_ending_balance, 0),
            self.scenario
        )
    }

    /// The printed page: centred bold title, five figures, italic disclaimer.
    pub fn layout(&self) -> PdfPage {
        let lines = self.lines();
        let mut page = PdfPage::new();

        page.line(Font::Bold, 16.0, 10.0, Align::Center, &lines[0]);
        page.gap(10.0);
        for figure in &lines[1..6] {
            page.line(Font::Regular, 12.0, 10.0, Align::Left, figure);
        }
        page.gap(20.0);
        page.paragraph(Font::Italic, 10.0, 10.0, &lines[6]);
        page
    }

    /// Render the report as PDF bytes, ready to save as [`REPORT_FILENAME`].
    pub fn to_pdf(&self) -> Result<Vec<u8>, ReportError> {
        self.layout().finish(REPORT_TITLE)
    }
}

impl fmt::Display for StressTestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Dollars with thousands separators and cents: `$1,234.56`.
pub fn format_currency(value: f64) -> String {
    format_money(value, 2)
}

/// Dollars rounded half away from zero to `dp` decimal places.
///
/// Non-finite values render as `$NaN` / `$inf` rather than a number.
pub fn format_money(value: f64, dp: u32) -> String {
    let Some(amount) = Decimal::from_f64_retain(value) else {
        return format!("${value}");
    };
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.*}", dp as usize, rounded.abs());
    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}
