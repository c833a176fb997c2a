use crate::simulation::matrix::PathMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Headline statistics over the final month of every path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Percentage of paths ending with a strictly positive balance.
    pub success_rate: f64,
    /// Median final balance, depleted paths included as zero.
    pub median_ending_balance: f64,
    pub p10_ending_balance: f64,
    pub p90_ending_balance: f64,
    pub num_paths: usize,
    pub depleted_paths: usize,
}

/// Reduce a path matrix to its summary statistics.
pub fn summarize(matrix: &PathMatrix) -> SummaryStats {
    SummaryStats::from_final_balances(&matrix.final_balances())
}

impl SummaryStats {
    /// Summary over a column of final balances.
    ///
    /// An empty column yields an all-zero summary.
    pub fn from_final_balances(finals: &[f64]) -> Self {
        if finals.is_empty() {
            return Self {
                success_rate: 0.0,
                median_ending_balance: 0.0,
                p10_ending_balance: 0.0,
                p90_ending_balance: 0.0,
                num_paths: 0,
                depleted_paths: 0,
            };
        }

        let survivors = finals.iter().filter(|&&b| b > 0.0).count();
        let mut sorted = finals.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            success_rate: survivors as f64 * 100.0 / finals.len() as f64,
            median_ending_balance: median_of_sorted(&sorted),
            p10_ending_balance: percentile_of_sorted(&sorted, 0.10),
            p90_ending_balance: percentile_of_sorted(&sorted, 0.90),
            num_paths: finals.len(),
            depleted_paths: finals.len() - survivors,
        }
    }
}

/// Median with the usual even-count rule (mean of the two middle values).
///
/// Returns `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(median_of_sorted(&sorted))
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

// Linear interpolation between closest ranks.
fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Summary ===")?;
        writeln!(f, "Paths:                 {}", self.num_paths)?;
        writeln!(f, "Success Rate:          {:.1}%", self.success_rate)?;
        writeln!(f, "Depleted Paths:        {}", self.depleted_paths)?;
        writeln!(f, "Median Ending Balance: {:.2}", self.median_ending_balance)?;
        writeln!(f, "10th Percentile:       {:.2}", self.p10_ending_balance)?;
        writeln!(f, "90th Percentile:       {:.2}", self.p90_ending_balance)?;
        Ok(())
    }
}
