use crate::simulation::matrix::PathMatrix;
use serde::{Deserialize, Serialize};

/// Number of paths the plotting layer draws by default.
pub const DEFAULT_CHART_PATHS: usize = 100;

/// Line-chart feed: one x-axis in years shared by a capped set of paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub x_years: Vec<f64>,
    pub series: Vec<Vec<f64>>,
    /// Paths in the full run, of which `series` is a prefix.
    pub total_paths: usize,
}

impl ChartData {
    /// Take the first `max_paths` paths of `matrix`.
    pub fn from_matrix(matrix: &PathMatrix, max_paths: usize) -> Self {
        Self {
            x_years: matrix.month_axis_years(),
            series: matrix.rows().take(max_paths).map(<[f64]>::to_vec).collect(),
            total_paths: matrix.num_paths(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_series() {
        let rows = (0..5).map(|p| vec![p as f64; 24]).collect();
        let matrix = PathMatrix::from_rows(rows).unwrap();
        let chart = ChartData::from_matrix(&matrix, 3);
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.total_paths, 5);
        assert_eq!(chart.series[2][0], 2.0);
        assert_eq!(chart.x_years.len(), 24);
        assert_eq!(chart.x_years[23], 23.0 / 12.0);
    }

    #[test]
    fn test_small_run_keeps_every_path() {
        let matrix = PathMatrix::from_rows(vec![vec![1.0; 12], vec![2.0; 12]]).unwrap();
        let chart = ChartData::from_matrix(&matrix, DEFAULT_CHART_PATHS);
        assert_eq!(chart.series.len(), 2);
    }
}
