use serde::Serialize;

/// Per-path, per-month portfolio balances.
///
/// Stored row-major: row `p` holds path `p`'s balance at the end of each
/// month. A depleted path reads exactly `0.0` from its depletion month
/// to the end of the horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathMatrix {
    num_paths: usize,
    num_months: usize,
    balances: Vec<f64>,
}

impl PathMatrix {
    pub(crate) fn zeroed(num_paths: usize, num_months: usize) -> Self {
        Self {
            num_paths,
            num_months,
            balances: vec![0.0; num_paths * num_months],
        }
    }

    /// Build a matrix from explicit rows; every row must be the same length.
    ///
    /// Returns `None` for ragged or empty input, and for any row a simulation
    /// could not have produced: a negative or non-finite balance, or a
    /// non-zero balance after the path has hit zero.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let num_months = rows.first()?.len();
        if num_months == 0 || rows.iter().any(|r| r.len() != num_months) {
            return None;
        }
        if !rows.iter().all(|r| is_absorbed_path(r)) {
            return None;
        }
        let num_paths = rows.len();
        Some(Self {
            num_paths,
            num_months,
            balances: rows.into_iter().flatten().collect(),
        })
    }

    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f64> {
        self.balances.chunks_exact_mut(self.num_months)
    }

    pub(crate) fn balances_mut(&mut self) -> &mut [f64] {
        &mut self.balances
    }

    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    pub fn num_months(&self) -> usize {
        self.num_months
    }

    /// All monthly balances of one path.
    ///
    /// # Panics
    ///
    /// Panics if `path` is out of range.
    pub fn path(&self, path: usize) -> &[f64] {
        let start = path * self.num_months;
        &self.balances[start..start + self.num_months]
    }

    pub fn get(&self, path: usize, month: usize) -> Option<f64> {
        if path < self.num_paths && month < self.num_months {
            Some(self.balances[path * self.num_months + month])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.balances.chunks_exact(self.num_months)
    }

    /// The last column: each path's balance at the end of the horizon.
    pub fn final_balances(&self) -> Vec<f64> {
        self.rows().map(|row| row[row.len() - 1]).collect()
    }

    /// First month recorded as zero, if the path was ruined.
    pub fn depletion_month(&self, path: usize) -> Option<usize> {
        self.path(path).iter().position(|&b| b <= 0.0)
    }

    pub fn is_depleted(&self, path: usize) -> bool {
        self.depletion_month(path).is_some()
    }

    /// X-axis for plotting, in years (`month / 12`).
    pub fn month_axis_years(&self) -> Vec<f64> {
        (0..self.num_months).map(|m| m as f64 / 12.0).collect()
    }
}

fn is_absorbed_path(row: &[f64]) -> bool {
    if row.iter().any(|&b| !b.is_finite() || b < 0.0) {
        return false;
    }
    match row.iter().position(|&b| b == 0.0) {
        Some(m) => row[m..].iter().all(|&b| b == 0.0),
        None => true,
    }
}
