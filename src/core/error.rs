use thiserror::Error;

/// Errors surfaced by the simulation engine.
///
/// Configuration problems are caught before any path is simulated.
/// Numeric failures abort the run at the first offending month.
/// Neither kind returns a partial matrix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },
    #[error("non-finite balance on path {path} at month {month}")]
    NumericOverflow { path: usize, month: usize },
    #[error("simulation cancelled")]
    Cancelled,
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message() {
        let err = SimulationError::invalid("years", "must be at least 1, got 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration: years must be at least 1, got 0"
        );
    }

    #[test]
    fn test_overflow_message() {
        let err = SimulationError::NumericOverflow { path: 3, month: 17 };
        assert_eq!(err.to_string(), "non-finite balance on path 3 at month 17");
    }
}
