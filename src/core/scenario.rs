use crate::core::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A historical crash overlaid on the first months of retirement.
///
/// The shock's `drop` is spread evenly across `duration` months, so a
/// path experiences `drop / duration` of extra return in each month of
/// the window and nothing afterwards.
///
/// # Examples
///
/// ```
/// use retirement_stress::core::scenario::Scenario;
///
/// let crash: Scenario = "2008 Financial Crisis".parse().unwrap();
/// assert_eq!(crash.drop(), -0.50);
/// assert_eq!(crash.duration(), 18);
/// assert_eq!(crash.shock_for_month(18), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Scenario {
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "2008 Financial Crisis")]
    FinancialCrisis2008,
    #[serde(rename = "2000 Dot-com Bubble")]
    DotCom2000,
    #[serde(rename = "1929 Great Depression")]
    GreatDepression1929,
    /// A caller-defined shock.
    Custom { drop: f64, duration: u32 },
}

impl Scenario {
    /// The built-in scenarios, in selector order.
    pub const ALL: [Scenario; 4] = [
        Scenario::None,
        Scenario::FinancialCrisis2008,
        Scenario::DotCom2000,
        Scenario::GreatDepression1929,
    ];

    /// Total fractional drop applied across the window (zero or negative).
    pub fn drop(&self) -> f64 {
        match self {
            Scenario::None => 0.0,
            Scenario::FinancialCrisis2008 => -0.50,
            Scenario::DotCom2000 => -0.45,
            Scenario::GreatDepression1929 => -0.89,
            Scenario::Custom { drop, .. } => *drop,
        }
    }

    /// Number of months the drop is spread over.
    pub fn duration(&self) -> u32 {
        match self {
            Scenario::None => 0,
            Scenario::FinancialCrisis2008 => 18,
            Scenario::DotCom2000 => 36,
            Scenario::GreatDepression1929 => 33,
            Scenario::Custom { duration, .. } => *duration,
        }
    }

    /// Extra return added to month `month`'s draw.
    pub fn shock_for_month(&self, month: usize) -> f64 {
        let duration = self.duration() as usize;
        if month < duration {
            self.drop() / duration as f64
        } else {
            0.0
        }
    }

    /// Display name as shown in the scenario selector.
    pub fn name(&self) -> String {
        match self {
            Scenario::None => "None".to_string(),
            Scenario::FinancialCrisis2008 => "2008 Financial Crisis".to_string(),
            Scenario::DotCom2000 => "2000 Dot-com Bubble".to_string(),
            Scenario::GreatDepression1929 => "1929 Great Depression".to_string(),
            Scenario::Custom { drop, duration } => {
                format!("Custom ({:.1}% over {} months)", drop * 100.0, duration)
            }
        }
    }

    /// Look up a built-in scenario by its display name.
    pub fn from_name(name: &str) -> Result<Self, SimulationError> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                SimulationError::invalid("scenario", format!("is not a known scenario: '{wanted}'"))
            })
    }

    /// Check a scenario's shock parameters.
    ///
    /// Built-in scenarios always pass; custom ones need a finite drop in
    /// `(-1, 0]`, and a zero-length window cannot carry a drop.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let drop = self.drop();
        if !drop.is_finite() || drop <= -1.0 || drop > 0.0 {
            return Err(SimulationError::invalid(
                "scenario.drop",
                format!("must be in (-1, 0], got {drop}"),
            ));
        }
        if self.duration() == 0 && drop != 0.0 {
            return Err(SimulationError::invalid(
                "scenario.duration",
                format!("must be positive when drop is {drop}"),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Scenario {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_table() {
        assert_eq!((Scenario::None.drop(), Scenario::None.duration()), (0.0, 0));
        assert_eq!(Scenario::FinancialCrisis2008.drop(), -0.50);
        assert_eq!(Scenario::FinancialCrisis2008.duration(), 18);
        assert_eq!(Scenario::DotCom2000.drop(), -0.45);
        assert_eq!(Scenario::DotCom2000.duration(), 36);
        assert_eq!(Scenario::GreatDepression1929.drop(), -0.89);
        assert_eq!(Scenario::GreatDepression1929.duration(), 33);
    }

    #[test]
    fn test_none_never_shocks() {
        for month in 0..600 {
            assert_eq!(Scenario::None.shock_for_month(month), 0.0);
        }
    }

    #[test]
    fn test_shock_window_sums_to_drop() {
        for scenario in Scenario::ALL {
            let total: f64 = (0..600).map(|m| scenario.shock_for_month(m)).sum();
            assert_relative_eq!(total, scenario.drop(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_shock_stops_at_window_end() {
        let s = Scenario::GreatDepression1929;
        assert_relative_eq!(s.shock_for_month(0), -0.89 / 33.0);
        assert_relative_eq!(s.shock_for_month(32), -0.89 / 33.0);
        assert_eq!(s.shock_for_month(33), 0.0);
    }

    #[test]
    fn test_name_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::from_name(&scenario.name()).unwrap(), scenario);
        }
        assert_eq!(
            " 1929 great depression ".parse::<Scenario>().unwrap(),
            Scenario::GreatDepression1929
        );
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            Scenario::from_name("1987 Black Monday"),
            Err(SimulationError::InvalidConfiguration { field: "scenario", .. })
        ));
    }

    #[test]
    fn test_custom_validation() {
        assert!(Scenario::Custom { drop: -0.3, duration: 12 }.validate().is_ok());
        assert!(Scenario::Custom { drop: 0.0, duration: 0 }.validate().is_ok());
        assert!(Scenario::Custom { drop: -0.3, duration: 0 }.validate().is_err());
        assert!(Scenario::Custom { drop: 0.2, duration: 6 }.validate().is_err());
        assert!(Scenario::Custom { drop: -1.0, duration: 6 }.validate().is_err());
        assert!(Scenario::Custom { drop: f64::NAN, duration: 6 }.validate().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Scenario::DotCom2000).unwrap();
        assert_eq!(json, "\"2000 Dot-com Bubble\"");
        let parsed: Scenario = serde_json::from_str("\"1929 Great Depression\"").unwrap();
        assert_eq!(parsed, Scenario::GreatDepression1929);
    }
}
