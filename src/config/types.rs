//! Configuration types deserialized from YAML.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Tunable engine parameters.
///
/// The defaults are the documented production values; `settings.yaml`
/// overrides them per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Minimum excess minutes before overtime is counted at all.
    pub overtime_minimum_minutes: i64,
    /// Working days per month used to derive the daily rate.
    pub monthly_rate_divisor: Decimal,
    /// Multiplier applied to the minute rate for approved overtime.
    pub overtime_multiplier: Decimal,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            overtime_minimum_minutes: 30,
            monthly_rate_divisor: Decimal::from(26),
            overtime_multiplier: Decimal::new(125, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.overtime_minimum_minutes, 30);
        assert_eq!(settings.monthly_rate_divisor, Decimal::from(26));
        assert_eq!(
            settings.overtime_multiplier,
            Decimal::from_str("1.25").unwrap()
        );
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: EngineSettings =
            serde_yaml::from_str("overtime_minimum_minutes: 60\n").unwrap();
        assert_eq!(settings.overtime_minimum_minutes, 60);
        assert_eq!(settings.monthly_rate_divisor, Decimal::from(26));
    }
}
