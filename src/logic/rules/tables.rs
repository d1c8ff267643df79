use crate::models::WeatherReading;
use serde::Serialize;

/// A fixed conjunction of five threshold checks over a reading.
///
/// - ambient: `ambient_above < T <= ambient_at_most` (lower bound optional)
/// - dew point: `dew >= T - dew_point_spread`
/// - runway: `runway < runway_below`
/// - humidity: `humidity >= humidity_at_least`
/// - wind: `wind < wind_below`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionTable {
    pub name: &'static str,
    pub ambient_above: Option<f64>,
    pub ambient_at_most: f64,
    pub dew_point_spread: f64,
    pub runway_below: f64,
    pub humidity_at_least: f64,
    pub wind_below: f64,
}

/// Feeds the threshold alert.
pub const TABLE_A: ConditionTable = ConditionTable {
    name: "Table A",
    ambient_above: Some(3.0),
    ambient_at_most: 6.0,
    dew_point_spread: 3.0,
    runway_below: 0.0,
    humidity_at_least: 56.0,
    wind_below: 36.0,
};

/// Feeds the rain and snow alerts.
pub const TABLE_B: ConditionTable = ConditionTable {
    name: "Table B",
    ambient_above: None,
    ambient_at_most: 0.0,
    dew_point_spread: 1.0,
    runway_below: 0.0,
    humidity_at_least: 63.0,
    wind_below: 33.0,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionCheck {
    pub variable: &'static str,
    pub value: f64,
    pub condition: String,
    pub satisfied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub table: &'static str,
    pub satisfied: bool,
    pub reason: String,
    pub checks: Vec<ConditionCheck>,
}

#[cfg(test)]
impl EvaluationResult {
    pub fn failed(&self) -> impl Iterator<Item = &ConditionCheck> {
        self.checks.iter().filter(|c| !c.satisfied)
    }

    pub fn check(&self, variable: &str) -> Option<&ConditionCheck> {
        self.checks.iter().find(|c| c.variable == variable)
    }
}

impl ConditionTable {
    /// Evaluate every check and report each one, then AND them.
    pub fn evaluate(&self, reading: &WeatherReading) -> EvaluationResult {
        let t = reading.ambient_temp_c;

        let ambient = match self.ambient_above {
            Some(low) => ConditionCheck {
                variable: "ambient_temp_c",
                value: t,
                condition: format!("{} < T <= {}", low, self.ambient_at_most),
                satisfied: t > low && t <= self.ambient_at_most,
            },
            None => ConditionCheck {
                variable: "ambient_temp_c",
                value: t,
                condition: format!("T <= {}", self.ambient_at_most),
                satisfied: t <= self.ambient_at_most,
            },
        };

        let dew_min = t - self.dew_point_spread;
        let checks = vec![
            ambient,
            ConditionCheck {
                variable: "dew_point_c",
                value: reading.dew_point_c,
                condition: format!(">= {} (T - {})", dew_min, self.dew_point_spread),
                satisfied: reading.dew_point_c >= dew_min,
            },
            ConditionCheck {
                variable: "runway_temp_c",
                value: reading.runway_temp_c,
                condition: format!("< {}", self.runway_below),
                satisfied: reading.runway_temp_c < self.runway_below,
            },
            ConditionCheck {
                variable: "humidity_percent",
                value: reading.humidity_percent,
                condition: format!(">= {}", self.humidity_at_least),
                satisfied: reading.humidity_percent >= self.humidity_at_least,
            },
            ConditionCheck {
                variable: "wind_kmh",
                value: reading.wind_kmh,
                condition: format!("< {}", self.wind_below),
                satisfied: reading.wind_kmh < self.wind_below,
            },
        ];

        let satisfied = checks.iter().all(|c| c.satisfied);
        let reason = if satisfied {
            format!("{}: all {} conditions met", self.name, checks.len())
        } else {
            let failed: Vec<String> = checks
                .iter()
                .filter(|c| !c.satisfied)
                .map(|c| format!("{} {} (requires {})", c.variable, c.value, c.condition))
                .collect();
            format!("{} not met: {}", self.name, failed.join("; "))
        };

        EvaluationResult {
            table: self.name,
            satisfied,
            reason,
            checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RunwayTempSource, INVALID_READING};

    fn reading(ambient: f64, dew: f64, runway: f64, humidity: f64, wind: f64) -> WeatherReading {
        WeatherReading {
            ambient_temp_c: ambient,
            dew_point_c: dew,
            runway_temp_c: runway,
            runway_temp_source: RunwayTempSource::Supplied,
            humidity_percent: humidity,
            wind_kmh: wind,
            rain_probability: 0.0,
            snow_probability: 0.0,
        }
    }

    #[test]
    fn table_a_holds_for_threshold_scenario() {
        let result = TABLE_A.evaluate(&reading(4.5, 2.0, -0.5, 65.0, 20.0));
        assert!(result.satisfied, "{}", result.reason);
        assert_eq!(result.checks.len(), 5);
        assert!(result.reason.contains("all 5"));
    }

    #[test]
    fn table_a_ambient_bounds() {
        // Strict lower bound
        let at_three = TABLE_A.evaluate(&reading(3.0, 2.0, -0.5, 65.0, 20.0));
        assert!(!at_three.satisfied);
        assert!(!at_three.check("ambient_temp_c").unwrap().satisfied);

        // Inclusive upper bound
        let at_six = TABLE_A.evaluate(&reading(6.0, 4.0, -0.5, 65.0, 20.0));
        assert!(at_six.satisfied, "{}", at_six.reason);

        let above_six = TABLE_A.evaluate(&reading(6.01, 4.0, -0.5, 65.0, 20.0));
        assert!(!above_six.satisfied);
    }

    #[test]
    fn table_a_other_boundaries() {
        // dew >= T - 3 is inclusive
        assert!(TABLE_A.evaluate(&reading(5.0, 2.0, -0.5, 65.0, 20.0)).satisfied);
        assert!(!TABLE_A.evaluate(&reading(5.0, 1.9, -0.5, 65.0, 20.0)).satisfied);
        // runway < 0 is strict
        assert!(!TABLE_A.evaluate(&reading(5.0, 4.0, 0.0, 65.0, 20.0)).satisfied);
        // humidity >= 56 is inclusive
        assert!(TABLE_A.evaluate(&reading(5.0, 4.0, -0.5, 56.0, 20.0)).satisfied);
        // wind < 36 is strict
        assert!(!TABLE_A.evaluate(&reading(5.0, 4.0, -0.5, 65.0, 36.0)).satisfied);
    }

    #[test]
    fn table_b_boundaries() {
        assert!(TABLE_B.evaluate(&reading(0.0, -1.0, -0.1, 63.0, 32.9)).satisfied);
        assert!(!TABLE_B.evaluate(&reading(0.1, -0.5, -0.1, 63.0, 20.0)).satisfied);
        assert!(!TABLE_B.evaluate(&reading(-1.0, -2.1, -0.1, 70.0, 20.0)).satisfied);
        assert!(!TABLE_B.evaluate(&reading(-1.0, -1.5, -0.1, 62.9, 20.0)).satisfied);
        assert!(!TABLE_B.evaluate(&reading(-1.0, -1.5, -0.1, 70.0, 33.0)).satisfied);
    }

    #[test]
    fn every_check_reported_even_after_first_failure() {
        let result = TABLE_B.evaluate(&reading(12.0, 5.0, 10.0, 45.0, 15.0));
        assert!(!result.satisfied);
        assert_eq!(result.checks.len(), 5);
        let failed: Vec<&str> = result.failed().map(|c| c.variable).collect();
        assert_eq!(
            failed,
            vec!["ambient_temp_c", "dew_point_c", "runway_temp_c", "humidity_percent"]
        );
        assert!(result.check("wind_kmh").unwrap().satisfied);
        assert!(result.reason.contains("humidity_percent"));
        assert!(!result.reason.contains("wind_kmh"));
    }

    #[test]
    fn invalid_temperatures_never_satisfy() {
        let result = TABLE_B.evaluate(&reading(INVALID_READING, -1.0, -1.0, 70.0, 10.0));
        assert!(!result.satisfied);
        let result = TABLE_B.evaluate(&reading(-1.0, INVALID_READING, -1.0, 70.0, 10.0));
        assert!(!result.satisfied);
        assert!(!result.check("dew_point_c").unwrap().satisfied);
    }
}
