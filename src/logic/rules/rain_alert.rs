use super::tables::TABLE_B;
use super::{precipitation_candidate, Candidate, CandidateRule};
use crate::models::{AdvisoryKind, WeatherReading};

/// Rain alert - freezing conditions with rain forecast in the short window
///
/// Conditions:
/// - table B (ambient <= 0, dew within 1 °C, runway < 0, humidity >= 63, wind < 33)
/// - rain probability >= 70%
pub struct RainAlertRule;

impl CandidateRule for RainAlertRule {
    fn kind(&self) -> AdvisoryKind {
        AdvisoryKind::RainAlert
    }

    fn evaluate(&self, reading: &WeatherReading) -> Candidate {
        precipitation_candidate(
            self.kind(),
            TABLE_B.evaluate(reading),
            "rain",
            reading.rain_probability,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunwayTempSource;

    fn freezing(rain_probability: f64) -> WeatherReading {
        WeatherReading {
            ambient_temp_c: -0.5,
            dew_point_c: -1.0,
            runway_temp_c: -0.2,
            runway_temp_source: RunwayTempSource::Supplied,
            humidity_percent: 85.0,
            wind_kmh: 28.0,
            rain_probability,
            snow_probability: 20.0,
        }
    }

    #[test]
    fn fires_at_threshold() {
        let candidate = RainAlertRule.evaluate(&freezing(70.0));
        assert!(candidate.eligible, "{}", candidate.reason);
        assert!(candidate.reason.contains("meets"));
    }

    #[test]
    fn below_threshold_reason() {
        let candidate = RainAlertRule.evaluate(&freezing(69.9));
        assert!(!candidate.eligible);
        assert!(candidate.table.satisfied);
        assert!(candidate.reason.contains("below 70% threshold"));
    }

    #[test]
    fn table_failure_short_circuits() {
        let mut reading = freezing(95.0);
        reading.wind_kmh = 40.0;
        let candidate = RainAlertRule.evaluate(&reading);
        assert!(!candidate.eligible);
        assert_eq!(candidate.reason, candidate.table.reason);
        assert!(candidate.reason.contains("wind_kmh"));
    }
}
