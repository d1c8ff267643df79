use super::tables::TABLE_B;
use super::{precipitation_candidate, Candidate, CandidateRule};
use crate::models::{AdvisoryKind, WeatherReading};

/// Snow alert - freezing conditions with snow forecast in the short window
///
/// Conditions:
/// - table B
/// - snow probability >= 70%
pub struct SnowAlertRule;

impl CandidateRule for SnowAlertRule {
    fn kind(&self) -> AdvisoryKind {
        AdvisoryKind::SnowAlert
    }

    fn evaluate(&self, reading: &WeatherReading) -> Candidate {
        precipitation_candidate(
            self.kind(),
            TABLE_B.evaluate(reading),
            "snow",
            reading.snow_probability,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunwayTempSource;

    fn freezing(snow_probability: f64) -> WeatherReading {
        WeatherReading {
            ambient_temp_c: -1.0,
            dew_point_c: -1.5,
            runway_temp_c: -2.0,
            runway_temp_source: RunwayTempSource::Supplied,
            humidity_percent: 70.0,
            wind_kmh: 25.0,
            rain_probability: 20.0,
            snow_probability,
        }
    }

    #[test]
    fn fires_on_high_snow_probability() {
        let candidate = SnowAlertRule.evaluate(&freezing(85.0));
        assert_eq!(candidate.kind, AdvisoryKind::SnowAlert);
        assert!(candidate.eligible, "{}", candidate.reason);
    }

    #[test]
    fn exactly_seventy_percent_fires() {
        assert!(SnowAlertRule.evaluate(&freezing(70.0)).eligible);
    }

    #[test]
    fn uses_snow_not_rain_probability() {
        let mut reading = freezing(10.0);
        reading.rain_probability = 99.0;
        let candidate = SnowAlertRule.evaluate(&reading);
        assert!(!candidate.eligible);
        assert!(candidate.reason.starts_with("snow probability"));
    }
}
