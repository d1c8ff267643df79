use crate::models::RawReading;
use serde_json::json;

/// Canned readings for demonstrating and smoke-testing the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Snow,
    Rain,
    Threshold,
    Clear,
    NoRunway,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Snow,
        Scenario::Rain,
        Scenario::Threshold,
        Scenario::Clear,
        Scenario::NoRunway,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Snow => "snow",
            Scenario::Rain => "rain",
            Scenario::Threshold => "threshold",
            Scenario::Clear => "clear",
            Scenario::NoRunway => "no-runway",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snow" | "nieve" => Some(Scenario::Snow),
            "rain" | "lluvia" => Some(Scenario::Rain),
            "threshold" => Some(Scenario::Threshold),
            "clear" => Some(Scenario::Clear),
            "no-runway" | "no_runway" | "norunway" => Some(Scenario::NoRunway),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::Snow => "Sub-zero air, frozen runway, 85% snow forecast",
            Scenario::Rain => "Near-freezing air, frozen runway, 90% rain forecast",
            Scenario::Threshold => "Mild air over a frozen runway",
            Scenario::Clear => "Mild, dry conditions",
            Scenario::NoRunway => "Threshold conditions with no runway temperature supplied",
        }
    }

    pub fn reading(&self) -> RawReading {
        let value = match self {
            Scenario::Snow => json!({
                "ambient_temp_c": -1.0,
                "dew_point_c": -1.5,
                "runway_temp_c": -2.0,
                "humidity_percent": 70,
                "wind_kmh": 25,
                "rain_probability": 20,
                "snow_probability": 85
            }),
            Scenario::Rain => json!({
                "ambient_temp_c": -0.5,
                "dew_point_c": -1.0,
                "runway_temp_c": -0.2,
                "humidity_percent": 85,
                "wind_kmh": 28,
                "rain_probability": 90,
                "snow_probability": 20
            }),
            Scenario::Threshold => json!({
                "ambient_temp_c": 4.5,
                "dew_point_c": 2.0,
                "runway_temp_c": -0.5,
                "humidity_percent": 65,
                "wind_kmh": 20,
                "rain_probability": 30,
                "snow_probability": 10
            }),
            Scenario::Clear => json!({
                "ambient_temp_c": 12.0,
                "dew_point_c": 5.0,
                "runway_temp_c": 10.0,
                "humidity_percent": 45,
                "wind_kmh": 15,
                "rain_probability": 20,
                "snow_probability": 0
            }),
            Scenario::NoRunway => json!({
                "ambient_temp_c": 4.5,
                "dew_point_c": 2.0,
                "humidity_percent": 65,
                "wind_kmh": 20,
                "rain_probability": 30,
                "snow_probability": 10
            }),
        };

        serde_json::from_value(value).unwrap_or_default()
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::NoSensor;
    use crate::logic::audit::AuditLog;
    use crate::logic::AdvisoryEngine;
    use crate::models::{AdvisoryKind, RunwayTempSource};

    fn kinds(scenario: Scenario) -> (Vec<AdvisoryKind>, RunwayTempSource) {
        let mut log = AuditLog::new();
        let output = AdvisoryEngine::new().evaluate(&scenario.reading(), &NoSensor, &mut log);
        (output.kinds(), output.runway_temp_source)
    }

    #[test]
    fn scenarios_produce_expected_advisories() {
        assert_eq!(kinds(Scenario::Snow).0, vec![AdvisoryKind::SnowAlert]);
        assert_eq!(kinds(Scenario::Rain).0, vec![AdvisoryKind::RainAlert]);
        assert_eq!(kinds(Scenario::Threshold).0, vec![AdvisoryKind::ThresholdAlert]);
        assert!(kinds(Scenario::Clear).0.is_empty());
    }

    #[test]
    fn no_runway_scenario_uses_default_source() {
        let (advisories, source) = kinds(Scenario::NoRunway);
        assert_eq!(source, RunwayTempSource::Default);
        assert_eq!(advisories, vec![AdvisoryKind::ThresholdAlert]);
    }

    #[test]
    fn scenario_names_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::from_str(scenario.as_str()), Some(scenario));
        }
        assert_eq!(Scenario::from_str("nieve"), Some(Scenario::Snow));
        assert_eq!(Scenario::from_str("hail"), None);
    }
}
