use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel-name fragments that identify a pavement surface channel.
pub const SURFACE_CHANNEL_FRAGMENTS: [&str; 4] = ["surface", "road", "pista", "pavement"];

/// One named channel reading from the runway weather station.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SensorChannel {
    #[serde(rename = "SensorChannelName", alias = "name", default)]
    pub name: Option<String>,
    #[serde(rename = "Value", alias = "value", default)]
    pub value: Option<Value>,
    #[serde(rename = "SensorChannelUnit", alias = "unit", default)]
    pub unit: Option<String>,
}

impl SensorChannel {
    #[cfg(test)]
    pub fn new(name: &str, value: impl Into<Value>, unit: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            value: Some(value.into()),
            unit: Some(unit.to_string()),
        }
    }

    /// Whether the channel name looks like a pavement surface temperature.
    pub fn is_surface_temperature(&self) -> bool {
        let Some(name) = self.name.as_deref() else {
            return false;
        };
        let name = name.to_lowercase();
        name.contains("temp") && SURFACE_CHANNEL_FRAGMENTS.iter().any(|f| name.contains(f))
    }

    /// Numeric channel value, when the station reported one.
    pub fn numeric_value(&self) -> Option<f64> {
        match self.value.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

/// Station payload: either a bare channel list or an object wrapping one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StationPayload {
    Channels(Vec<SensorChannel>),
    Wrapped {
        #[serde(default)]
        measurements: Vec<SensorChannel>,
    },
}

impl StationPayload {
    pub fn into_channels(self) -> Vec<SensorChannel> {
        match self {
            StationPayload::Channels(channels) => channels,
            StationPayload::Wrapped { measurements } => measurements,
        }
    }
}

/// First numeric pavement-surface temperature in the channel list.
pub fn find_surface_temperature(channels: &[SensorChannel]) -> Option<f64> {
    channels
        .iter()
        .filter(|c| c.is_surface_temperature())
        .find_map(|c| c.numeric_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn surface_channel_matching() {
        assert!(SensorChannel::new("Surface Temperature", -1.2, "°C").is_surface_temperature());
        assert!(SensorChannel::new("ROAD_TEMP", -1.2, "°C").is_surface_temperature());
        assert!(SensorChannel::new("Temp Pista", -1.2, "°C").is_surface_temperature());
        assert!(SensorChannel::new("pavement temp", -1.2, "°C").is_surface_temperature());
        // Surface, but not a temperature
        assert!(!SensorChannel::new("Surface Condition", "WET", "").is_surface_temperature());
        // Temperature, but not the surface
        assert!(!SensorChannel::new("Air Temperature", 2.0, "°C").is_surface_temperature());
    }

    #[test]
    fn find_skips_non_numeric_matches() {
        let channels = vec![
            SensorChannel::new("Air Temperature", 2.0, "°C"),
            SensorChannel::new("Surface Temperature", "---", "°C"),
            SensorChannel::new("Road Temperature", "-3.4", "°C"),
            SensorChannel::new("Surface Temp 2", -9.0, "°C"),
        ];
        assert_eq!(find_surface_temperature(&channels), Some(-3.4));
    }

    #[test]
    fn find_returns_none_without_matching_channel() {
        let channels = vec![SensorChannel::new("Air Temperature", 2.0, "°C")];
        assert_eq!(find_surface_temperature(&channels), None);
        assert_eq!(find_surface_temperature(&[]), None);
    }

    #[test]
    fn station_payload_both_shapes() {
        let list: StationPayload = serde_json::from_value(json!([
            { "SensorChannelName": "Surface Temperature", "Value": -0.8, "SensorChannelUnit": "°C" }
        ]))
        .unwrap();
        assert_eq!(list.into_channels().len(), 1);

        let wrapped: StationPayload = serde_json::from_value(json!({
            "measurements": [
                { "name": "Road Temp", "value": "-1.0", "unit": "°C" },
                { "name": "Air Temp", "value": 1.0 }
            ]
        }))
        .unwrap();
        let channels = wrapped.into_channels();
        assert_eq!(channels.len(), 2);
        assert_eq!(find_surface_temperature(&channels), Some(-1.0));
    }
}
