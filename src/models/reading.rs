use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker for a temperature that could not be read or was physically implausible.
///
/// NaN fails every comparison, so a reading carrying it can never satisfy a
/// condition table. Serializes as `null`.
pub const INVALID_READING: f64 = f64::NAN;

/// Runway surface temperature used when neither the caller nor the sensor
/// feed provides one.
pub const FALLBACK_RUNWAY_TEMP_C: f64 = -0.5;

pub fn is_invalid(value: f64) -> bool {
    value.is_nan()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunwayTempSource {
    Supplied,
    ExternalSensor,
    Default,
}

impl RunwayTempSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunwayTempSource::Supplied => "supplied",
            RunwayTempSource::ExternalSensor => "external_sensor",
            RunwayTempSource::Default => "default",
        }
    }
}

impl std::fmt::Display for RunwayTempSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forecast block nested inside an upstream weather analysis.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawForecast {
    #[serde(default, alias = "prob_lluvia")]
    pub rain_probability: Option<Value>,
    #[serde(default, alias = "prob_nieve")]
    pub snow_probability: Option<Value>,
}

/// Reading exactly as supplied by the caller, before normalization.
///
/// Every field is an arbitrary JSON scalar (or absent). Unknown fields are
/// ignored so a full upstream weather analysis can be passed through as is.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawReading {
    #[serde(
        default,
        alias = "temperatura_actual",
        alias = "temperatura_ambiente"
    )]
    pub ambient_temp_c: Option<Value>,
    #[serde(default, alias = "punto_rocio", alias = "temperatura_rocio")]
    pub dew_point_c: Option<Value>,
    #[serde(default, alias = "temperatura_pista")]
    pub runway_temp_c: Option<Value>,
    #[serde(default, alias = "humedad")]
    pub humidity_percent: Option<Value>,
    #[serde(default, alias = "viento")]
    pub wind_kmh: Option<Value>,
    #[serde(default, alias = "prob_lluvia")]
    pub rain_probability: Option<Value>,
    #[serde(default, alias = "prob_nieve")]
    pub snow_probability: Option<Value>,
    #[serde(default, alias = "pronostico")]
    pub forecast: Option<RawForecast>,
}

impl RawReading {
    pub fn from_json(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Top-level rain probability, falling back to the nested forecast block.
    pub fn rain_probability(&self) -> Option<&Value> {
        self.rain_probability.as_ref().or_else(|| {
            self.forecast
                .as_ref()
                .and_then(|f| f.rain_probability.as_ref())
        })
    }

    /// Top-level snow probability, falling back to the nested forecast block.
    pub fn snow_probability(&self) -> Option<&Value> {
        self.snow_probability.as_ref().or_else(|| {
            self.forecast
                .as_ref()
                .and_then(|f| f.snow_probability.as_ref())
        })
    }
}

/// Normalized reading the rule engine evaluates. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReading {
    pub ambient_temp_c: f64,
    pub dew_point_c: f64,
    pub runway_temp_c: f64,
    pub runway_temp_source: RunwayTempSource,
    pub humidity_percent: f64,
    pub wind_kmh: f64,
    pub rain_probability: f64,
    pub snow_probability: f64,
}

impl WeatherReading {
    /// Whether the reading may enter table evaluation at all.
    pub fn is_valid(&self) -> bool {
        !is_invalid(self.ambient_temp_c)
    }
}
