use super::audit::AuditSink;
use super::runway_temp::resolve_runway_temp;
use crate::datasources::RunwaySensor;
use crate::models::{RawReading, WeatherReading, INVALID_READING};
use serde_json::Value;

/// Physically plausible bounds for any normalized value.
pub const PLAUSIBLE_MIN: f64 = -100.0;
pub const PLAUSIBLE_MAX: f64 = 100.0;

/// Strings that mean "no reading", compared case-insensitively after trimming.
const NOT_AVAILABLE_TOKENS: [&str; 5] = ["n/a", "na", "null", "none", ""];

/// Outcome of coercing one raw scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    Value(f64),
    Missing,
    NotAvailable,
    Unparseable,
    Implausible(f64),
}

pub fn is_plausible(value: f64) -> bool {
    value.is_finite() && (PLAUSIBLE_MIN..=PLAUSIBLE_MAX).contains(&value)
}

fn range_checked(value: f64) -> Coerced {
    if is_plausible(value) {
        Coerced::Value(value)
    } else {
        Coerced::Implausible(value)
    }
}

/// Classify a raw scalar without applying any default.
pub fn coerce(raw: Option<&Value>) -> Coerced {
    match raw {
        None | Some(Value::Null) => Coerced::Missing,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if NOT_AVAILABLE_TOKENS
                .iter()
                .any(|t| trimmed.eq_ignore_ascii_case(t))
            {
                return Coerced::NotAvailable;
            }
            match trimmed.parse::<f64>() {
                Ok(v) => range_checked(v),
                Err(_) => Coerced::Unparseable,
            }
        }
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => range_checked(v),
            None => Coerced::Unparseable,
        },
        Some(Value::Bool(b)) => Coerced::Value(if *b { 1.0 } else { 0.0 }),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Coerced::Unparseable,
    }
}

/// Coerce a field, substituting `default` for anything that is not a
/// plausible number.
pub fn normalize_value(
    field: &str,
    raw: Option<&Value>,
    default: f64,
    sink: &mut dyn AuditSink,
) -> f64 {
    match coerce(raw) {
        Coerced::Value(v) => v,
        Coerced::Missing => {
            sink.debug(format!("{}: missing, using default {}", field, default));
            default
        }
        Coerced::NotAvailable => {
            sink.debug(format!("{}: not available, using default {}", field, default));
            default
        }
        Coerced::Unparseable => {
            sink.warn(format!(
                "{}: unparseable value {}, using default {}",
                field,
                raw.map(|v| v.to_string()).unwrap_or_default(),
                default
            ));
            default
        }
        Coerced::Implausible(v) => {
            sink.warn(format!(
                "{}: value {} outside [{}, {}], using default {}",
                field, v, PLAUSIBLE_MIN, PLAUSIBLE_MAX, default
            ));
            default
        }
    }
}

/// Build the normalized reading the rule tables run against.
pub fn normalize_reading(
    raw: &RawReading,
    sensor: &dyn RunwaySensor,
    sink: &mut dyn AuditSink,
) -> WeatherReading {
    let ambient_temp_c = normalize_value(
        "ambient_temp_c",
        raw.ambient_temp_c.as_ref(),
        INVALID_READING,
        sink,
    );
    let dew_point_c = normalize_value(
        "dew_point_c",
        raw.dew_point_c.as_ref(),
        INVALID_READING,
        sink,
    );
    let (runway_temp_c, runway_temp_source) =
        resolve_runway_temp(raw.runway_temp_c.as_ref(), sensor, sink);
    let humidity_percent =
        normalize_value("humidity_percent", raw.humidity_percent.as_ref(), 0.0, sink);
    // Wind gates on `<`, so a zero default would read as calm air.
    let wind_kmh = normalize_value("wind_kmh", raw.wind_kmh.as_ref(), INVALID_READING, sink);
    let rain_probability =
        normalize_value("rain_probability", raw.rain_probability(), 0.0, sink);
    let snow_probability =
        normalize_value("snow_probability", raw.snow_probability(), 0.0, sink);

    WeatherReading {
        ambient_temp_c,
        dew_point_c,
        runway_temp_c,
        runway_temp_source,
        humidity_percent,
        wind_kmh,
        rain_probability,
        snow_probability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::NoSensor;
    use crate::logic::audit::AuditLog;
    use crate::models::{is_invalid, RunwayTempSource};
    use serde_json::json;

    fn coerce_json(v: Value) -> Coerced {
        coerce(Some(&v))
    }

    #[test]
    fn coerce_numbers_and_numeric_strings() {
        assert_eq!(coerce_json(json!(4.5)), Coerced::Value(4.5));
        assert_eq!(coerce_json(json!(-3)), Coerced::Value(-3.0));
        assert_eq!(coerce_json(json!(" 12.25 ")), Coerced::Value(12.25));
        assert_eq!(coerce_json(json!("-0.5")), Coerced::Value(-0.5));
    }

    #[test]
    fn coerce_not_available_tokens() {
        for token in ["N/A", "na", "NULL", "None", "", "   "] {
            assert_eq!(coerce_json(json!(token)), Coerced::NotAvailable, "{:?}", token);
        }
        assert_eq!(coerce(None), Coerced::Missing);
        assert_eq!(coerce_json(Value::Null), Coerced::Missing);
    }

    #[test]
    fn coerce_rejects_garbage() {
        assert_eq!(coerce_json(json!("cold")), Coerced::Unparseable);
        assert_eq!(coerce_json(json!([1, 2])), Coerced::Unparseable);
        assert_eq!(coerce_json(json!({ "v": 1 })), Coerced::Unparseable);
    }

    #[test]
    fn coerce_range_check() {
        assert_eq!(coerce_json(json!(100)), Coerced::Value(100.0));
        assert_eq!(coerce_json(json!(-100)), Coerced::Value(-100.0));
        assert_eq!(coerce_json(json!(100.1)), Coerced::Implausible(100.1));
        assert_eq!(coerce_json(json!("999")), Coerced::Implausible(999.0));
        assert!(matches!(coerce_json(json!("NaN")), Coerced::Implausible(_)));
        assert!(matches!(coerce_json(json!("inf")), Coerced::Implausible(_)));
    }

    #[test]
    fn coerce_bools_like_numbers() {
        assert_eq!(coerce_json(json!(true)), Coerced::Value(1.0));
        assert_eq!(coerce_json(json!(false)), Coerced::Value(0.0));
    }

    #[test]
    fn normalize_value_logs_implausible() {
        let mut log = AuditLog::new();
        let v = normalize_value("humidity_percent", Some(&json!(250)), 0.0, &mut log);
        assert_eq!(v, 0.0);
        assert_eq!(log.warnings().count(), 1);
        assert!(log.contains("humidity_percent"));
    }

    #[test]
    fn normalize_reading_applies_field_defaults() {
        let raw = RawReading::from_json(json!({
            "ambient_temp_c": "N/A",
            "dew_point_c": "frosty",
            "humidity_percent": null,
            "wind_kmh": "20",
        }))
        .unwrap();
        let mut log = AuditLog::new();
        let reading = normalize_reading(&raw, &NoSensor, &mut log);

        assert!(is_invalid(reading.ambient_temp_c));
        assert!(is_invalid(reading.dew_point_c));
        assert_eq!(reading.humidity_percent, 0.0);
        assert_eq!(reading.wind_kmh, 20.0);
        assert_eq!(reading.rain_probability, 0.0);
        assert_eq!(reading.snow_probability, 0.0);
        assert_eq!(reading.runway_temp_source, RunwayTempSource::Default);
        assert!(!reading.is_valid());
    }

    #[test]
    fn unusable_wind_fails_wind_checks() {
        for wind in [json!(120), json!("gale"), Value::Null] {
            let raw = RawReading::from_json(json!({ "ambient_temp_c": -1.0, "wind_kmh": wind }))
                .unwrap();
            let mut log = AuditLog::new();
            let reading = normalize_reading(&raw, &NoSensor, &mut log);
            assert!(is_invalid(reading.wind_kmh));
        }
    }

    #[test]
    fn normalize_reading_reads_nested_forecast() {
        let raw = RawReading::from_json(json!({
            "temperatura_actual": -2.0,
            "pronostico": { "prob_lluvia": 10, "prob_nieve": "85" }
        }))
        .unwrap();
        let mut log = AuditLog::new();
        let reading = normalize_reading(&raw, &NoSensor, &mut log);

        assert_eq!(reading.ambient_temp_c, -2.0);
        assert_eq!(reading.rain_probability, 10.0);
        assert_eq!(reading.snow_probability, 85.0);
    }
}
