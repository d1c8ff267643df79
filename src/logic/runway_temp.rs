use super::audit::AuditSink;
use super::normalize::{coerce, Coerced};
use crate::datasources::RunwaySensor;
use crate::models::{RunwayTempSource, FALLBACK_RUNWAY_TEMP_C};
use serde_json::Value;

/// Pick the runway surface temperature and record where it came from.
///
/// Precedence is fixed: caller-supplied, then the sensor feed, then
/// [`FALLBACK_RUNWAY_TEMP_C`].
pub fn resolve_runway_temp(
    supplied: Option<&Value>,
    sensor: &dyn RunwaySensor,
    sink: &mut dyn AuditSink,
) -> (f64, RunwayTempSource) {
    match coerce(supplied) {
        Coerced::Value(v) => {
            sink.debug(format!("runway_temp_c: using supplied value {}", v));
            return (v, RunwayTempSource::Supplied);
        }
        Coerced::Missing | Coerced::NotAvailable => {}
        other => {
            sink.warn(format!(
                "runway_temp_c: supplied value rejected ({:?}), trying sensor feed",
                other
            ));
        }
    }

    if let Some(raw) = sensor.surface_temperature() {
        if let Coerced::Value(v) = coerce(Some(&Value::from(raw))) {
            sink.info(format!(
                "runway_temp_c: {} read from {}",
                v,
                sensor.describe()
            ));
            return (v, RunwayTempSource::ExternalSensor);
        }
        sink.warn(format!(
            "runway_temp_c: sensor value {} is implausible, ignoring",
            raw
        ));
    }

    sink.warn(format!(
        "runway_temp_c: no supplied or sensor value, using default {}",
        FALLBACK_RUNWAY_TEMP_C
    ));
    (FALLBACK_RUNWAY_TEMP_C, RunwayTempSource::Default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::{NoSensor, SensorSnapshot};
    use crate::logic::audit::AuditLog;
    use crate::models::SensorChannel;
    use serde_json::json;

    fn snapshot_with(value: f64) -> SensorSnapshot {
        SensorSnapshot::new(vec![
            SensorChannel::new("Air Temperature", 1.0, "°C"),
            SensorChannel::new("Surface Temperature", value, "°C"),
        ])
    }

    #[test]
    fn supplied_value_wins_over_sensor() {
        let mut log = AuditLog::new();
        let (temp, source) =
            resolve_runway_temp(Some(&json!(-2.0)), &snapshot_with(-7.0), &mut log);
        assert_eq!(temp, -2.0);
        assert_eq!(source, RunwayTempSource::Supplied);
        assert_eq!(log.warnings().count(), 0);
    }

    #[test]
    fn supplied_numeric_string_is_accepted() {
        let mut log = AuditLog::new();
        let (temp, source) = resolve_runway_temp(Some(&json!("-1.25")), &NoSensor, &mut log);
        assert_eq!(temp, -1.25);
        assert_eq!(source, RunwayTempSource::Supplied);
    }

    #[test]
    fn sensor_used_when_not_supplied() {
        let mut log = AuditLog::new();
        let (temp, source) = resolve_runway_temp(None, &snapshot_with(-3.5), &mut log);
        assert_eq!(temp, -3.5);
        assert_eq!(source, RunwayTempSource::ExternalSensor);
    }

    #[test]
    fn not_available_supplied_value_falls_through_to_sensor() {
        let mut log = AuditLog::new();
        let (temp, source) =
            resolve_runway_temp(Some(&json!("n/a")), &snapshot_with(-0.9), &mut log);
        assert_eq!(temp, -0.9);
        assert_eq!(source, RunwayTempSource::ExternalSensor);
    }

    #[test]
    fn implausible_supplied_value_falls_through_with_warning() {
        let mut log = AuditLog::new();
        let (_, source) = resolve_runway_temp(Some(&json!(999)), &snapshot_with(-0.9), &mut log);
        assert_eq!(source, RunwayTempSource::ExternalSensor);
        assert!(log.warnings().any(|e| e.message.contains("rejected")));
    }

    #[test]
    fn default_when_nothing_available() {
        let mut log = AuditLog::new();
        let (temp, source) = resolve_runway_temp(None, &NoSensor, &mut log);
        assert_eq!(temp, FALLBACK_RUNWAY_TEMP_C);
        assert_eq!(source, RunwayTempSource::Default);
        assert!(log.warnings().any(|e| e.message.contains("default")));
    }

    #[test]
    fn implausible_sensor_value_uses_default() {
        let mut log = AuditLog::new();
        let (temp, source) = resolve_runway_temp(None, &snapshot_with(150.0), &mut log);
        assert_eq!(temp, FALLBACK_RUNWAY_TEMP_C);
        assert_eq!(source, RunwayTempSource::Default);
        assert_eq!(log.warnings().count(), 2);
    }
}
