pub mod marwis;

pub use marwis::{FileSensorFeed, MarwisClient};

use crate::models::{find_surface_temperature, SensorChannel};

/// Read-only accessor for the runway weather station.
///
/// Implementations never fail: an unreachable or malformed feed yields
/// `None` from [`RunwaySensor::channels`].
pub trait RunwaySensor: Send + Sync {
    /// Current channel readings, or `None` when the feed is unavailable.
    fn channels(&self) -> Option<Vec<SensorChannel>>;

    /// Short label used in audit messages.
    fn describe(&self) -> String;

    fn surface_temperature(&self) -> Option<f64> {
        self.channels()
            .and_then(|channels| find_surface_temperature(&channels))
    }
}

/// No station configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSensor;

impl RunwaySensor for NoSensor {
    fn channels(&self) -> Option<Vec<SensorChannel>> {
        None
    }

    fn describe(&self) -> String {
        "no sensor feed".to_string()
    }
}

/// Channel readings captured once and evaluated against many times.
#[derive(Debug, Clone, Default)]
pub struct SensorSnapshot {
    channels: Option<Vec<SensorChannel>>,
    origin: String,
}

impl SensorSnapshot {
    pub fn new(channels: Vec<SensorChannel>) -> Self {
        Self {
            channels: Some(channels),
            origin: "sensor snapshot".to_string(),
        }
    }

    pub fn unavailable(origin: impl Into<String>) -> Self {
        Self {
            channels: None,
            origin: origin.into(),
        }
    }

    /// Read `sensor` once. Later calls on the snapshot never touch the feed.
    pub fn capture(sensor: &dyn RunwaySensor) -> Self {
        Self {
            channels: sensor.channels(),
            origin: sensor.describe(),
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn is_available(&self) -> bool {
        self.channels.is_some()
    }
}

impl RunwaySensor for SensorSnapshot {
    fn channels(&self) -> Option<Vec<SensorChannel>> {
        self.channels.clone()
    }

    fn describe(&self) -> String {
        self.origin.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sensor_has_no_temperature() {
        assert!(NoSensor.channels().is_none());
        assert!(NoSensor.surface_temperature().is_none());
    }

    #[test]
    fn snapshot_surface_temperature() {
        let snapshot = SensorSnapshot::new(vec![
            SensorChannel::new("Surface Condition", "DRY", ""),
            SensorChannel::new("Surface Temperature", -1.5, "°C"),
        ])
        .with_origin("MARWIS");
        assert!(snapshot.is_available());
        assert_eq!(snapshot.surface_temperature(), Some(-1.5));
        assert_eq!(snapshot.describe(), "MARWIS");
    }

    #[test]
    fn unavailable_snapshot() {
        let snapshot = SensorSnapshot::unavailable("MARWIS (timeout)");
        assert!(!snapshot.is_available());
        assert!(snapshot.surface_temperature().is_none());
    }
}
