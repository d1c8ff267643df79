use crate::models::{
    AdvisoryKind, AdvisoryOutput, DecisionEntry, MaintenanceCodes, SensorChannel, WeatherReading,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SOURCE_SYSTEM: &str = "SNOWOPS";
pub const MESSAGE_TYPE: &str = "WEATHER_ADVISORY";
pub const PAYLOAD_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
pub struct PayloadHeader {
    pub source_system: &'static str,
    pub timestamp: DateTime<Utc>,
    pub message_type: &'static str,
    pub version: &'static str,
}

/// One maintenance notification: SAP PM code fields plus advisory context.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationItem {
    #[serde(flatten)]
    pub codes: MaintenanceCodes,
    pub advisory_kind: AdvisoryKind,
    pub advisory_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_class: Option<String>,
    pub internal_priority: u8,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub tasks: Vec<String>,
}

/// Document handed to the maintenance-notification integration.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub header: PayloadHeader,
    pub advisories: Vec<NotificationItem>,
    pub conditions: WeatherReading,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<Vec<SensorChannel>>,
    pub decision_log: Vec<DecisionEntry>,
}

impl NotificationPayload {
    pub fn from_output(output: &AdvisoryOutput, station: Option<&[SensorChannel]>) -> Self {
        let advisories = output
            .advisories
            .iter()
            .map(|a| NotificationItem {
                codes: a.codes,
                advisory_kind: a.kind,
                advisory_name: a.name.clone(),
                advisory_class: a.class.clone(),
                internal_priority: a.priority,
                generated_at: a.generated_at,
                note: a.note.clone(),
                tasks: a.tasks.clone(),
            })
            .collect();

        Self {
            header: PayloadHeader {
                source_system: SOURCE_SYSTEM,
                timestamp: output.evaluated_at,
                message_type: MESSAGE_TYPE,
                version: PAYLOAD_VERSION,
            },
            advisories,
            conditions: output.reading.clone(),
            station: station.map(|s| s.to_vec()),
            decision_log: output.decision_log.clone(),
        }
    }
}
