use super::reading::{RunwayTempSource, WeatherReading};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Advisory kinds, listed from most to least severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    SnowAlert,
    RainAlert,
    ThresholdAlert,
}

impl AdvisoryKind {
    /// Every kind in ascending priority order.
    pub const ALL: [AdvisoryKind; 3] = [
        AdvisoryKind::SnowAlert,
        AdvisoryKind::RainAlert,
        AdvisoryKind::ThresholdAlert,
    ];

    /// Lower is more severe and is evaluated first. Values are distinct.
    pub fn priority(&self) -> u8 {
        match self {
            AdvisoryKind::SnowAlert => 1,
            AdvisoryKind::RainAlert => 2,
            AdvisoryKind::ThresholdAlert => 3,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            AdvisoryKind::SnowAlert => "snow_alert",
            AdvisoryKind::RainAlert => "rain_alert",
            AdvisoryKind::ThresholdAlert => "threshold_alert",
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.metadata().name
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "snow_alert" | "snowalert" | "snow" | "aviso_6" => Some(AdvisoryKind::SnowAlert),
            "rain_alert" | "rainalert" | "rain" | "aviso_5" => Some(AdvisoryKind::RainAlert),
            "threshold_alert" | "thresholdalert" | "threshold" | "aviso_1" => {
                Some(AdvisoryKind::ThresholdAlert)
            }
            _ => None,
        }
    }

    /// Kinds sorted by priority, independent of declaration order.
    pub fn by_priority() -> Vec<AdvisoryKind> {
        let mut kinds = Self::ALL.to_vec();
        kinds.sort_by_key(|k| k.priority());
        kinds
    }

    pub fn metadata(&self) -> &'static AdvisoryMetadata {
        match self {
            AdvisoryKind::SnowAlert => &SNOW_ALERT,
            AdvisoryKind::RainAlert => &RAIN_ALERT,
            AdvisoryKind::ThresholdAlert => &THRESHOLD_ALERT,
        }
    }

    pub fn tasks(&self) -> Vec<String> {
        self.metadata().tasks.iter().map(|t| t.to_string()).collect()
    }
}

impl std::fmt::Display for AdvisoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maintenance-notification code block expected by the downstream
/// plant-maintenance integration. Field names on the wire are the SAP PM ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaintenanceCodes {
    /// Notification type
    #[serde(rename = "QMART")]
    pub notification_type: &'static str,
    /// Short text
    #[serde(rename = "QMTXT")]
    pub description: &'static str,
    /// Functional location
    #[serde(rename = "TPLNR")]
    pub functional_location: &'static str,
    /// Maintenance plant
    #[serde(rename = "SWERK")]
    pub maintenance_plant: &'static str,
    /// Planner group
    #[serde(rename = "INGRP")]
    pub planner_group: &'static str,
    /// Main work center
    #[serde(rename = "GEWRK")]
    pub work_center: &'static str,
    /// Base priority
    #[serde(rename = "PRIOK")]
    pub priority: &'static str,
    /// Fault (damage code) group
    #[serde(rename = "QMGRP")]
    pub fault_group: &'static str,
    /// Fault code
    #[serde(rename = "QMCOD")]
    pub fault_code: &'static str,
}

#[derive(Debug)]
pub struct AdvisoryMetadata {
    pub name: &'static str,
    pub class: Option<&'static str>,
    pub note: Option<&'static str>,
    pub codes: MaintenanceCodes,
    pub tasks: &'static [&'static str],
}

const fn pavement_codes(
    description: &'static str,
    priority: &'static str,
    fault_code: &'static str,
) -> MaintenanceCodes {
    MaintenanceCodes {
        notification_type: "O1",
        description,
        functional_location: "RGA-INF-PAVIM",
        maintenance_plant: "RGA",
        planner_group: "OPE",
        work_center: "ADM_AD",
        priority,
        fault_group: "YB-DERR1",
        fault_code,
    }
}

static SNOW_ALERT: AdvisoryMetadata = AdvisoryMetadata {
    name: "Snow Alert",
    class: None,
    note: None,
    codes: pavement_codes("Snow Alert", "1", "Y115"),
    tasks: &[
        "Activate the full snow removal crew",
        "Apply preventive de-icer on paved surfaces",
        "Stage tractors and snow removal equipment",
        "Prepare urea and glycol stock",
        "Coordinate with the meteorology office",
        "Plan extended staff shifts",
    ],
};

static RAIN_ALERT: AdvisoryMetadata = AdvisoryMetadata {
    name: "Rain Alert",
    class: None,
    note: None,
    codes: pavement_codes("Rain Alert", "2", "Y114"),
    tasks: &[
        "Prepare drainage equipment",
        "Inspect water evacuation systems",
        "Stage sweeping equipment",
        "Monitor standing water accumulation",
        "Assess runway friction conditions",
    ],
};

static THRESHOLD_ALERT: AdvisoryMetadata = AdvisoryMetadata {
    name: "Alert Threshold",
    class: Some("ALERT"),
    note: None,
    codes: pavement_codes("Alert Threshold", "2", "Y110"),
    tasks: &[
        "Monitor weather conditions every 2 hours",
        "Verify runway temperature with the MARWIS sensor",
        "Notify operations staff",
        "Prepare ice and snow control equipment",
        "Review de-icer stock (urea/glycol)",
    ],
};

/// An advisory that survived exclusion, with its static metadata attached.
#[derive(Debug, Clone, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub codes: MaintenanceCodes,
    pub priority: u8,
    pub generated_at: DateTime<Utc>,
    pub tasks: Vec<String>,
}

impl Advisory {
    pub fn new(kind: AdvisoryKind, generated_at: DateTime<Utc>) -> Self {
        let meta = kind.metadata();
        Self {
            kind,
            name: meta.name.to_string(),
            class: meta.class.map(str::to_string),
            note: meta.note.map(str::to_string),
            codes: meta.codes,
            priority: kind.priority(),
            generated_at,
            tasks: kind.tasks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecisionOutcome {
    Accepted,
    Rejected,
    Suppressed { by: AdvisoryKind },
}

/// One line of the per-evaluation decision log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionEntry {
    pub kind: AdvisoryKind,
    pub priority: u8,
    #[serde(flatten)]
    pub outcome: DecisionOutcome,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Ok,
    InvalidInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryOutput {
    pub status: EvaluationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub advisories: Vec<Advisory>,
    pub total: usize,
    pub reading: WeatherReading,
    pub runway_temp_source: RunwayTempSource,
    pub decision_log: Vec<DecisionEntry>,
    pub evaluated_at: DateTime<Utc>,
}

impl AdvisoryOutput {
    pub fn kinds(&self) -> Vec<AdvisoryKind> {
        self.advisories.iter().map(|a| a.kind).collect()
    }

    pub fn is_invalid_input(&self) -> bool {
        self.status == EvaluationStatus::InvalidInput
    }
}
