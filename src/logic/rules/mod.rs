pub mod engine;
pub mod exclusion;
pub mod rain_alert;
pub mod snow_alert;
pub mod tables;
pub mod threshold_alert;

pub use engine::AdvisoryEngine;
pub use exclusion::{ExclusionMap, Resolution};

use crate::models::{AdvisoryKind, WeatherReading};
use serde::Serialize;
use tables::EvaluationResult;

/// Forecast probability (percent) at or above which rain and snow alerts fire.
pub const PRECIPITATION_THRESHOLD: f64 = 70.0;

/// Whether one advisory kind is a candidate for a reading, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub kind: AdvisoryKind,
    pub eligible: bool,
    pub reason: String,
    pub table: EvaluationResult,
}

/// Candidacy rule for one advisory kind.
///
/// Rules are pure and never look at other kinds; exclusion happens later.
pub trait CandidateRule: Send + Sync {
    fn kind(&self) -> AdvisoryKind;

    fn evaluate(&self, reading: &WeatherReading) -> Candidate;
}

/// Shared shape of the rain and snow rules: table B, then the forecast
/// probability threshold.
fn precipitation_candidate(
    kind: AdvisoryKind,
    table: EvaluationResult,
    label: &str,
    probability: f64,
) -> Candidate {
    if !table.satisfied {
        return Candidate {
            kind,
            eligible: false,
            reason: table.reason.clone(),
            table,
        };
    }

    if probability >= PRECIPITATION_THRESHOLD {
        Candidate {
            kind,
            eligible: true,
            reason: format!(
                "{}; {} probability {}% meets {}% threshold",
                table.reason, label, probability, PRECIPITATION_THRESHOLD
            ),
            table,
        }
    } else {
        Candidate {
            kind,
            eligible: false,
            reason: format!(
                "{} probability {}% below {}% threshold",
                label, probability, PRECIPITATION_THRESHOLD
            ),
            table,
        }
    }
}
