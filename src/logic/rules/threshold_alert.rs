use super::tables::TABLE_A;
use super::{Candidate, CandidateRule};
use crate::models::{AdvisoryKind, WeatherReading};

/// Threshold alert - mild air over a frozen runway
///
/// Conditions (table A):
/// - 3 < ambient <= 6 °C
/// - dew point within 3 °C of ambient
/// - runway below 0 °C
/// - humidity >= 56%
/// - wind < 36 km/h
pub struct ThresholdAlertRule;

impl CandidateRule for ThresholdAlertRule {
    fn kind(&self) -> AdvisoryKind {
        AdvisoryKind::ThresholdAlert
    }

    fn evaluate(&self, reading: &WeatherReading) -> Candidate {
        let table = TABLE_A.evaluate(reading);
        Candidate {
            kind: self.kind(),
            eligible: table.satisfied,
            reason: table.reason.clone(),
            table,
        }
    }
}
