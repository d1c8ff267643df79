use super::{
    exclusion::{resolve_exclusions, ExclusionMap},
    rain_alert::RainAlertRule,
    snow_alert::SnowAlertRule,
    threshold_alert::ThresholdAlertRule,
    Candidate, CandidateRule,
};
use crate::datasources::RunwaySensor;
use crate::logic::audit::AuditSink;
use crate::logic::normalize::normalize_reading;
use crate::models::{
    Advisory, AdvisoryKind, AdvisoryOutput, DecisionEntry, DecisionOutcome, EvaluationStatus,
    RawReading, WeatherReading,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub const INVALID_INPUT_MARKER: &str =
    "invalid input: ambient temperature missing, unparseable or outside [-100, 100] °C";

pub struct AdvisoryEngine {
    rules: Vec<Box<dyn CandidateRule>>,
    exclusions: ExclusionMap,
}

impl AdvisoryEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn CandidateRule>> = vec![
            Box::new(SnowAlertRule),
            Box::new(RainAlertRule),
            Box::new(ThresholdAlertRule),
        ];

        Self {
            rules,
            exclusions: ExclusionMap::standard(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionMap) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn exclusions(&self) -> &ExclusionMap {
        &self.exclusions
    }

    /// Run the full pipeline on a raw reading.
    pub fn evaluate(
        &self,
        raw: &RawReading,
        sensor: &dyn RunwaySensor,
        sink: &mut dyn AuditSink,
    ) -> AdvisoryOutput {
        self.evaluate_at(raw, sensor, sink, Utc::now())
    }

    /// Same as [`AdvisoryEngine::evaluate`] with an explicit clock.
    pub fn evaluate_at(
        &self,
        raw: &RawReading,
        sensor: &dyn RunwaySensor,
        sink: &mut dyn AuditSink,
        now: DateTime<Utc>,
    ) -> AdvisoryOutput {
        sink.info("starting advisory evaluation".to_string());
        let reading = normalize_reading(raw, sensor, sink);
        self.evaluate_reading(reading, sink, now)
    }

    /// Evaluate an already-normalized reading.
    pub fn evaluate_reading(
        &self,
        reading: WeatherReading,
        sink: &mut dyn AuditSink,
        now: DateTime<Utc>,
    ) -> AdvisoryOutput {
        let runway_temp_source = reading.runway_temp_source;

        if !reading.is_valid() {
            sink.warn(INVALID_INPUT_MARKER.to_string());
            return AdvisoryOutput {
                status: EvaluationStatus::InvalidInput,
                error: Some(INVALID_INPUT_MARKER.to_string()),
                advisories: Vec::new(),
                total: 0,
                reading,
                runway_temp_source,
                decision_log: Vec::new(),
                evaluated_at: now,
            };
        }

        let candidates: BTreeMap<AdvisoryKind, Candidate> = self
            .candidates(&reading)
            .into_iter()
            .map(|c| (c.kind, c))
            .collect();

        for candidate in candidates.values() {
            sink.info(format!(
                "{}: candidate={} ({})",
                candidate.kind.id(),
                candidate.eligible,
                candidate.reason
            ));
        }

        let eligibility: BTreeMap<AdvisoryKind, bool> =
            candidates.iter().map(|(k, c)| (*k, c.eligible)).collect();
        let resolution = resolve_exclusions(&eligibility, &self.exclusions, sink);

        let decision_log = AdvisoryKind::by_priority()
            .into_iter()
            .map(|kind| decision_for(kind, candidates.get(&kind), &resolution))
            .collect();

        let advisories: Vec<Advisory> = resolution
            .accepted
            .iter()
            .map(|kind| Advisory::new(*kind, now))
            .collect();

        sink.info(format!(
            "evaluation complete: {} advisories",
            advisories.len()
        ));

        AdvisoryOutput {
            status: EvaluationStatus::Ok,
            error: None,
            total: advisories.len(),
            advisories,
            reading,
            runway_temp_source,
            decision_log,
            evaluated_at: now,
        }
    }

    /// Candidacy for every registered rule, most severe first. Never
    /// consults exclusion state.
    pub fn candidates(&self, reading: &WeatherReading) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> =
            self.rules.iter().map(|rule| rule.evaluate(reading)).collect();
        candidates.sort_by_key(|c| c.kind.priority());
        candidates
    }

    pub fn list_rules(&self) -> Vec<(AdvisoryKind, &'static str)> {
        self.rules
            .iter()
            .map(|r| (r.kind(), r.kind().metadata().name))
            .collect()
    }
}

impl Default for AdvisoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn decision_for(
    kind: AdvisoryKind,
    candidate: Option<&Candidate>,
    resolution: &super::Resolution,
) -> DecisionEntry {
    let (outcome, reason) = match candidate {
        None => (DecisionOutcome::Rejected, "no rule registered".to_string()),
        Some(c) if !c.eligible => (DecisionOutcome::Rejected, c.reason.clone()),
        Some(c) if resolution.is_accepted(kind) => (DecisionOutcome::Accepted, c.reason.clone()),
        Some(c) => match resolution.suppressed_by.get(&kind) {
            Some(by) => (
                DecisionOutcome::Suppressed { by: *by },
                format!("suppressed by {} ({})", by.id(), c.reason),
            ),
            None => (DecisionOutcome::Rejected, c.reason.clone()),
        },
    };

    DecisionEntry {
        kind,
        priority: kind.priority(),
        outcome,
        reason,
    }
}
