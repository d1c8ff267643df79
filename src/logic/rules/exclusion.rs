use crate::error::{Result, SnowOpsError};
use crate::logic::audit::AuditSink;
use crate::models::AdvisoryKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which kinds an active kind suppresses. Pure data; the resolver never
/// hard-codes a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionMap {
    rules: BTreeMap<AdvisoryKind, BTreeSet<AdvisoryKind>>,
}

impl ExclusionMap {
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Snow suppresses rain and threshold; rain suppresses threshold.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(
                AdvisoryKind::SnowAlert,
                [AdvisoryKind::RainAlert, AdvisoryKind::ThresholdAlert],
            )
            .with_rule(AdvisoryKind::RainAlert, [AdvisoryKind::ThresholdAlert])
            .with_rule(AdvisoryKind::ThresholdAlert, Vec::<AdvisoryKind>::new())
    }

    pub fn with_rule(
        mut self,
        kind: AdvisoryKind,
        suppresses: impl IntoIterator<Item = AdvisoryKind>,
    ) -> Self {
        self.rules.insert(kind, suppresses.into_iter().collect());
        self
    }

    pub fn suppresses(&self, kind: AdvisoryKind) -> impl Iterator<Item = AdvisoryKind> + '_ {
        self.rules.get(&kind).into_iter().flatten().copied()
    }

    /// Reject maps where a kind suppresses itself.
    pub fn validate(&self) -> Result<()> {
        for (kind, targets) in &self.rules {
            if targets.contains(kind) {
                return Err(SnowOpsError::Config(format!(
                    "exclusion rule for {} suppresses itself",
                    kind.id()
                )));
            }
        }
        Ok(())
    }
}

impl Default for ExclusionMap {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Surviving kinds, most severe first.
    pub accepted: Vec<AdvisoryKind>,
    /// Every suppressed kind and the first accepted kind that suppressed it.
    pub suppressed_by: BTreeMap<AdvisoryKind, AdvisoryKind>,
}

impl Resolution {
    pub fn is_accepted(&self, kind: AdvisoryKind) -> bool {
        self.accepted.contains(&kind)
    }
}

/// Walk kinds by priority, accepting candidates that no accepted kind has
/// already suppressed.
pub fn resolve_exclusions(
    candidates: &BTreeMap<AdvisoryKind, bool>,
    exclusions: &ExclusionMap,
    sink: &mut dyn AuditSink,
) -> Resolution {
    let is_candidate = |kind: AdvisoryKind| candidates.get(&kind).copied().unwrap_or(false);
    let mut resolution = Resolution::default();

    for kind in AdvisoryKind::by_priority() {
        if !is_candidate(kind) {
            sink.debug(format!("{}: not a candidate", kind.id()));
            continue;
        }

        if let Some(by) = resolution.suppressed_by.get(&kind) {
            sink.info(format!(
                "{}: candidate suppressed by {}",
                kind.id(),
                by.id()
            ));
            continue;
        }

        sink.info(format!(
            "{}: accepted (priority {})",
            kind.id(),
            kind.priority()
        ));
        resolution.accepted.push(kind);

        for target in exclusions.suppresses(kind) {
            if resolution.suppressed_by.contains_key(&target)
                || resolution.accepted.contains(&target)
            {
                continue;
            }
            resolution.suppressed_by.insert(target, kind);
            if is_candidate(target) {
                sink.info(format!("{} suppresses {}", kind.id(), target.id()));
            }
        }
    }

    resolution
}
