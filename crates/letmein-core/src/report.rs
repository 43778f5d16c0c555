// ── Cycle report ──
//
// Structured result of one reconciliation cycle. Lets a caller tell
// "nothing needed to change" apart from "an attempt failed".

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{ErrorKind, SyncError};
use crate::model::{DeviceId, FlowId, PortId, VlanId};
use crate::reconcile::Outcome;

/// One item that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub kind: ErrorKind,
    pub item: String,
    pub message: String,
}

impl From<&SyncError> for ItemFailure {
    fn from(err: &SyncError) -> Self {
        let item = match err {
            SyncError::RenderFailed { vlan, .. } => format!("VLAN {vlan} rule"),
            SyncError::ApplyFailed { item, .. } => item.clone(),
            SyncError::ConfigExtractionFailed {
                scope: Some(device),
                ..
            } => format!("device {device}"),
            SyncError::FlowFetchFailed { device, .. } => format!("switch {device}"),
            _ => String::new(),
        };
        Self {
            kind: err.kind(),
            item,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub device: DeviceId,
    pub port: PortId,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Every VLAN found in the network configuration.
    pub desired: BTreeSet<VlanId>,
    pub created: BTreeSet<VlanId>,
    pub deleted: BTreeSet<FlowId>,
    /// Desired VLANs that already had a rule.
    pub skipped: BTreeSet<VlanId>,
    pub failed: Vec<ItemFailure>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub previews: BTreeMap<VlanId, Value>,
}

impl CycleReport {
    pub(crate) fn new(
        device: DeviceId,
        port: PortId,
        dry_run: bool,
        started_at: DateTime<Utc>,
        desired: BTreeSet<VlanId>,
        extraction_failures: &[SyncError],
        outcome: Outcome,
    ) -> Self {
        let failed = extraction_failures
            .iter()
            .chain(&outcome.failures)
            .map(ItemFailure::from)
            .collect();
        Self {
            device,
            port,
            dry_run,
            started_at,
            finished_at: Utc::now(),
            desired,
            created: outcome.created,
            deleted: outcome.deleted,
            skipped: outcome.plan.satisfied,
            failed,
            previews: outcome.previews,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// `true` when the switch already matched and nothing failed.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty() && !self.has_failures()
    }

    /// Emit a one-line summary at a level matching the outcome.
    pub fn log(&self) {
        let elapsed_ms = (self.finished_at - self.started_at).num_milliseconds();
        if self.has_failures() {
            warn!(
                device = %self.device,
                created = self.created.len(),
                deleted = self.deleted.len(),
                failed = self.failed.len(),
                elapsed_ms,
                "reconciliation cycle finished with failures"
            );
        } else {
            info!(
                device = %self.device,
                port = %self.port,
                desired = self.desired.len(),
                created = self.created.len(),
                deleted = self.deleted.len(),
                skipped = self.skipped.len(),
                dry_run = self.dry_run,
                elapsed_ms,
                "reconciliation cycle finished"
            );
        }
    }
}

/// Log a cycle-fatal error.
pub fn log_cycle_error(err: &SyncError) {
    match err {
        SyncError::CycleInFlight => warn!("{err}"),
        _ => error!(kind = %err.kind(), error = %err, "reconciliation cycle aborted"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ApplyAction;

    #[test]
    fn failure_items_name_the_subject() {
        let err = SyncError::ApplyFailed {
            action: ApplyAction::Delete,
            item: "flow-7".into(),
            source: crate::gateway::fake::status(500),
        };
        let failure = ItemFailure::from(&err);
        assert_eq!(failure.kind, ErrorKind::ApplyFailed);
        assert_eq!(failure.item, "flow-7");
        assert!(failure.message.starts_with("unable to delete flow-7"));

        let err = SyncError::ConfigExtractionFailed {
            scope: Some("of:01".into()),
            reason: "bad".into(),
        };
        assert_eq!(ItemFailure::from(&err).item, "device of:01");
    }

    #[test]
    fn serializes_kinds_in_snake_case() {
        let report = CycleReport::new(
            "of:01".into(),
            "2".into(),
            false,
            Utc::now(),
            BTreeSet::new(),
            &[SyncError::ConfigExtractionFailed {
                scope: Some("of:02".into()),
                reason: "bad".into(),
            }],
            Outcome::default(),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"][0]["kind"], "config_extraction_failed");
        assert_eq!(json["device"], "of:01");
        assert!(json.get("previews").is_none());
        assert!(report.has_failures());
        assert!(!report.is_noop());
    }
}
