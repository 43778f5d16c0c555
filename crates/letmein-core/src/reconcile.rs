// ── Flow reconciliation ──
//
// Diff installed flows against the desired VLAN set, then apply the
// difference. Only flows owned by `com.ciena` are considered; every other
// flow on the switch is invisible here. Apply is best effort: each delete
// and create succeeds or fails on its own.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::APP_ID;
use crate::error::{ApplyAction, SyncError};
use crate::gateway::ControllerGateway;
use crate::model::{DesiredSet, DeviceId, FlowId, InstalledFlow, PortId, VlanId};
use crate::render::{self, RuleData, RuleTemplate};

/// Changes needed to bring the switch in line with the desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub to_create: BTreeSet<VlanId>,
    pub to_delete: BTreeSet<FlowId>,
    /// Desired VLANs an owned flow already matches.
    pub satisfied: BTreeSet<VlanId>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// Where and how a plan is applied.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub device: &'a DeviceId,
    pub port: &'a PortId,
    pub template: &'a Path,
    pub dry_run: bool,
}

/// What applying a plan actually did.
#[derive(Debug, Default)]
pub struct Outcome {
    pub plan: ReconciliationPlan,
    /// VLANs created, or in dry-run the VLANs whose payload rendered and
    /// validated.
    pub created: BTreeSet<VlanId>,
    /// Flows deleted, or in dry-run the flows that would be.
    pub deleted: BTreeSet<FlowId>,
    /// Parsed create payloads, dry-run only.
    pub previews: BTreeMap<VlanId, Value>,
    /// `RenderFailed` and `ApplyFailed` items.
    pub failures: Vec<SyncError>,
}

/// Mark and create phases.
///
/// Flags every desired VLAN matched by an owned flow as satisfied, and
/// schedules every owned flow with a VLAN criterion outside the desired
/// set for deletion. A flow carrying several VLAN criteria is judged per
/// criterion, so it can satisfy one VLAN and still be deleted for another.
pub fn plan(desired: &mut DesiredSet, installed: &[InstalledFlow]) -> ReconciliationPlan {
    let mut plan = ReconciliationPlan::default();

    for flow in installed.iter().filter(|f| f.is_owned_by(APP_ID)) {
        for vlan in flow.vlan_matches() {
            if desired.mark_satisfied(vlan) {
                continue;
            }
            if plan.to_delete.insert(flow.id.clone()) {
                info!(%vlan, flow = %flow.id, "[DELETE] VLAN rule");
            }
        }
    }

    for vlan in desired.satisfied() {
        debug!(%vlan, "[EXISTS] VLAN rule");
        plan.satisfied.insert(vlan.clone());
    }
    for vlan in desired.unsatisfied() {
        info!(%vlan, "[CREATE] VLAN rule");
        plan.to_create.insert(vlan.clone());
    }

    plan
}

/// Apply phase. Deletes run first, then creates.
///
/// In dry-run nothing is sent to the controller; payloads are still
/// rendered and must parse as JSON to count as created.
pub async fn apply<G: ControllerGateway>(
    gateway: &G,
    target: &Target<'_>,
    plan: ReconciliationPlan,
) -> Outcome {
    let mut outcome = Outcome::default();

    for flow in &plan.to_delete {
        if target.dry_run {
            outcome.deleted.insert(flow.clone());
            continue;
        }
        match gateway.delete_flow(target.device, flow).await {
            Ok(()) => {
                outcome.deleted.insert(flow.clone());
            }
            Err(source) => {
                let err = SyncError::ApplyFailed {
                    action: ApplyAction::Delete,
                    item: flow.to_string(),
                    source,
                };
                warn!(error = %err, "flow delete failed");
                outcome.failures.push(err);
            }
        }
    }

    if !plan.to_create.is_empty() {
        let template = RuleTemplate::load(target.template);
        for vlan in &plan.to_create {
            let payload = template.as_ref().map_err(Clone::clone).and_then(|t| {
                t.render(&RuleData {
                    app_id: APP_ID,
                    dpid: target.device,
                    vlan_id: vlan,
                    in_port: target.port,
                })
            });
            let payload = payload.and_then(|body| {
                if target.dry_run {
                    render::validate(&body).map(|preview| (body, Some(preview)))
                } else {
                    Ok((body, None))
                }
            });
            let (body, preview) = match payload {
                Ok(rendered) => rendered,
                Err(source) => {
                    let err = SyncError::RenderFailed {
                        vlan: vlan.clone(),
                        source,
                    };
                    warn!(error = %err, "skipping VLAN rule");
                    outcome.failures.push(err);
                    continue;
                }
            };

            if let Some(preview) = preview {
                info!(%vlan, payload = %preview, "dry-run create payload");
                outcome.previews.insert(vlan.clone(), preview);
                outcome.created.insert(vlan.clone());
                continue;
            }

            match gateway.create_flow(target.device, body).await {
                Ok(()) => {
                    outcome.created.insert(vlan.clone());
                }
                Err(source) => {
                    let err = SyncError::ApplyFailed {
                        action: ApplyAction::Create,
                        item: format!("VLAN {vlan} rule"),
                        source,
                    };
                    warn!(error = %err, "flow create failed");
                    outcome.failures.push(err);
                }
            }
        }
    }

    outcome.plan = plan;
    outcome
}

/// Plan and apply in one step.
pub async fn reconcile<G: ControllerGateway>(
    gateway: &G,
    target: &Target<'_>,
    desired: &mut DesiredSet,
    installed: &[InstalledFlow],
) -> Outcome {
    let plan = plan(desired, installed);
    apply(gateway, target, plan).await
}
