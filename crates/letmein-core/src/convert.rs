// ── API-to-domain type conversions ──
//
// Bridges raw `letmein_api::models` response types into the engine's
// domain records. VLAN tags are normalized here, so the diff only ever
// compares `VlanId`s.

use tracing::warn;

use letmein_api::models::{FlowCriterion, OnosDevice, OnosFlow, OnosPort, VlanTag};

use crate::config::VLAN_CRITERION;
use crate::model::{Criterion, InstalledFlow, SwitchDevice, SwitchPort, VlanId};

impl From<OnosDevice> for SwitchDevice {
    fn from(d: OnosDevice) -> Self {
        Self {
            id: d.id.into(),
            hw: d.hw,
            driver: d.driver,
            available: d.available,
        }
    }
}

impl From<OnosPort> for SwitchPort {
    fn from(p: OnosPort) -> Self {
        Self {
            port: p.port.into(),
            enabled: p.is_enabled,
        }
    }
}

/// Normalize an ONOS VLAN tag; `None` for negative or fractional numbers.
pub fn normalize_tag(tag: &VlanTag) -> Option<VlanId> {
    match tag {
        VlanTag::Numeric(n) => VlanId::from_number(n),
        VlanTag::Named(s) => Some(VlanId::new(s.as_str())),
    }
}

fn convert_criterion(flow_id: &str, c: FlowCriterion) -> Criterion {
    let vlan = c.vlan_id.as_ref().and_then(normalize_tag);

    // A VLAN criterion we cannot read is neither a match nor a mismatch:
    // the flow must not be deleted on its account.
    if c.criterion_type == VLAN_CRITERION && vlan.is_none() {
        warn!(
            flow_id,
            vlan = ?c.vlan_id,
            "ignoring VLAN criterion with unreadable VLAN id"
        );
    }

    Criterion {
        kind: c.criterion_type,
        vlan,
    }
}

impl From<OnosFlow> for InstalledFlow {
    fn from(f: OnosFlow) -> Self {
        let criteria = f
            .selector
            .criteria
            .into_iter()
            .map(|c| convert_criterion(&f.id, c))
            .collect();

        Self {
            id: f.id.into(),
            app_id: f.app_id,
            criteria,
        }
    }
}
