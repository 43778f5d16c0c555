// ── Device / port resolution ──
//
// Turns configured selectors into concrete identifiers. A fixed selector
// is returned as-is without touching the controller. The discovery
// sentinel picks the first matching entry in controller order; there is
// no tie-break when several entries match.

use tracing::{debug, info};

use crate::config::{LOCAL_PORT, SWITCH_DRIVER, SWITCH_HW, Selector};
use crate::error::SyncError;
use crate::gateway::ControllerGateway;
use crate::model::{DeviceId, PortId, SwitchDevice, SwitchPort};

/// An available Open vSwitch device driven by the `ovs` driver.
pub fn is_managed_switch(device: &SwitchDevice) -> bool {
    device.hw == SWITCH_HW && device.driver == SWITCH_DRIVER && device.available
}

/// An enabled port other than the reserved `local` port.
pub fn is_ingress_candidate(port: &SwitchPort) -> bool {
    port.enabled && port.port.as_str() != LOCAL_PORT
}

/// Resolve the switch to manage.
pub async fn resolve_device<G: ControllerGateway>(
    gateway: &G,
    selector: &Selector,
) -> Result<DeviceId, SyncError> {
    let Selector::Fixed(id) = selector else {
        let devices = gateway
            .list_devices()
            .await
            .map_err(|e| SyncError::DiscoveryFailed {
                target: "OVS switch".into(),
                reason: e.to_string(),
                source: Some(e),
            })?;
        debug!(candidates = devices.len(), "discovering OVS switch");

        let device = devices
            .into_iter()
            .find(is_managed_switch)
            .ok_or_else(|| SyncError::DiscoveryFailed {
                target: "OVS switch".into(),
                reason: format!(
                    "no available device with hw '{SWITCH_HW}' and driver '{SWITCH_DRIVER}'; specify the DPID"
                ),
                source: None,
            })?;
        info!(device = %device.id, "discovered OVS switch");
        return Ok(device.id);
    };
    Ok(DeviceId::new(id.as_str()))
}

/// Resolve the ingress port on `device`.
pub async fn resolve_port<G: ControllerGateway>(
    gateway: &G,
    device: &DeviceId,
    selector: &Selector,
) -> Result<PortId, SyncError> {
    let Selector::Fixed(port) = selector else {
        let target = format!("port on switch {device}");
        let ports = gateway
            .list_ports(device)
            .await
            .map_err(|e| SyncError::DiscoveryFailed {
                target: target.clone(),
                reason: e.to_string(),
                source: Some(e),
            })?;
        debug!(%device, candidates = ports.len(), "discovering ingress port");

        let port = ports
            .into_iter()
            .find(is_ingress_candidate)
            .ok_or_else(|| SyncError::DiscoveryFailed {
                target,
                reason: "no enabled non-local port".into(),
                source: None,
            })?;
        info!(%device, port = %port.port, "discovered ingress port");
        return Ok(port.port);
    };
    Ok(PortId::new(port.as_str()))
}
