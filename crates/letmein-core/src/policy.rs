// ── Desired-VLAN extraction ──
//
// Walks `devices.<id>.accessDevice.vlan` in the ONOS network
// configuration. Each device entry is evaluated on its own: a malformed
// entry is reported and skipped, the others still contribute. Only a
// `devices` member of the wrong type fails the whole extraction.

use tracing::{debug, warn};

use crate::document::{Document, type_name};
use crate::error::SyncError;
use crate::model::{DesiredSet, VlanId};

const DEVICES: &str = "devices";
const ACCESS_DEVICE: &str = "accessDevice";
const VLAN: &str = "vlan";

/// Result of one extraction pass.
#[derive(Debug, Default)]
pub struct Extraction {
    pub desired: DesiredSet,
    /// Per-device failures; every one is a device-scoped
    /// `ConfigExtractionFailed`.
    pub failures: Vec<SyncError>,
}

/// Build the desired VLAN set from a network configuration document.
///
/// A document without `devices` yields an empty set.
pub fn extract_desired_vlans(config: &Document<'_>) -> Result<Extraction, SyncError> {
    let mut extraction = Extraction::default();
    if !config.exists(DEVICES) {
        debug!("network configuration has no devices");
        return Ok(extraction);
    }

    let devices = config
        .children_by_key(DEVICES)
        .map_err(|e| SyncError::ConfigExtractionFailed {
            scope: None,
            reason: e.to_string(),
        })?;

    for (key, device) in devices {
        match device_vlan(&device) {
            Ok(Some(vlan)) => {
                debug!(device = key, %vlan, "access device VLAN");
                extraction.desired.insert(vlan);
            }
            Ok(None) => {}
            Err(reason) => {
                let err = SyncError::ConfigExtractionFailed {
                    scope: Some(key.to_owned()),
                    reason,
                };
                warn!(error = %err, "skipping access device");
                extraction.failures.push(err);
            }
        }
    }

    Ok(extraction)
}

fn device_vlan(device: &Document<'_>) -> Result<Option<VlanId>, String> {
    if !device.value().is_object() {
        return Err(format!("expected object, found {}", type_name(device.value())));
    }
    let Ok(access) = device.get(ACCESS_DEVICE) else {
        return Ok(None);
    };
    if !access.is_object() {
        return Err(format!(
            "expected object at '{ACCESS_DEVICE}', found {}",
            type_name(access)
        ));
    }
    let Ok(value) = Document::new(access).get(VLAN) else {
        return Ok(None);
    };
    VlanId::from_json(value)
        .map(Some)
        .ok_or_else(|| format!("'{ACCESS_DEVICE}.{VLAN}' is not a VLAN id: {value}"))
}
