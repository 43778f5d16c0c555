// ONOS REST response types
//
// Models for the subset of the ONOS northbound API the flow manager reads.
// Fields use `#[serde(default)]` liberally because field presence varies
// across ONOS releases and drivers. Unknown fields land in `extra`.

use serde::{Deserialize, Serialize};

// ── Devices ──────────────────────────────────────────────────────────

/// `GET /onos/v1/devices` envelope.
#[derive(Debug, Deserialize)]
pub struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<OnosDevice>,
}

/// A device (switch) known to ONOS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnosDevice {
    pub id: String,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub mfr: Option<String>,
    /// Hardware description, e.g. `"Open vSwitch"`.
    #[serde(default)]
    pub hw: String,
    #[serde(default)]
    pub sw: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    /// Driver name, e.g. `"ovs"`.
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub chassis_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Ports ────────────────────────────────────────────────────────────

/// `GET /onos/v1/devices/{id}/ports` envelope.
#[derive(Debug, Deserialize)]
pub struct PortsResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub ports: Vec<OnosPort>,
}

/// A port on an ONOS device. `port` is the port number as a string, or
/// the reserved name `"local"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnosPort {
    #[serde(default)]
    pub element: Option<String>,
    pub port: String,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default, rename = "type")]
    pub port_type: Option<String>,
    #[serde(default)]
    pub port_speed: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Flows ────────────────────────────────────────────────────────────

/// `GET /onos/v1/flows/{deviceId}` envelope.
#[derive(Debug, Deserialize)]
pub struct FlowsResponse {
    #[serde(default)]
    pub flows: Vec<OnosFlow>,
}

/// An installed flow rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnosFlow {
    pub id: String,
    /// Owning application, e.g. `"com.ciena"`. Absent on some core flows.
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub is_permanent: Option<bool>,
    #[serde(default)]
    pub selector: FlowSelector,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Match portion of a flow rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowSelector {
    #[serde(default)]
    pub criteria: Vec<FlowCriterion>,
}

/// A single match criterion. Only `VLAN_VID` criteria carry `vlanId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowCriterion {
    #[serde(rename = "type")]
    pub criterion_type: String,
    #[serde(default)]
    pub vlan_id: Option<VlanTag>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A VLAN identifier as ONOS reports it: usually a JSON number, sometimes
/// a string (e.g. `"ANY"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VlanTag {
    Numeric(serde_json::Number),
    Named(String),
}
