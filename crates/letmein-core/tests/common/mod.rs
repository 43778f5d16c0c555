//! In-memory ONOS stand-in for engine-level tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use serde_json::Value;

use letmein_api::Error;
use letmein_core::{
    ControllerGateway, Criterion, DeviceId, FlowId, InstalledFlow, Selector, SwitchDevice,
    SwitchPort, SyncConfig, VlanId,
};

pub const TEMPLATE: &str = r#"{
  "appId": "{{AppId}}",
  "deviceId": "{{DPID}}",
  "priority": 1000,
  "isPermanent": true,
  "selector": {
    "criteria": [
      { "type": "IN_PORT", "port": "{{InPort}}" },
      { "type": "VLAN_VID", "vlanId": "{{VlanId}}" }
    ]
  }
}"#;

pub fn template_file(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

pub fn fixed_config(template: &tempfile::NamedTempFile, dry_run: bool) -> SyncConfig {
    SyncConfig {
        device: Selector::Fixed("of:0000000000000001".into()),
        port: Selector::Fixed("2".into()),
        template: template.path().to_path_buf(),
        dry_run,
    }
}

pub fn owned_flow(id: &str, vlan: &str) -> InstalledFlow {
    flow(id, "com.ciena", vlan)
}

pub fn flow(id: &str, app: &str, vlan: &str) -> InstalledFlow {
    InstalledFlow {
        id: id.into(),
        app_id: Some(app.into()),
        criteria: vec![Criterion::other("IN_PORT"), Criterion::vlan(vlan)],
    }
}

pub fn ovs(id: &str) -> SwitchDevice {
    SwitchDevice {
        id: id.into(),
        hw: "Open vSwitch".into(),
        driver: "ovs".into(),
        available: true,
    }
}

fn status(code: u16) -> Error {
    Error::Status {
        status: code,
        url: "memory://onos".into(),
        body: String::new(),
    }
}

/// Records every mutation and keeps created flows so a following cycle
/// sees them.
pub struct MemoryController {
    pub devices: Vec<SwitchDevice>,
    pub ports: Vec<SwitchPort>,
    pub netcfg: Value,
    pub flows: Mutex<Vec<InstalledFlow>>,
    pub reject_vlans: BTreeSet<String>,
    pub mutations: Mutex<Vec<String>>,
    next_id: AtomicU64,
}

impl MemoryController {
    pub fn new(netcfg: Value) -> Self {
        Self {
            devices: Vec::new(),
            ports: vec![SwitchPort {
                port: "2".into(),
                enabled: true,
            }],
            netcfg,
            flows: Mutex::new(Vec::new()),
            reject_vlans: BTreeSet::new(),
            mutations: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_flows(self, flows: impl IntoIterator<Item = InstalledFlow>) -> Self {
        self.flows.lock().unwrap().extend(flows);
        self
    }

    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn flow_ids(&self) -> BTreeSet<String> {
        self.flows
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.id.to_string())
            .collect()
    }
}

impl ControllerGateway for MemoryController {
    async fn list_devices(&self) -> Result<Vec<SwitchDevice>, Error> {
        Ok(self.devices.clone())
    }

    async fn list_ports(&self, _device: &DeviceId) -> Result<Vec<SwitchPort>, Error> {
        Ok(self.ports.clone())
    }

    async fn list_flows(&self, _device: &DeviceId) -> Result<Vec<InstalledFlow>, Error> {
        Ok(self.flows.lock().unwrap().clone())
    }

    async fn network_configuration(&self) -> Result<Value, Error> {
        Ok(self.netcfg.clone())
    }

    async fn create_flow(&self, _device: &DeviceId, payload: Bytes) -> Result<(), Error> {
        let body: Value = serde_json::from_slice(&payload).unwrap();
        let vlan = body["selector"]["criteria"][1]["vlanId"]
            .as_str()
            .unwrap()
            .to_owned();
        self.mutations.lock().unwrap().push(format!("create {vlan}"));
        if self.reject_vlans.contains(&vlan) {
            return Err(status(400));
        }

        let id = format!("auto-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.flows.lock().unwrap().push(InstalledFlow {
            id: id.into(),
            app_id: body["appId"].as_str().map(str::to_owned),
            criteria: vec![Criterion::other("IN_PORT"), Criterion::vlan(VlanId::new(vlan))],
        });
        Ok(())
    }

    async fn delete_flow(&self, _device: &DeviceId, flow: &FlowId) -> Result<(), Error> {
        self.mutations.lock().unwrap().push(format!("delete {flow}"));
        self.flows.lock().unwrap().retain(|f| &f.id != flow);
        Ok(())
    }
}
