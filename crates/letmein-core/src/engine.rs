// ── Reconciliation cycle runner ──
//
// `SyncEngine` owns the gateway and the immutable cycle configuration.
// A cycle resolves the switch and port, reads the desired VLANs from the
// network configuration, reads the installed flows and reconciles. Any
// failure before reconciliation aborts the cycle with no mutation.

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::config::SyncConfig;
use crate::document::Document;
use crate::error::SyncError;
use crate::gateway::ControllerGateway;
use crate::policy::extract_desired_vlans;
use crate::reconcile::{self, Target};
use crate::report::CycleReport;
use crate::resolver::{resolve_device, resolve_port};

pub struct SyncEngine<G> {
    gateway: G,
    config: SyncConfig,
    in_flight: Mutex<()>,
}

impl<G: ControllerGateway> SyncEngine<G> {
    pub fn new(gateway: G, config: SyncConfig) -> Self {
        Self {
            gateway,
            config,
            in_flight: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run one reconciliation cycle.
    ///
    /// Returns `SyncError::CycleInFlight` immediately if another cycle is
    /// still running on this engine.
    #[instrument(skip_all, fields(dry_run = self.config.dry_run))]
    pub async fn run_cycle(&self) -> Result<CycleReport, SyncError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            return Err(SyncError::CycleInFlight);
        };
        let started_at = Utc::now();
        let config = &self.config;

        let device = resolve_device(&self.gateway, &config.device).await?;
        let port = resolve_port(&self.gateway, &device, &config.port).await?;

        let netcfg: Value = self
            .gateway
            .network_configuration()
            .await
            .map_err(SyncError::ConfigFetchFailed)?;
        let extraction = extract_desired_vlans(&Document::new(&netcfg))?;
        let mut desired = extraction.desired;
        debug!(vlans = ?desired.vlans().collect::<Vec<_>>(), "need rules for VLANs");

        let installed = self
            .gateway
            .list_flows(&device)
            .await
            .map_err(|source| SyncError::FlowFetchFailed {
                device: device.clone(),
                source,
            })?;
        debug!(%device, flows = installed.len(), "read installed flows");

        let all_desired = desired.vlans().cloned().collect();
        let target = Target {
            device: &device,
            port: &port,
            template: &config.template,
            dry_run: config.dry_run,
        };
        let outcome = reconcile::reconcile(&self.gateway, &target, &mut desired, &installed).await;

        Ok(CycleReport::new(
            device.clone(),
            port.clone(),
            config.dry_run,
            started_at,
            all_desired,
            &extraction.failures,
            outcome,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::config::Selector;
    use crate::error::ErrorKind;
    use crate::gateway::fake::FakeGateway;
    use crate::model::{SwitchDevice, SwitchPort, VlanId};

    const TEMPLATE: &str = r#"{"appId": "{{AppId}}", "selector": {"criteria": [{"type": "VLAN_VID", "vlanId": "{{VlanId}}"}]}}"#;

    fn template() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TEMPLATE.as_bytes()).unwrap();
        file
    }

    fn discovering(template: &tempfile::NamedTempFile) -> SyncConfig {
        SyncConfig {
            device: Selector::Discover,
            port: Selector::Discover,
            template: template.path().to_path_buf(),
            dry_run: false,
        }
    }

    fn switch_gateway() -> FakeGateway {
        FakeGateway {
            devices: Ok(vec![SwitchDevice {
                id: "of:01".into(),
                hw: "Open vSwitch".into(),
                driver: "ovs".into(),
                available: true,
            }]),
            ports: Ok(vec![SwitchPort {
                port: "1".into(),
                enabled: true,
            }]),
            netcfg: Ok(json!({
                "devices": { "olt-1": { "accessDevice": { "vlan": 10 } } }
            })),
            ..FakeGateway::default()
        }
    }

    #[tokio::test]
    async fn cycle_runs_in_order_and_creates() {
        let file = template();
        let engine = SyncEngine::new(switch_gateway(), discovering(&file));
        let report = engine.run_cycle().await.unwrap();

        assert_eq!(report.device.as_str(), "of:01");
        assert_eq!(report.port.as_str(), "1");
        assert_eq!(report.created.iter().map(VlanId::as_str).collect::<Vec<_>>(), ["10"]);
        assert!(!report.has_failures());
        assert_eq!(
            engine.gateway().calls(),
            [
                "list_devices",
                "list_ports of:01",
                "network_configuration",
                "list_flows of:01",
                "create of:01 vlan=10",
            ]
        );

        let again = engine.run_cycle().await.unwrap();
        assert!(again.is_noop());
        assert_eq!(again.skipped.len(), 1);
    }

    #[tokio::test]
    async fn config_fetch_failure_aborts() {
        let file = template();
        let gateway = FakeGateway {
            netcfg: Err(500),
            ..switch_gateway()
        };
        let engine = SyncEngine::new(gateway, discovering(&file));
        let err = engine.run_cycle().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigFetchFailed);
        assert!(engine.gateway().mutations().is_empty());
    }

    #[tokio::test]
    async fn flow_fetch_failure_aborts() {
        let file = template();
        let gateway = FakeGateway {
            flows_status: Some(503),
            ..switch_gateway()
        };
        let engine = SyncEngine::new(gateway, discovering(&file));
        let err = engine.run_cycle().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FlowFetchFailed);
        assert!(engine.gateway().mutations().is_empty());
    }

    #[tokio::test]
    async fn extraction_failures_are_reported_not_fatal() {
        let file = template();
        let gateway = FakeGateway {
            netcfg: Ok(json!({
                "devices": {
                    "olt-1": { "accessDevice": { "vlan": 10 } },
                    "olt-2": { "accessDevice": { "vlan": false } },
                }
            })),
            ..switch_gateway()
        };
        let engine = SyncEngine::new(gateway, discovering(&file));
        let report = engine.run_cycle().await.unwrap();
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].kind, ErrorKind::ConfigExtractionFailed);
        assert_eq!(report.failed[0].item, "device olt-2");
    }

    #[tokio::test]
    async fn overlapping_cycle_is_rejected() {
        let file = template();
        let engine = SyncEngine::new(switch_gateway(), discovering(&file));
        let guard = engine.in_flight.try_lock().unwrap();
        let err = engine.run_cycle().await.unwrap_err();
        assert!(matches!(err, SyncError::CycleInFlight));
        drop(guard);
        assert!(engine.run_cycle().await.is_ok());
    }
}
