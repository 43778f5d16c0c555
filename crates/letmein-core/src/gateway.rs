// ── Controller gateway seam ──
//
// The six controller operations the engine depends on. `OnosClient`
// implements them over HTTP; tests substitute an in-memory fake.

use std::future::Future;

use bytes::Bytes;
use serde_json::Value;

use letmein_api::{Error, OnosClient};

use crate::model::{DeviceId, FlowId, InstalledFlow, SwitchDevice, SwitchPort};

/// Read and mutate controller state for one switch.
///
/// Implementations are expected to bound every call with a timeout and
/// report it as an ordinary `Error`.
pub trait ControllerGateway: Send + Sync {
    fn list_devices(&self) -> impl Future<Output = Result<Vec<SwitchDevice>, Error>> + Send;

    fn list_ports(
        &self,
        device: &DeviceId,
    ) -> impl Future<Output = Result<Vec<SwitchPort>, Error>> + Send;

    fn list_flows(
        &self,
        device: &DeviceId,
    ) -> impl Future<Output = Result<Vec<InstalledFlow>, Error>> + Send;

    fn network_configuration(&self) -> impl Future<Output = Result<Value, Error>> + Send;

    fn create_flow(
        &self,
        device: &DeviceId,
        payload: Bytes,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn delete_flow(
        &self,
        device: &DeviceId,
        flow: &FlowId,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

impl ControllerGateway for OnosClient {
    async fn list_devices(&self) -> Result<Vec<SwitchDevice>, Error> {
        let devices = OnosClient::list_devices(self).await?;
        Ok(devices.into_iter().map(SwitchDevice::from).collect())
    }

    async fn list_ports(&self, device: &DeviceId) -> Result<Vec<SwitchPort>, Error> {
        let ports = OnosClient::list_ports(self, device.as_str()).await?;
        Ok(ports.into_iter().map(SwitchPort::from).collect())
    }

    async fn list_flows(&self, device: &DeviceId) -> Result<Vec<InstalledFlow>, Error> {
        let flows = OnosClient::list_flows(self, device.as_str()).await?;
        Ok(flows.into_iter().map(InstalledFlow::from).collect())
    }

    async fn network_configuration(&self) -> Result<Value, Error> {
        OnosClient::network_configuration(self).await
    }

    async fn create_flow(&self, device: &DeviceId, payload: Bytes) -> Result<(), Error> {
        OnosClient::create_flow(self, device.as_str(), payload).await
    }

    async fn delete_flow(&self, device: &DeviceId, flow: &FlowId) -> Result<(), Error> {
        OnosClient::delete_flow(self, device.as_str(), flow.as_str()).await
    }
}
