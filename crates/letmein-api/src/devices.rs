// Device and port discovery endpoints.

use tracing::debug;

use crate::client::OnosClient;
use crate::error::Error;
use crate::models::{DevicesResponse, OnosDevice, OnosPort, PortsResponse};

impl OnosClient {
    /// List every device known to ONOS, in controller order.
    ///
    /// `GET /onos/v1/devices`
    pub async fn list_devices(&self) -> Result<Vec<OnosDevice>, Error> {
        let url = self.api_url(&["devices"])?;
        debug!("listing devices");
        let resp: DevicesResponse = self.get_json(url).await?;
        Ok(resp.devices)
    }

    /// List the ports of a device, in controller order.
    ///
    /// `GET /onos/v1/devices/{device_id}/ports`
    pub async fn list_ports(&self, device_id: &str) -> Result<Vec<OnosPort>, Error> {
        let url = self.api_url(&["devices", device_id, "ports"])?;
        debug!(device_id, "listing ports");
        let resp: PortsResponse = self.get_json(url).await?;
        Ok(resp.ports)
    }
}
