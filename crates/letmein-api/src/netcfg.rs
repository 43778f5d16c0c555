// Network configuration endpoint.
//
// The document is heterogeneous (apps, devices, ports, links, each with
// app-defined subtrees), so it is returned as an untyped JSON value and
// walked by the core's document accessor.

use tracing::debug;

use crate::client::OnosClient;
use crate::error::Error;

impl OnosClient {
    /// Fetch the full network configuration document.
    ///
    /// `GET /onos/v1/network/configuration`
    pub async fn network_configuration(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url(&["network", "configuration"])?;
        debug!("fetching network configuration");
        self.get_json(url).await
    }
}
