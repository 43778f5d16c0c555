// Flow rule endpoints: list, create, delete.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::client::OnosClient;
use crate::error::Error;
use crate::models::{FlowsResponse, OnosFlow};

impl OnosClient {
    /// List all flow rules installed on a device.
    ///
    /// `GET /onos/v1/flows/{device_id}`
    pub async fn list_flows(&self, device_id: &str) -> Result<Vec<OnosFlow>, Error> {
        let url = self.api_url(&["flows", device_id])?;
        debug!(device_id, "listing flows");
        let resp: FlowsResponse = self.get_json(url).await?;
        Ok(resp.flows)
    }

    /// Install a flow rule from a pre-rendered JSON body.
    ///
    /// `POST /onos/v1/flows/{device_id}`. The body is sent verbatim.
    pub async fn create_flow(&self, device_id: &str, payload: Bytes) -> Result<(), Error> {
        let url = self.api_url(&["flows", device_id])?;
        debug!("POST {url}");

        let resp = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        Self::success_body(resp).await?;
        Ok(())
    }

    /// Remove a flow rule.
    ///
    /// `DELETE /onos/v1/flows/{device_id}/{flow_id}`
    pub async fn delete_flow(&self, device_id: &str, flow_id: &str) -> Result<(), Error> {
        let url = self.api_url(&["flows", device_id, flow_id])?;
        debug!("DELETE {url}");

        let resp = self.request(Method::DELETE, url).send().await?;
        Self::success_body(resp).await?;
        Ok(())
    }
}
