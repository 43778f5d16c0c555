//! Settings resolution for the CLI: load the layered settings, then apply
//! global flag overrides on top.
//!
//! Core never sees these types; it receives a `SyncConfig` and a gateway.

use letmein_api::OnosClient;
use letmein_config::{Settings, load_settings};
use letmein_core::SyncEngine;

use crate::cli::{GlobalOpts, LogFormatArg};
use crate::error::CliError;

/// Load settings and apply CLI overrides.
pub fn resolve_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut settings = load_settings(global.config.as_deref())?;

    if let Some(url) = &global.onos_url {
        settings.onos_connect_url.clone_from(url);
    }
    if let Some(dpid) = &global.dpid {
        settings.ovs_dpid.clone_from(dpid);
    }
    if let Some(port) = &global.port {
        settings.ovs_port.clone_from(port);
    }
    if let Some(template) = &global.template {
        settings.create_flow_template.clone_from(template);
    }
    if global.verify {
        settings.verify = true;
    }
    if let Some(format) = global.log_format {
        settings.log_format = match format {
            LogFormatArg::Text => "text",
            LogFormatArg::Json => "json",
        }
        .into();
    }

    settings.validate()?;
    Ok(settings)
}

/// Build the ONOS client and engine. `force_dry_run` is set by `plan`.
pub fn build_engine(
    settings: &Settings,
    force_dry_run: bool,
) -> Result<SyncEngine<OnosClient>, CliError> {
    let client = settings.client_settings()?;
    let onos = OnosClient::new(&client.connect_url, client.credentials, &client.transport)?;

    let mut sync = settings.to_sync_config()?;
    sync.dry_run |= force_dry_run;

    tracing::debug!(
        url = %onos.base_url(),
        user = onos.username().unwrap_or("-"),
        device = %sync.device,
        port = %sync.port,
        dry_run = sync.dry_run,
        "built reconciliation engine"
    );
    Ok(SyncEngine::new(onos, sync))
}
