// ── Reconciliation error types ──
//
// `SyncError` is the engine's failure taxonomy. Discovery, configuration
// fetch and flow fetch failures abort a cycle before any mutation.
// Render and apply failures are item-local: they are recorded in the
// cycle report and the remaining items proceed.

use serde::Serialize;
use thiserror::Error;

use crate::model::{DeviceId, VlanId};
use crate::render::RenderError;

/// Stable failure classification, used in reports and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    DiscoveryFailed,
    ConfigFetchFailed,
    ConfigExtractionFailed,
    FlowFetchFailed,
    RenderFailed,
    ApplyFailed,
    CycleInFlight,
}

/// Which mutation an `ApplyFailed` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApplyAction {
    Create,
    Delete,
}

/// Unified error type for the reconciliation engine.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Cycle-fatal ─────────────────────────────────────────────────
    #[error("unable to discover {target}: {reason}")]
    DiscoveryFailed {
        target: String,
        reason: String,
        /// Set when the controller itself failed rather than matching nothing.
        #[source]
        source: Option<letmein_api::Error>,
    },

    #[error("unable to read ONOS network configuration: {0}")]
    ConfigFetchFailed(#[source] letmein_api::Error),

    #[error("unable to extract access-device VLANs{}: {reason}", scope.as_deref().map(|d| format!(" from device {d}")).unwrap_or_default())]
    ConfigExtractionFailed {
        /// Device key the failure is scoped to, `None` for the whole document.
        scope: Option<String>,
        reason: String,
    },

    #[error("unable to read flows for switch {device}: {source}")]
    FlowFetchFailed {
        device: DeviceId,
        #[source]
        source: letmein_api::Error,
    },

    // ── Item-local ──────────────────────────────────────────────────
    #[error("unable to render rule for VLAN {vlan}: {source}")]
    RenderFailed {
        vlan: VlanId,
        #[source]
        source: RenderError,
    },

    #[error("unable to {action} {item}: {source}")]
    ApplyFailed {
        action: ApplyAction,
        item: String,
        #[source]
        source: letmein_api::Error,
    },

    // ── Scheduling ──────────────────────────────────────────────────
    #[error("a reconciliation cycle is already running")]
    CycleInFlight,
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DiscoveryFailed { .. } => ErrorKind::DiscoveryFailed,
            Self::ConfigFetchFailed(_) => ErrorKind::ConfigFetchFailed,
            Self::ConfigExtractionFailed { .. } => ErrorKind::ConfigExtractionFailed,
            Self::FlowFetchFailed { .. } => ErrorKind::FlowFetchFailed,
            Self::RenderFailed { .. } => ErrorKind::RenderFailed,
            Self::ApplyFailed { .. } => ErrorKind::ApplyFailed,
            Self::CycleInFlight => ErrorKind::CycleInFlight,
        }
    }

    /// `true` for failures that abort the whole cycle.
    pub fn is_cycle_fatal(&self) -> bool {
        !matches!(
            self,
            Self::RenderFailed { .. }
                | Self::ApplyFailed { .. }
                | Self::ConfigExtractionFailed { scope: Some(_), .. }
        )
    }

    /// The underlying gateway error, if this failure came from the controller.
    pub fn gateway_error(&self) -> Option<&letmein_api::Error> {
        match self {
            Self::DiscoveryFailed { source, .. } => source.as_ref(),
            Self::ConfigFetchFailed(e)
            | Self::FlowFetchFailed { source: e, .. }
            | Self::ApplyFailed { source: e, .. } => Some(e),
            _ => None,
        }
    }
}
