//! Reconciliation engine for the letmein OVS flow manager.
//!
//! Keeps the VLAN flow rules that the `com.ciena` application owns on an
//! Open vSwitch device in line with the access-device VLANs configured in
//! ONOS. One reconciliation cycle is:
//!
//! 1. **Resolve** ([`resolver`]) the switch and ingress port, either fixed
//!    identifiers or discovered from the controller's device/port lists.
//! 2. **Extract** ([`policy`]) the desired VLAN set from the network
//!    configuration document, walked through the typed [`Document`] accessor.
//! 3. **Diff** ([`reconcile`]) installed flows against the desired set into
//!    a [`ReconciliationPlan`].
//! 4. **Apply** the plan: render create payloads from the rule template
//!    ([`render`]) and issue creates/deletes, best effort per item.
//!
//! [`SyncEngine`] runs one cycle at a time against any
//! [`ControllerGateway`]; [`Scheduler`] drives it on a fixed interval.

pub mod config;
pub mod convert;
pub mod document;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod model;
pub mod policy;
pub mod reconcile;
pub mod render;
pub mod report;
pub mod resolver;
pub mod scheduler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{APP_ID, DISCOVER, Selector, SyncConfig};
pub use document::{Document, DocumentError};
pub use engine::SyncEngine;
pub use error::{ErrorKind, SyncError};
pub use gateway::ControllerGateway;
pub use model::{
    Criterion, DesiredSet, DeviceId, FlowId, InstalledFlow, PortId, SwitchDevice, SwitchPort,
    VlanId,
};
pub use reconcile::ReconciliationPlan;
pub use render::{RenderError, RuleData, RuleTemplate};
pub use report::{CycleReport, ItemFailure};
pub use scheduler::{Scheduler, SchedulerSummary};
