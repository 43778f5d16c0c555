// ── Per-cycle reconciliation configuration ──
//
// An immutable value describing *what* to reconcile. Selectors name the
// switch and ingress port; the template path and dry-run flag drive apply.
// The binary builds it from settings and hands it to `SyncEngine`;
// core never reads config files or the environment.

use std::fmt;
use std::path::PathBuf;

/// Application identifier stamped on (and used to recognise) our flows.
pub const APP_ID: &str = "com.ciena";

/// Selector value requesting discovery instead of a fixed identifier.
pub const DISCOVER: &str = ":discover";

/// Hardware description a discovered switch must report.
pub const SWITCH_HW: &str = "Open vSwitch";

/// Driver name a discovered switch must report.
pub const SWITCH_DRIVER: &str = "ovs";

/// Reserved port name never chosen as ingress.
pub const LOCAL_PORT: &str = "local";

/// Criterion type carrying a VLAN match.
pub const VLAN_CRITERION: &str = "VLAN_VID";

/// Default rule template location.
pub const DEFAULT_TEMPLATE: &str = "/var/templates/create.tmpl";

/// Default switch DPID.
pub const DEFAULT_DPID: &str = "of:00000800276f723f";

/// A device or port selector: a concrete identifier or the discovery
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Discover,
    Fixed(String),
}

impl Selector {
    /// Parse a configured selector. [`DISCOVER`] requests discovery,
    /// anything else is taken verbatim.
    pub fn parse(raw: &str) -> Self {
        if raw == DISCOVER {
            Self::Discover
        } else {
            Self::Fixed(raw.to_owned())
        }
    }

    pub fn is_discover(&self) -> bool {
        matches!(self, Self::Discover)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discover => f.write_str(DISCOVER),
            Self::Fixed(id) => f.write_str(id),
        }
    }
}

impl From<&str> for Selector {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Configuration for one reconciliation cycle.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Switch to manage.
    pub device: Selector,
    /// Ingress port stamped into created rules.
    pub port: Selector,
    /// Rule template, re-read on every cycle.
    pub template: PathBuf,
    /// Compute and report the plan without mutating the controller.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            device: Selector::Fixed(DEFAULT_DPID.into()),
            port: Selector::Discover,
            template: PathBuf::from(DEFAULT_TEMPLATE),
            dry_run: false,
        }
    }
}
