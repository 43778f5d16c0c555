// ── Reconciliation domain types ──
//
// Identifiers, the controller-side records the engine reads, and the
// per-cycle desired VLAN set. Everything here is rebuilt every cycle.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::VLAN_CRITERION;

// ── Identifiers ─────────────────────────────────────────────────────

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

string_id!(
    /// Controller device identifier (DPID), e.g. `of:00000800276f723f`.
    DeviceId
);
string_id!(
    /// Port identifier on a device, e.g. `"1"`.
    PortId
);
string_id!(
    /// Opaque controller-assigned flow rule identifier.
    FlowId
);
string_id!(
    /// Normalized VLAN identifier.
    ///
    /// Numeric tags are held in their decimal string form so that `6` and
    /// `"6"` compare equal; string identifiers pass through unchanged.
    VlanId
);

impl VlanId {
    /// Normalize a JSON number. Only non-negative integral values are
    /// VLAN tags; `6.0` is accepted as `"6"`.
    pub fn from_number(number: &serde_json::Number) -> Option<Self> {
        if let Some(n) = number.as_u64() {
            return Some(Self(n.to_string()));
        }
        if number.is_i64() {
            return None;
        }
        let f = number.as_f64()?;
        if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= 9_007_199_254_740_992.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
            let n = f as u64;
            Some(Self(n.to_string()))
        } else {
            None
        }
    }

    /// Normalize a JSON value: numbers via [`from_number`](Self::from_number),
    /// strings verbatim, anything else rejected.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => Self::from_number(n),
            serde_json::Value::String(s) => Some(Self(s.clone())),
            _ => None,
        }
    }
}

// ── Controller records ──────────────────────────────────────────────

/// A device as reported by the controller's device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchDevice {
    pub id: DeviceId,
    /// Hardware description.
    pub hw: String,
    pub driver: String,
    pub available: bool,
}

/// A port as reported by the controller's port list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchPort {
    pub port: PortId,
    pub enabled: bool,
}

/// One match criterion of an installed flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub kind: String,
    /// Present only on VLAN criteria whose tag could be normalized.
    pub vlan: Option<VlanId>,
}

impl Criterion {
    /// A `VLAN_VID` criterion matching `vlan`.
    pub fn vlan(vlan: impl Into<VlanId>) -> Self {
        Self {
            kind: VLAN_CRITERION.into(),
            vlan: Some(vlan.into()),
        }
    }

    /// A criterion of any other type.
    pub fn other(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            vlan: None,
        }
    }
}

/// A flow rule currently installed on the switch. Owned by the
/// controller; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledFlow {
    pub id: FlowId,
    pub app_id: Option<String>,
    pub criteria: Vec<Criterion>,
}

impl InstalledFlow {
    pub fn is_owned_by(&self, app_id: &str) -> bool {
        self.app_id.as_deref() == Some(app_id)
    }

    /// VLANs matched by this flow's `VLAN_VID` criteria, in criterion order.
    pub fn vlan_matches(&self) -> impl Iterator<Item = &VlanId> {
        self.criteria
            .iter()
            .filter(|c| c.kind == VLAN_CRITERION)
            .filter_map(|c| c.vlan.as_ref())
    }
}

// ── Desired state ───────────────────────────────────────────────────

/// VLANs that need a rule, each with a "satisfied" flag.
///
/// Entries start unsatisfied; the mark phase flips the flag when an owned
/// flow already matches the VLAN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredSet {
    entries: BTreeMap<VlanId, bool>,
}

impl DesiredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a VLAN. Returns `false` if it was already present; its flag is
    /// left untouched in that case.
    pub fn insert(&mut self, vlan: VlanId) -> bool {
        let mut added = false;
        self.entries.entry(vlan).or_insert_with(|| {
            added = true;
            false
        });
        added
    }

    pub fn contains(&self, vlan: &VlanId) -> bool {
        self.entries.contains_key(vlan)
    }

    /// Mark `vlan` satisfied. Returns `false` if it is not desired.
    pub fn mark_satisfied(&mut self, vlan: &VlanId) -> bool {
        match self.entries.get_mut(vlan) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        }
    }

    /// `Some(flag)` for desired VLANs, `None` otherwise.
    pub fn is_satisfied(&self, vlan: &VlanId) -> Option<bool> {
        self.entries.get(vlan).copied()
    }

    pub fn vlans(&self) -> impl Iterator<Item = &VlanId> {
        self.entries.keys()
    }

    pub fn satisfied(&self) -> impl Iterator<Item = &VlanId> {
        self.entries.iter().filter(|(_, s)| **s).map(|(v, _)| v)
    }

    pub fn unsatisfied(&self) -> impl Iterator<Item = &VlanId> {
        self.entries.iter().filter(|(_, s)| !**s).map(|(v, _)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<VlanId> for DesiredSet {
    fn from_iter<I: IntoIterator<Item = VlanId>>(iter: I) -> Self {
        let mut set = Self::new();
        for vlan in iter {
            set.insert(vlan);
        }
        set
    }
}
