// ── Domain types ──
//
// What the workflow reasons about, decoupled from the wire shapes in
// sitebuild-api. Conversions live in `convert.rs`.

use serde::Serialize;

use crate::mac::MacAddress;

/// A site in the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub id: String,
    pub name: String,
}

/// An unassigned inventory device.
///
/// `mac` is kept exactly as the service reported it; use
/// [`Device::normalized_mac`] for comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub mac: String,
    pub serial: Option<String>,
    pub device_type: Option<String>,
    pub sku: Option<String>,
    pub model: Option<String>,
}

impl Device {
    /// Canonical MAC, or `None` if the inventory value is not a MAC.
    pub fn normalized_mac(&self) -> Option<MacAddress> {
        MacAddress::parse(&self.mac).ok()
    }
}

/// One device the service refused to assign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentFailure {
    pub mac: String,
    pub reason: String,
}

/// Outcome of an assignment call as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentReport {
    pub assigned: Vec<String>,
    pub failed: Vec<AssignmentFailure>,
}

impl AssignmentReport {
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
