// Request and response types for the site and inventory endpoints.
//
// Response structs use `#[serde(default)]` on optional fields and keep
// unknown fields in `extra`, since the service returns far more than we
// read and omits fields freely.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Sites ────────────────────────────────────────────────────────────

/// Site object from `GET /orgs/{org}/sites` and `POST /orgs/{org}/sites`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub org_id: Option<String>,
    /// Catch-all for fields we do not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Geographic coordinates of a site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Body of `POST /orgs/{org}/sites`.
///
/// Unset fields are omitted so the service applies its own defaults. WLAN
/// templates are not set here; a site joins one through the template's
/// `applies` list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSite {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gatewaytemplate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networktemplate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latlng: Option<LatLng>,
}

/// Body of `PUT /sites/{site_id}/setting`. Only site variables are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteSetting {
    pub vars: BTreeMap<String, String>,
}

// ── Templates ────────────────────────────────────────────────────────

/// Template from `GET /orgs/{org}/templates/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub applies: TemplateApplies,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Scope a template applies to.
///
/// Only `site_ids` is edited; every other scope key (`org_id`,
/// `sitegroup_ids`, ...) is sent back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateApplies {
    #[serde(default)]
    pub site_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TemplateApplies {
    /// Add `site_id` to the scope. Returns `false` if it was already there.
    pub fn add_site(&mut self, site_id: &str) -> bool {
        if self.site_ids.iter().any(|id| id == site_id) {
            return false;
        }
        self.site_ids.push(site_id.to_owned());
        true
    }
}

/// Body of `PUT /orgs/{org}/templates/{id}` when only the scope changes.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateUpdate<'a> {
    pub applies: &'a TemplateApplies,
}

// ── Inventory ────────────────────────────────────────────────────────

/// Device from `GET /orgs/{org}/inventory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryDevice {
    pub mac: String,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Operation selector for `PUT /orgs/{org}/inventory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryOp {
    Assign,
}

/// Body of `PUT /orgs/{org}/inventory`.
#[derive(Debug, Clone, Serialize)]
pub struct AssignRequest<'a> {
    pub op: InventoryOp,
    pub site_id: &'a str,
    pub macs: &'a [String],
    pub managed: bool,
    pub disable_auto_config: bool,
}

impl<'a> AssignRequest<'a> {
    /// Assign `macs` to `site_id` as managed devices, keeping auto-config on.
    pub fn assign(site_id: &'a str, macs: &'a [String]) -> Self {
        Self {
            op: InventoryOp::Assign,
            site_id,
            macs,
            managed: true,
            disable_auto_config: false,
        }
    }
}

/// Response of an inventory assignment.
///
/// `error[i]` is the MAC that failed and `reason[i]` why.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentResult {
    #[serde(default)]
    pub op: Option<String>,
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
    #[serde(default)]
    pub reason: Vec<String>,
}

impl AssignmentResult {
    /// Pair each failed MAC with its reason. Missing reasons come back empty.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.error.iter().enumerate().map(|(i, mac)| {
            let reason = self.reason.get(i).map_or("", String::as_str);
            (mac.as_str(), reason)
        })
    }
}
