// ── API ↔ domain conversions ──
//
// Maps wire types from sitebuild-api into domain types, and builds
// request bodies from `SiteBuildConfig`.

use sitebuild_api::{AssignmentResult, InventoryDevice, LatLng, NewSite, SiteSetting};

use crate::config::{Coordinates, SiteBuildConfig};
use crate::model::{AssignmentFailure, AssignmentReport, Device, Site};

impl From<sitebuild_api::Site> for Site {
    fn from(s: sitebuild_api::Site) -> Self {
        Self {
            id: s.id,
            name: s.name,
        }
    }
}

impl From<InventoryDevice> for Device {
    fn from(d: InventoryDevice) -> Self {
        Self {
            mac: d.mac,
            serial: d.serial,
            device_type: d.device_type,
            sku: d.sku,
            model: d.model,
        }
    }
}

impl From<AssignmentResult> for AssignmentReport {
    fn from(r: AssignmentResult) -> Self {
        let failed = r
            .failures()
            .map(|(mac, reason)| AssignmentFailure {
                mac: mac.to_owned(),
                reason: reason.to_owned(),
            })
            .collect();

        Self {
            assigned: r.success,
            failed,
        }
    }
}

impl From<Coordinates> for LatLng {
    fn from(c: Coordinates) -> Self {
        Self {
            lat: c.lat,
            lng: c.lng,
        }
    }
}

/// Build the site-creation body: the name plus the gateway and network
/// templates and static settings.
pub fn new_site(name: &str, config: &SiteBuildConfig) -> NewSite {
    NewSite {
        name: name.to_owned(),
        gatewaytemplate_id: config.templates.gateway.clone(),
        networktemplate_id: config.templates.network.clone(),
        timezone: config.site.timezone.clone(),
        country_code: config.site.country_code.clone(),
        address: config.site.address.clone(),
        latlng: config.site.latlng.map(LatLng::from),
    }
}

/// Build the settings body carrying the configured site variables.
pub fn site_setting(config: &SiteBuildConfig) -> SiteSetting {
    SiteSetting {
        vars: config.site.vars.clone(),
    }
}
