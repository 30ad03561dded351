// ── Remote service binding ──
//
// Builds the HTTP client from `SiteBuildConfig` and implements the
// workflow's `SiteBuildApi` seam on top of it.

use sitebuild_api::{Client, NewSite, SiteSetting, TlsMode, TransportConfig};
use tracing::debug;

use crate::config::{SiteBuildConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{AssignmentReport, Device, Site};
use crate::provision::SiteBuildApi;

/// Build an authenticated client for the configured organization.
pub fn connect(config: &SiteBuildConfig) -> Result<Client, CoreError> {
    let transport = TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        },
        timeout: config.timeout,
    };

    debug!(base_url = %config.base_url, org = %config.org_id, "building API client");
    let client = Client::new(
        config.base_url.clone(),
        config.org_id.clone(),
        &config.token,
        &transport,
    )?;
    Ok(client)
}

impl SiteBuildApi for Client {
    async fn list_sites(&self) -> Result<Vec<Site>, CoreError> {
        let sites = Client::list_sites(self).await?;
        Ok(sites.into_iter().map(Site::from).collect())
    }

    async fn create_site(&self, site: &NewSite) -> Result<Site, CoreError> {
        Ok(Client::create_site(self, site).await?.into())
    }

    async fn update_site_setting(
        &self,
        site_id: &str,
        setting: &SiteSetting,
    ) -> Result<(), CoreError> {
        Ok(Client::update_site_setting(self, site_id, setting).await?)
    }

    async fn attach_site_to_template(
        &self,
        template_id: &str,
        site_id: &str,
    ) -> Result<(), CoreError> {
        let mut template = self.get_template(template_id).await?;
        if !template.applies.add_site(site_id) {
            debug!(template_id, site_id, "site already in template scope");
            return Ok(());
        }
        debug!(template = %template.name, site_id, "adding site to template");
        Ok(self
            .update_template_applies(template_id, &template.applies)
            .await?)
    }

    async fn list_unassigned_devices(&self) -> Result<Vec<Device>, CoreError> {
        let devices = Client::list_unassigned_devices(self).await?;
        Ok(devices.into_iter().map(Device::from).collect())
    }

    async fn assign_devices(
        &self,
        site_id: &str,
        macs: &[String],
    ) -> Result<AssignmentReport, CoreError> {
        Ok(Client::assign_devices(self, site_id, macs).await?.into())
    }
}
