// Site endpoints
//
// Listing and creation are org-scoped; settings live under `/sites/{id}`.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{NewSite, Site, SiteSetting};

impl Client {
    /// List all sites in the organization.
    ///
    /// `GET /orgs/{org}/sites`
    pub async fn list_sites(&self) -> Result<Vec<Site>, Error> {
        let url = self.org_url("sites")?;
        debug!("listing sites");
        self.get(url).await
    }

    /// Create a site and return it with its server-assigned id.
    ///
    /// `POST /orgs/{org}/sites`
    pub async fn create_site(&self, site: &NewSite) -> Result<Site, Error> {
        let url = self.org_url("sites")?;
        debug!(name = %site.name, "creating site");
        self.post(url, site).await
    }

    /// Replace the variables in a site's settings. The response body is ignored.
    ///
    /// `PUT /sites/{site_id}/setting`
    pub async fn update_site_setting(
        &self,
        site_id: &str,
        setting: &SiteSetting,
    ) -> Result<(), Error> {
        let url = self.url(&format!("sites/{site_id}/setting"))?;
        debug!(site_id, vars = setting.vars.len(), "updating site settings");
        self.put_discard(url, setting).await
    }
}
