// Template endpoints
//
// A site is bound to a WLAN template by listing its id in the template's
// `applies.site_ids`, so attaching is a read-modify-write of that scope.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Template, TemplateApplies, TemplateUpdate};

impl Client {
    /// Fetch one template.
    ///
    /// `GET /orgs/{org}/templates/{template_id}`
    pub async fn get_template(&self, template_id: &str) -> Result<Template, Error> {
        let url = self.org_url(&format!("templates/{template_id}"))?;
        debug!(template_id, "fetching template");
        self.get(url).await
    }

    /// Replace the template's `applies` scope. The response body is ignored.
    ///
    /// `PUT /orgs/{org}/templates/{template_id}`
    pub async fn update_template_applies(
        &self,
        template_id: &str,
        applies: &TemplateApplies,
    ) -> Result<(), Error> {
        let url = self.org_url(&format!("templates/{template_id}"))?;
        debug!(template_id, sites = applies.site_ids.len(), "updating template scope");
        self.put_discard(url, &TemplateUpdate { applies }).await
    }
}
