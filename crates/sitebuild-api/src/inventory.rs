// Inventory endpoints
//
// Reading the unassigned pool and bulk assignment to a site.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{AssignRequest, AssignmentResult, InventoryDevice};

impl Client {
    /// List inventory devices not assigned to any site.
    ///
    /// `GET /orgs/{org}/inventory?unassigned=true`
    pub async fn list_unassigned_devices(&self) -> Result<Vec<InventoryDevice>, Error> {
        let mut url = self.org_url("inventory")?;
        url.query_pairs_mut().append_pair("unassigned", "true");
        debug!("listing unassigned inventory");
        self.get(url).await
    }

    /// Assign devices to a site by MAC.
    ///
    /// `PUT /orgs/{org}/inventory` with `op: "assign"`. The service reports
    /// per-MAC success and failure; a partial failure is not an `Err`.
    pub async fn assign_devices(
        &self,
        site_id: &str,
        macs: &[String],
    ) -> Result<AssignmentResult, Error> {
        let url = self.org_url("inventory")?;
        debug!(site_id, count = macs.len(), "assigning devices");
        self.put(url, &AssignRequest::assign(site_id, macs)).await
    }
}
