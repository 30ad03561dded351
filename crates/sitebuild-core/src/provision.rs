// ── Provisioning workflow ──
//
// One run: pick a site name, create the site, apply variables, then move
// selected devices out of the unassigned inventory into the new site.
// Every step is awaited in order and the first error ends the run; no
// step is retried and nothing already created is rolled back.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};

use sitebuild_api::{NewSite, SiteSetting};
use tracing::{debug, info, warn};

use crate::config::SiteBuildConfig;
use crate::convert;
use crate::error::CoreError;
use crate::mac::{MacAddress, validate_macs};
use crate::model::{AssignmentReport, Device, Site};
use crate::source::{DEFAULT_DEVICES_FILE, DeviceSource, resolve_device_list};

// ── Seams ────────────────────────────────────────────────────────────

/// Remote operations the workflow needs.
///
/// Implemented for [`sitebuild_api::Client`] in `remote.rs`.
pub trait SiteBuildApi {
    fn list_sites(&self) -> impl Future<Output = Result<Vec<Site>, CoreError>> + Send;

    fn create_site(&self, site: &NewSite) -> impl Future<Output = Result<Site, CoreError>> + Send;

    fn update_site_setting(
        &self,
        site_id: &str,
        setting: &SiteSetting,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Add `site_id` to the scope of template `template_id`.
    fn attach_site_to_template(
        &self,
        template_id: &str,
        site_id: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn list_unassigned_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    fn assign_devices(
        &self,
        site_id: &str,
        macs: &[String],
    ) -> impl Future<Output = Result<AssignmentReport, CoreError>> + Send;
}

/// Progress notifications emitted while a run advances.
#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    CheckingSiteName { name: &'a str },
    CreatingSite { name: &'a str },
    SiteCreated { site: &'a Site },
    AttachingWlanTemplate { template_id: &'a str },
    ApplyingVariables { count: usize },
    FetchingInventory,
    ReadingDevicesFile { path: &'a Path },
    Assigning { site: &'a Site, count: usize },
}

/// The person (or script) driving the run.
pub trait Operator {
    /// Name for the new site.
    fn site_name(&mut self) -> Result<String, CoreError>;

    /// Raw comma-separated MAC list, chosen from `unassigned`.
    fn choose_devices(&mut self, unassigned: &[Device]) -> Result<String, CoreError>;

    fn step(&mut self, _step: Step<'_>) {}
}

// ── Outcome ──────────────────────────────────────────────────────────

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Site created; inventory had nothing unassigned.
    NoUnassignedDevices { site: Site },
    /// Site created; the device list was empty after validation.
    NothingToAssign { site: Site, source: DeviceSource },
    /// Site created; a requested device is not in the unassigned inventory,
    /// so nothing was assigned.
    DeviceNotInInventory { site: Site, mac: MacAddress },
    /// Assignment call made; the report holds per-device results.
    Assigned {
        site: Site,
        source: DeviceSource,
        requested: Vec<MacAddress>,
        report: AssignmentReport,
    },
}

impl ProvisionOutcome {
    pub fn site(&self) -> &Site {
        match self {
            Self::NoUnassignedDevices { site }
            | Self::NothingToAssign { site, .. }
            | Self::DeviceNotInInventory { site, .. }
            | Self::Assigned { site, .. } => site,
        }
    }
}

// ── Provisioner ──────────────────────────────────────────────────────

/// Runs the provisioning workflow against a [`SiteBuildApi`].
pub struct Provisioner<'a, A> {
    api: &'a A,
    config: &'a SiteBuildConfig,
    devices_file: PathBuf,
}

impl<'a, A: SiteBuildApi + Sync> Provisioner<'a, A> {
    pub fn new(api: &'a A, config: &'a SiteBuildConfig) -> Self {
        Self {
            api,
            config,
            devices_file: PathBuf::from(DEFAULT_DEVICES_FILE),
        }
    }

    /// Read device MACs from `path` instead of `./devices.txt`.
    pub fn with_devices_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.devices_file = path.into();
        self
    }

    /// Execute the full workflow.
    pub async fn run<O: Operator + Send>(
        &self,
        operator: &mut O,
    ) -> Result<ProvisionOutcome, CoreError> {
        let name = operator.site_name()?;
        let site = self.create_site(&name, operator).await?;
        self.apply_variables(&site, operator).await?;

        operator.step(Step::FetchingInventory);
        let unassigned = self.api.list_unassigned_devices().await?;
        if unassigned.is_empty() {
            info!(site = %site.name, "no unassigned devices in inventory");
            return Ok(ProvisionOutcome::NoUnassignedDevices { site });
        }
        debug!(count = unassigned.len(), "unassigned devices");

        let (source, raw) = resolve_device_list(&self.devices_file, &unassigned, operator)?;
        let requested = validate_macs(&raw)?;
        if requested.is_empty() {
            info!(site = %site.name, "device list is empty");
            return Ok(ProvisionOutcome::NothingToAssign { site, source });
        }

        if let Some(mac) = first_missing(&requested, &unassigned) {
            warn!(%mac, "device does not exist in unassigned inventory");
            return Ok(ProvisionOutcome::DeviceNotInInventory { site, mac });
        }

        operator.step(Step::Assigning {
            site: &site,
            count: requested.len(),
        });
        let macs: Vec<String> = requested.iter().map(ToString::to_string).collect();
        let report = self.api.assign_devices(&site.id, &macs).await?;
        info!(
            site = %site.name,
            assigned = report.assigned_count(),
            failed = report.failed.len(),
            "assignment finished"
        );

        Ok(ProvisionOutcome::Assigned {
            site,
            source,
            requested,
            report,
        })
    }

    /// Create the site unless one with the same name exists, then attach it
    /// to the configured WLAN template.
    ///
    /// The name is trimmed; the existing-name check is exact and
    /// case-sensitive.
    pub async fn create_site<O: Operator + Send>(
        &self,
        name: &str,
        operator: &mut O,
    ) -> Result<Site, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidSiteName);
        }

        operator.step(Step::CheckingSiteName { name });
        let existing = self.api.list_sites().await?;
        if existing.iter().any(|s| s.name == name) {
            return Err(CoreError::SiteExists { name: name.into() });
        }

        operator.step(Step::CreatingSite { name });
        let site = self
            .api
            .create_site(&convert::new_site(name, self.config))
            .await?;
        info!(id = %site.id, name = %site.name, "site created");
        operator.step(Step::SiteCreated { site: &site });

        if let Some(template_id) = self.config.templates.wlan.as_deref() {
            operator.step(Step::AttachingWlanTemplate { template_id });
            self.api
                .attach_site_to_template(template_id, &site.id)
                .await?;
        }

        Ok(site)
    }

    /// Push configured site variables. No call is made when there are none.
    pub async fn apply_variables<O: Operator + Send>(
        &self,
        site: &Site,
        operator: &mut O,
    ) -> Result<(), CoreError> {
        let count = self.config.site.vars.len();
        if count == 0 {
            debug!("no site variables configured");
            return Ok(());
        }

        operator.step(Step::ApplyingVariables { count });
        self.api
            .update_site_setting(&site.id, &convert::site_setting(self.config))
            .await
    }
}

/// First requested MAC absent from the unassigned inventory.
fn first_missing(requested: &[MacAddress], unassigned: &[Device]) -> Option<MacAddress> {
    let available: HashSet<MacAddress> = unassigned
        .iter()
        .filter_map(Device::normalized_mac)
        .collect();

    requested
        .iter()
        .find(|mac| !available.contains(*mac))
        .cloned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::future::ready;
    use std::sync::Mutex;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::*;
    use crate::config::{SiteSettings, TemplateIds, TlsVerification};
    use crate::model::AssignmentFailure;

    // ── Fakes ───────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        ListSites,
        CreateSite(String),
        UpdateSetting(String, BTreeMap<String, String>),
        AttachTemplate(String, String),
        ListUnassigned,
        Assign(String, Vec<String>),
    }

    struct FakeApi {
        sites: Vec<Site>,
        unassigned: Vec<Device>,
        report: AssignmentReport,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeApi {
        fn new(sites: Vec<Site>, unassigned: Vec<Device>) -> Self {
            Self {
                sites,
                unassigned,
                report: AssignmentReport::default(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn assigned(&self) -> bool {
            self.calls()
                .iter()
                .any(|c| matches!(c, Call::Assign(..)))
        }
    }

    impl SiteBuildApi for FakeApi {
        fn list_sites(&self) -> impl Future<Output = Result<Vec<Site>, CoreError>> + Send {
            self.record(Call::ListSites);
            ready(Ok(self.sites.clone()))
        }

        fn create_site(
            &self,
            site: &NewSite,
        ) -> impl Future<Output = Result<Site, CoreError>> + Send {
            self.record(Call::CreateSite(site.name.clone()));
            ready(Ok(Site {
                id: "site-new".into(),
                name: site.name.clone(),
            }))
        }

        fn update_site_setting(
            &self,
            site_id: &str,
            setting: &SiteSetting,
        ) -> impl Future<Output = Result<(), CoreError>> + Send {
            self.record(Call::UpdateSetting(site_id.into(), setting.vars.clone()));
            ready(Ok(()))
        }

        fn attach_site_to_template(
            &self,
            template_id: &str,
            site_id: &str,
        ) -> impl Future<Output = Result<(), CoreError>> + Send {
            self.record(Call::AttachTemplate(template_id.into(), site_id.into()));
            ready(Ok(()))
        }

        fn list_unassigned_devices(
            &self,
        ) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send {
            self.record(Call::ListUnassigned);
            ready(Ok(self.unassigned.clone()))
        }

        fn assign_devices(
            &self,
            site_id: &str,
            macs: &[String],
        ) -> impl Future<Output = Result<AssignmentReport, CoreError>> + Send {
            self.record(Call::Assign(site_id.into(), macs.to_vec()));
            ready(Ok(self.report.clone()))
        }
    }

    struct FakeOperator {
        name: String,
        devices: String,
        prompted: bool,
    }

    impl FakeOperator {
        fn new(name: &str, devices: &str) -> Self {
            Self {
                name: name.into(),
                devices: devices.into(),
                prompted: false,
            }
        }
    }

    impl Operator for FakeOperator {
        fn site_name(&mut self) -> Result<String, CoreError> {
            Ok(self.name.clone())
        }

        fn choose_devices(&mut self, _unassigned: &[Device]) -> Result<String, CoreError> {
            self.prompted = true;
            Ok(self.devices.clone())
        }
    }

    // ── Fixtures ────────────────────────────────────────────────────

    fn config(vars: &[(&str, &str)]) -> SiteBuildConfig {
        SiteBuildConfig {
            base_url: "https://api.example.com/api/v1".parse().unwrap(),
            org_id: "org-1".into(),
            token: SecretString::from("token".to_owned()),
            templates: TemplateIds::default(),
            site: SiteSettings {
                vars: vars
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect(),
                ..SiteSettings::default()
            },
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(5),
        }
    }

    fn site(id: &str, name: &str) -> Site {
        Site {
            id: id.into(),
            name: name.into(),
        }
    }

    fn device(mac: &str) -> Device {
        Device {
            mac: mac.into(),
            serial: Some(format!("SN-{mac}")),
            device_type: Some("ap".into()),
            sku: Some("AP43-US".into()),
            model: None,
        }
    }

    /// Devices file path that does not exist, forcing the prompt.
    fn no_file() -> PathBuf {
        PathBuf::from("/nonexistent/sitebuild/devices.txt")
    }

    // ── Tests ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn duplicate_site_name_never_creates() {
        let api = FakeApi::new(vec![site("s1", "HQ")], vec![device("aabbccddeeff")]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("HQ", "aabbccddeeff");

        let err = Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::SiteExists { ref name } if name == "HQ"));
        assert_eq!(api.calls(), vec![Call::ListSites]);
    }

    #[tokio::test]
    async fn site_name_match_is_case_sensitive() {
        let api = FakeApi::new(vec![site("s1", "hq")], vec![]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("HQ", "");

        let outcome = Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap();

        assert_eq!(outcome.site().name, "HQ");
        assert!(api.calls().contains(&Call::CreateSite("HQ".into())));
    }

    #[tokio::test]
    async fn blank_site_name_is_rejected_before_any_call() {
        let api = FakeApi::new(vec![], vec![]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("   ", "");

        let err = Provisioner::new(&api, &cfg).run(&mut operator).await.unwrap_err();

        assert!(matches!(err, CoreError::InvalidSiteName));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_vars_skip_setting_update() {
        let api = FakeApi::new(vec![], vec![device("aabbccddeeff")]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("Branch", "aa:bb:cc:dd:ee:ff");

        Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap();

        assert!(
            !api.calls()
                .iter()
                .any(|c| matches!(c, Call::UpdateSetting(..)))
        );
    }

    #[tokio::test]
    async fn vars_applied_to_new_site() {
        let api = FakeApi::new(vec![], vec![]);
        let cfg = config(&[("SITE_VLAN", "30")]);
        let mut operator = FakeOperator::new("Branch", "");

        Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap();

        let mut vars = BTreeMap::new();
        vars.insert("SITE_VLAN".to_owned(), "30".to_owned());
        assert_eq!(
            api.calls(),
            vec![
                Call::ListSites,
                Call::CreateSite("Branch".into()),
                Call::UpdateSetting("site-new".into(), vars),
                Call::ListUnassigned,
            ]
        );
    }

    #[tokio::test]
    async fn wlan_template_attached_after_create() {
        let api = FakeApi::new(vec![], vec![]);
        let mut cfg = config(&[("SITE_VLAN", "30")]);
        cfg.templates.wlan = Some("wt-1".into());
        let mut operator = FakeOperator::new("Branch", "");

        Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap();

        let calls = api.calls();
        assert_eq!(
            calls.get(..3),
            Some(
                &[
                    Call::ListSites,
                    Call::CreateSite("Branch".into()),
                    Call::AttachTemplate("wt-1".into(), "site-new".into()),
                ][..]
            )
        );
        assert!(matches!(calls.get(3), Some(Call::UpdateSetting(..))));
    }

    #[tokio::test]
    async fn no_wlan_template_means_no_attach() {
        let api = FakeApi::new(vec![], vec![]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("Branch", "");

        Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap();

        assert!(
            !api.calls()
                .iter()
                .any(|c| matches!(c, Call::AttachTemplate(..)))
        );
    }

    #[tokio::test]
    async fn empty_inventory_stops_before_collecting_macs() {
        let api = FakeApi::new(vec![], vec![]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("Branch", "aabbccddeeff");

        let outcome = Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ProvisionOutcome::NoUnassignedDevices {
                site: site("site-new", "Branch")
            }
        );
        assert!(!operator.prompted);
        assert!(!api.assigned());
    }

    #[tokio::test]
    async fn unknown_mac_blocks_assignment() {
        let api = FakeApi::new(vec![], vec![device("aabbccddeeff")]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("Branch", "aabbccddeeff,112233445566");

        let outcome = Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ProvisionOutcome::DeviceNotInInventory {
                site: site("site-new", "Branch"),
                mac: MacAddress::parse("112233445566").unwrap(),
            }
        );
        assert!(!api.assigned());
    }

    #[tokio::test]
    async fn invalid_mac_aborts_before_assignment() {
        let api = FakeApi::new(vec![], vec![device("aabbccddeeff")]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("Branch", "aabbccddeeff,zz:bb:cc:dd:ee:ff");

        let err = Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(!api.assigned());
    }

    #[tokio::test]
    async fn assigns_deduplicated_macs_in_order() {
        let mut api = FakeApi::new(
            vec![site("s1", "HQ")],
            vec![device("AA:BB:CC:DD:EE:FF"), device("112233445566")],
        );
        api.report = AssignmentReport {
            assigned: vec!["aabbccddeeff".into()],
            failed: vec![AssignmentFailure {
                mac: "112233445566".into(),
                reason: "already claimed".into(),
            }],
        };
        let cfg = config(&[]);
        let mut operator =
            FakeOperator::new("Branch", "AA:BB:CC:DD:EE:FF, aabbccddeeff,11:22:33:44:55:66");

        let outcome = Provisioner::new(&api, &cfg)
            .with_devices_file(no_file())
            .run(&mut operator)
            .await
            .unwrap();

        assert!(operator.prompted);
        assert_eq!(
            api.calls().last(),
            Some(&Call::Assign(
                "site-new".into(),
                vec!["aabbccddeeff".into(), "112233445566".into()]
            ))
        );
        match outcome {
            ProvisionOutcome::Assigned {
                source,
                requested,
                report,
                ..
            } => {
                assert_eq!(source, DeviceSource::Prompt);
                assert_eq!(requested.len(), 2);
                assert_eq!(report.assigned_count(), 1);
                assert!(report.has_failures());
            }
            other => panic!("expected Assigned, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn devices_file_is_used_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.txt");
        std::fs::write(&path, "aa:bb:cc:dd:ee:ff\n").unwrap();

        let api = FakeApi::new(vec![], vec![device("aabbccddeeff")]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("Branch", "ignored");

        let outcome = Provisioner::new(&api, &cfg)
            .with_devices_file(&path)
            .run(&mut operator)
            .await
            .unwrap();

        assert!(!operator.prompted);
        assert!(matches!(
            outcome,
            ProvisionOutcome::Assigned { source: DeviceSource::File(ref p), .. } if *p == path
        ));
    }

    #[tokio::test]
    async fn empty_devices_file_assigns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.txt");
        std::fs::write(&path, "").unwrap();

        let api = FakeApi::new(vec![], vec![device("aabbccddeeff")]);
        let cfg = config(&[]);
        let mut operator = FakeOperator::new("Branch", "");

        let outcome = Provisioner::new(&api, &cfg)
            .with_devices_file(&path)
            .run(&mut operator)
            .await
            .unwrap();

        assert!(matches!(outcome, ProvisionOutcome::NothingToAssign { .. }));
        assert!(!api.assigned());
    }
}
