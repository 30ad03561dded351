// ── Runtime provisioning configuration ──
//
// What to connect to and what to build. Carries the token and site
// settings but never touches disk: sitebuild-config loads the file and
// hands a finished `SiteBuildConfig` in.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Bundled web PKI roots.
    #[default]
    SystemDefaults,
    /// Additional CA certificate file.
    CustomCa(PathBuf),
}

/// Template ids applied to the site at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateIds {
    pub gateway: Option<String>,
    pub wlan: Option<String>,
    pub network: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Static settings applied to every site this run creates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSettings {
    pub timezone: Option<String>,
    pub country_code: Option<String>,
    pub address: Option<String>,
    pub latlng: Option<Coordinates>,
    /// Site variables, applied after creation when non-empty.
    pub vars: BTreeMap<String, String>,
}

/// Everything one provisioning run needs.
///
/// Built once at startup and passed by reference to each step.
#[derive(Debug, Clone)]
pub struct SiteBuildConfig {
    /// API base URL (e.g., `https://api.example.com/api/v1`).
    pub base_url: Url,
    pub org_id: String,
    pub token: SecretString,
    pub templates: TemplateIds,
    pub site: SiteSettings,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}
