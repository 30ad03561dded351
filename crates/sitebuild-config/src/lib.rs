//! Configuration loading for sitebuild.
//!
//! Reads the `env.json` document (or a TOML equivalent), layers
//! `SITEBUILD_*` environment variables on top, validates the result and
//! translates it to `sitebuild_core::SiteBuildConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use sitebuild_core::{Coordinates, SiteBuildConfig, SiteSettings, TemplateIds, TlsVerification};

/// File name looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "env.json";

/// Request timeout used when neither the file nor the CLI sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found (looked in: {searched})")]
    NotFound { searched: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing required setting '{field}'")]
    Missing { field: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── File schema ─────────────────────────────────────────────────────

/// The configuration document as written on disk.
///
/// Field names follow the existing `env.json` layout.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    /// API token (sent as `Authorization: Token <token>`).
    #[serde(default)]
    pub token: Option<String>,

    /// API base URL, e.g. `https://api.example.com/api/v1`.
    #[serde(default, rename = "baseUrl")]
    pub base_url: Option<String>,

    #[serde(default, rename = "orgId")]
    pub org_id: Option<String>,

    #[serde(default)]
    pub gatewaytemplate_id: Option<String>,

    #[serde(default)]
    pub wlantemplate_id: Option<String>,

    #[serde(default)]
    pub networktemplate_id: Option<String>,

    #[serde(default, rename = "siteSettings")]
    pub site_settings: SiteSettingsFile,

    /// Extra CA certificate (PEM) to trust.
    #[serde(default, rename = "caCert")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SiteSettingsFile {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latlng: Option<LatLngFile>,
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LatLngFile {
    pub lat: f64,
    pub lng: f64,
}

/// Top-level settings that `SITEBUILD_*` environment variables may override.
///
/// Values are taken verbatim from the environment rather than parsed as
/// figment values, so an all-digit token or org id stays a string and keeps
/// its leading zeros.
#[derive(Debug, Default)]
struct EnvOverrides {
    token: Option<String>,
    base_url: Option<String>,
    org_id: Option<String>,
    ca_cert: Option<PathBuf>,
    timeout: Option<u64>,
}

impl EnvOverrides {
    /// Collect overrides from `env`. Unrelated keys are ignored.
    fn from_env(env: &Env) -> Result<Self, ConfigError> {
        let mut overrides = Self::default();
        for (key, value) in env.iter() {
            match key.as_str() {
                "token" => overrides.token = Some(value),
                "baseurl" | "base_url" => overrides.base_url = Some(value),
                "orgid" | "org_id" => overrides.org_id = Some(value),
                "cacert" | "ca_cert" => overrides.ca_cert = Some(PathBuf::from(value)),
                "timeout" => {
                    let secs = value.trim().parse().map_err(|e| ConfigError::Validation {
                        field: "SITEBUILD_TIMEOUT".into(),
                        reason: format!("expected whole seconds, got '{value}': {e}"),
                    })?;
                    overrides.timeout = Some(secs);
                }
                _ => {}
            }
        }
        Ok(overrides)
    }

    fn apply(self, file: &mut ConfigFile) {
        if self.token.is_some() {
            file.token = self.token;
        }
        if self.base_url.is_some() {
            file.base_url = self.base_url;
        }
        if self.org_id.is_some() {
            file.org_id = self.org_id;
        }
        if self.ca_cert.is_some() {
            file.ca_cert = self.ca_cert;
        }
        if self.timeout.is_some() {
            file.timeout = self.timeout;
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config directory location (`~/.config/sitebuild/env.json` on Linux).
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "sitebuild", "sitebuild")
        .map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_FILE))
}

/// Pick the configuration file to load.
///
/// An explicit path must exist. Otherwise `./env.json` is preferred over
/// the platform config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::NotFound {
            searched: path.display().to_string(),
        });
    }

    let mut candidates = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    candidates.extend(user_config_path());

    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound {
            searched: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the document at `path`, with `SITEBUILD_*` variables layered on top.
///
/// `.toml` files are read as TOML; everything else as JSON.
pub fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    debug!(path = %path.display(), toml = is_toml, "loading configuration");

    let figment = if is_toml {
        Figment::from(Toml::file(path))
    } else {
        Figment::from(Json::file(path))
    };

    let mut file: ConfigFile = figment.extract()?;

    EnvOverrides::from_env(&Env::prefixed("SITEBUILD_"))?.apply(&mut file);

    Ok(file)
}

/// Resolve, load and validate in one step.
pub fn load_config(
    explicit: Option<&Path>,
    timeout_override: Option<u64>,
) -> Result<SiteBuildConfig, ConfigError> {
    let path = resolve_config_path(explicit)?;
    load_file(&path)?.into_site_build_config(timeout_override)
}

// ── Translation ─────────────────────────────────────────────────────

impl ConfigFile {
    /// Validate and convert to the runtime configuration.
    ///
    /// `timeout_override` (seconds) wins over the file's `timeout`.
    pub fn into_site_build_config(
        self,
        timeout_override: Option<u64>,
    ) -> Result<SiteBuildConfig, ConfigError> {
        let token = required(self.token, "token")?;
        let org_id = required(self.org_id, "orgId")?;
        let base_url_str = required(self.base_url, "baseUrl")?;

        let base_url: url::Url = base_url_str.parse().map_err(|e| ConfigError::Validation {
            field: "baseUrl".into(),
            reason: format!("invalid URL '{base_url_str}': {e}"),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "baseUrl".into(),
                reason: format!("expected an http(s) URL, got '{base_url_str}'"),
            });
        }

        let settings = self.site_settings;
        let site = SiteSettings {
            timezone: settings.timezone,
            country_code: settings.country_code,
            address: settings.address,
            latlng: settings.latlng.map(|c| Coordinates {
                lat: c.lat,
                lng: c.lng,
            }),
            vars: settings.vars,
        };

        let tls = self
            .ca_cert
            .map_or(TlsVerification::SystemDefaults, TlsVerification::CustomCa);

        let timeout_secs = timeout_override
            .or(self.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(SiteBuildConfig {
            base_url,
            org_id,
            token: SecretString::from(token),
            templates: TemplateIds {
                gateway: non_empty(self.gatewaytemplate_id),
                wlan: non_empty(self.wlantemplate_id),
                network: non_empty(self.networktemplate_id),
            },
            site,
            tls,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ConfigError> {
    non_empty(value).ok_or_else(|| ConfigError::Missing {
        field: field.into(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use secrecy::ExposeSecret;

    use super::*;

    const ENV_JSON: &str = r#"{
        "token": "abc123",
        "baseUrl": "https://api.example.com/api/v1",
        "orgId": "9777c1a0-6ef6-11e6-8bbf-02e208b2d34f",
        "gatewaytemplate_id": "gw-1",
        "wlantemplate_id": "wlan-1",
        "networktemplate_id": "net-1",
        "siteSettings": {
            "timezone": "America/New_York",
            "country_code": "US",
            "address": "1 Main St",
            "latlng": { "lat": 40.7, "lng": -74.0 },
            "vars": { "SITE_VLAN": "30" }
        }
    }"#;

    #[test]
    fn loads_env_json_from_working_directory() {
        Jail::expect_with(|jail| {
            jail.create_file("env.json", ENV_JSON)?;

            let cfg = load_config(None, None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.token.expose_secret(), "abc123");
            assert_eq!(cfg.base_url.as_str(), "https://api.example.com/api/v1");
            assert_eq!(cfg.org_id, "9777c1a0-6ef6-11e6-8bbf-02e208b2d34f");
            assert_eq!(cfg.templates.wlan.as_deref(), Some("wlan-1"));
            assert_eq!(cfg.site.timezone.as_deref(), Some("America/New_York"));
            assert_eq!(cfg.site.latlng, Some(Coordinates { lat: 40.7, lng: -74.0 }));
            assert_eq!(cfg.site.vars.get("SITE_VLAN").map(String::as_str), Some("30"));
            assert_eq!(cfg.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
            assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
            Ok(())
        });
    }

    #[test]
    fn env_vars_override_file() {
        Jail::expect_with(|jail| {
            jail.create_file("env.json", ENV_JSON)?;
            jail.set_env("SITEBUILD_TOKEN", "from-env");
            jail.set_env("SITEBUILD_BASEURL", "https://eu.example.com/api/v1");

            let cfg = load_config(None, None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.token.expose_secret(), "from-env");
            assert_eq!(cfg.base_url.host_str(), Some("eu.example.com"));
            Ok(())
        });
    }

    #[test]
    fn numeric_env_values_stay_strings() {
        Jail::expect_with(|jail| {
            jail.create_file("env.json", ENV_JSON)?;
            jail.set_env("SITEBUILD_ORGID", "42");
            jail.set_env("SITEBUILD_TOKEN", "0123456789");

            let cfg = load_config(None, None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.org_id, "42");
            assert_eq!(cfg.token.expose_secret(), "0123456789");
            Ok(())
        });
    }

    #[test]
    fn env_timeout_must_be_whole_seconds() {
        Jail::expect_with(|jail| {
            jail.create_file("env.json", ENV_JSON)?;
            jail.set_env("SITEBUILD_TIMEOUT", "soon");

            let err = load_config(None, None).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "SITEBUILD_TIMEOUT"),
                "{err:?}"
            );
            Ok(())
        });
    }

    #[test]
    fn env_timeout_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("env.json", ENV_JSON)?;
            jail.set_env("SITEBUILD_TIMEOUT", "7");

            let cfg = load_config(None, None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.timeout, Duration::from_secs(7));
            Ok(())
        });
    }

    #[test]
    fn toml_file_by_extension() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "site.toml",
                r#"
                token = "t"
                baseUrl = "https://api.example.com/api/v1"
                orgId = "org"
                timeout = 5

                [siteSettings]
                country_code = "GB"
                "#,
            )?;

            let cfg = load_config(Some(Path::new("site.toml")), None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.site.country_code.as_deref(), Some("GB"));
            assert!(cfg.site.vars.is_empty());
            assert_eq!(cfg.timeout, Duration::from_secs(5));
            Ok(())
        });
    }

    #[test]
    fn timeout_override_wins() {
        let file = ConfigFile {
            token: Some("t".into()),
            base_url: Some("https://api.example.com".into()),
            org_id: Some("org".into()),
            timeout: Some(5),
            ..ConfigFile::default()
        };
        let cfg = file.into_site_build_config(Some(90)).unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(90));
    }

    #[test]
    fn missing_explicit_file_is_not_found() {
        let err = load_config(Some(Path::new("/nonexistent/env.json")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { ref searched } if searched == "/nonexistent/env.json"));
    }

    #[test]
    fn malformed_json_is_figment_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_config(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
    }

    #[test]
    fn missing_token_is_reported() {
        let file = ConfigFile {
            base_url: Some("https://api.example.com".into()),
            org_id: Some("org".into()),
            ..ConfigFile::default()
        };
        let err = file.into_site_build_config(None).unwrap_err();
        assert_eq!(err.to_string(), "missing required setting 'token'");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        for url in ["not a url", "ftp://api.example.com"] {
            let file = ConfigFile {
                token: Some("t".into()),
                base_url: Some(url.into()),
                org_id: Some("org".into()),
                ..ConfigFile::default()
            };
            let err = file.into_site_build_config(None).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "baseUrl"),
                "{url}: {err:?}"
            );
        }
    }

    #[test]
    fn blank_template_ids_are_dropped() {
        let file = ConfigFile {
            token: Some("t".into()),
            base_url: Some("https://api.example.com".into()),
            org_id: Some("org".into()),
            gatewaytemplate_id: Some(String::new()),
            ..ConfigFile::default()
        };
        let cfg = file.into_site_build_config(None).unwrap();
        assert_eq!(cfg.templates.gateway, None);
    }
}
