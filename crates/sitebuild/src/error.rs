//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sitebuild_config::ConfigError;
use sitebuild_core::CoreError;

/// Process exit codes. Every failure exits non-zero; clap handles usage
/// errors itself with code 2.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found")]
    #[diagnostic(
        code(sitebuild::no_config),
        help(
            "Create env.json in the working directory or pass --config.\n\
             Looked in: {searched}"
        )
    )]
    NoConfig { searched: String },

    #[error("Missing required setting '{field}'")]
    #[diagnostic(
        code(sitebuild::missing_setting),
        help("Add '{field}' to the configuration file or set the matching SITEBUILD_* variable.")
    )]
    MissingSetting { field: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sitebuild::config_invalid))]
    InvalidSetting { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(sitebuild::config))]
    Config(Box<figment::Error>),

    // ── Input ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(sitebuild::invalid_input),
        help("MACs are 12 hex digits, with or without ':' separators (e.g. aa:bb:cc:dd:ee:ff).")
    )]
    InvalidInput { message: String },

    #[error("Interactive input failed: {message}")]
    #[diagnostic(
        code(sitebuild::prompt),
        help("Pass --site-name and provide a devices file when running without a terminal.")
    )]
    Prompt { message: String },

    // ── Business rules ───────────────────────────────────────────────
    #[error("Site name '{name}' already exists, exiting")]
    #[diagnostic(
        code(sitebuild::site_exists),
        help("Choose a different site name; existing sites are never modified.")
    )]
    SiteExists { name: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(sitebuild::connection_failed),
        help("Check baseUrl in the configuration and your network access.")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(sitebuild::tls),
        help("Check that caCert (or SITEBUILD_CACERT) points to a readable PEM file.")
    )]
    Tls { message: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(sitebuild::auth_failed),
        help("Verify the API token in the configuration (or SITEBUILD_TOKEN).")
    )]
    AuthFailed { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(sitebuild::timeout),
        help("Increase the timeout with --timeout or check service responsiveness.")
    )]
    Timeout,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(sitebuild::api_error))]
    Api { message: String },
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyMac | CoreError::InvalidMac { .. } | CoreError::InvalidSiteName => {
                CliError::InvalidInput {
                    message: err.to_string(),
                }
            }

            CoreError::SiteExists { name } => CliError::SiteExists { name },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Tls { message } => CliError::Tls { message },

            CoreError::Api { message, status: _ } | CoreError::Decode { message } => {
                CliError::Api { message }
            }

            CoreError::Operator { message } => CliError::Prompt { message },

            CoreError::Config { message } => CliError::InvalidSetting {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { searched } => CliError::NoConfig { searched },
            ConfigError::Missing { field } => CliError::MissingSetting { field },
            ConfigError::Validation { field, reason } => {
                CliError::InvalidSetting { field, reason }
            }
            ConfigError::Figment(e) => CliError::Config(e),
        }
    }
}
