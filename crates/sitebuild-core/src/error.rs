// ── Core error types ──
//
// User-facing errors from sitebuild-core. Consumers never see reqwest or
// serde errors directly; the `From<sitebuild_api::Error>` impl translates
// transport-layer failures into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation errors ────────────────────────────────────────────
    #[error("Device data invalid, empty string found")]
    EmptyMac,

    #[error("Invalid device MAC detected: '{raw}'")]
    InvalidMac { raw: String },

    #[error("Site name must not be empty")]
    InvalidSiteName,

    // ── Business rules ───────────────────────────────────────────────
    #[error("Site name '{name}' already exists")]
    SiteExists { name: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("TLS setup failed: {message}")]
    Tls { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Unexpected response from service: {message}")]
    Decode { message: String },

    // ── Operator input ───────────────────────────────────────────────
    #[error("Interactive input failed: {message}")]
    Operator { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for errors caused by operator-supplied data.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyMac | Self::InvalidMac { .. } | Self::InvalidSiteName
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sitebuild_api::Error> for CoreError {
    fn from(err: sitebuild_api::Error) -> Self {
        match err {
            sitebuild_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            sitebuild_api::Error::InvalidToken(reason) => CoreError::Config {
                message: format!("invalid token: {reason}"),
            },
            sitebuild_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            sitebuild_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sitebuild_api::Error::Tls(message) => CoreError::Tls { message },
            sitebuild_api::Error::Api { status, message } => CoreError::Api {
                message: format!("HTTP {status}: {message}"),
                status: Some(status),
            },
            sitebuild_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
        }
    }
}
