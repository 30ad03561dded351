// HTTP client for the site and inventory endpoints
//
// Wraps `reqwest::Client` with token auth, org-scoped URL construction and
// uniform status/body handling. Endpoint methods live in `sites.rs` and
// `inventory.rs` as inherent impls so this module stays about transport.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for one organization on the management service.
///
/// All org-scoped paths are built as `{base_url}/orgs/{org_id}/...`;
/// site-scoped paths as `{base_url}/sites/{site_id}/...`.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    org_id: String,
}

impl Client {
    /// Create a client that sends `Authorization: Token <token>` on every request.
    pub fn new(
        base_url: Url,
        org_id: String,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut auth = HeaderValue::from_str(&format!("Token {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url,
            org_id,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for any auth headers.
    pub fn with_client(http: reqwest::Client, base_url: Url, org_id: String) -> Self {
        Self {
            http,
            base_url,
            org_id,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}`, tolerating a trailing slash on the base.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    /// Build `{base}/orgs/{org}/{path}`.
    pub(crate) fn org_url(&self, path: &str) -> Result<Url, Error> {
        self.url(&format!("orgs/{}/{path}", self.org_id))
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    /// Send a POST request with JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        trace_payload(body);

        let resp = self.http.post(url).json(body).send().await?;
        Self::decode(resp).await
    }

    /// Send a PUT request with JSON body and decode the JSON response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        trace_payload(body);

        let resp = self.http.put(url).json(body).send().await?;
        Self::decode(resp).await
    }

    /// Send a PUT request with JSON body, checking the status only.
    pub(crate) async fn put_discard(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("PUT {}", url);
        trace_payload(body);

        let resp = self.http.put(url).json(body).send().await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    /// Map 401 and other non-success statuses to errors.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication { message });
        }

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

fn trace_payload(body: &impl Serialize) {
    if tracing::enabled!(tracing::Level::TRACE) {
        if let Ok(payload) = serde_json::to_string_pretty(body) {
            trace!("payload:\n{payload}");
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// The service answers errors with `{"detail": "..."}`; anything else is
/// passed through as trimmed text.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(detail) = value.get("detail").and_then(serde_json::Value::as_str) {
            return Some(detail.to_owned());
        }
    }

    Some(trimmed.to_owned())
}
