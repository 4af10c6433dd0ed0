//! # veil-client
//!
//! HTTP client for the identity-masking service.
//!
//! The service exposes three operations, each wrapped in the same
//! response [`Envelope`]:
//!
//! - generate a candidate alias address
//! - reserve a generated address under a label
//! - list every alias on the account
//!
//! Authentication is a pre-established session cookie attached to every
//! request. Transport and decode failures surface as [`ClientError`];
//! application-level failure travels inside the envelope and is the
//! caller's concern.

mod envelope;

pub use envelope::{Envelope, ErrorInfo, ErrorShape};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Client errors. Only transport-level concerns live here.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("session cookie contains characters not allowed in a header")]
    InvalidCookie,
}

/// Client for the identity-masking service.
#[derive(Debug, Clone)]
pub struct MaskServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl MaskServiceClient {
    /// Create a client for `base_url`, attaching `cookie` to every
    /// request when present.
    ///
    /// No request timeout is configured: an unresponsive remote call
    /// blocks its caller until the connection dies.
    pub fn new(base_url: &str, cookie: Option<&str>) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(cookie) = cookie {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(cookie.trim()).map_err(|_| ClientError::InvalidCookie)?,
            );
        }

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Generate a candidate alias address.
    pub async fn generate_alias(&self) -> Result<Envelope<GeneratedAlias>, ClientError> {
        let url = self.url("/v1/hme/generate");
        debug!(url = %url, "Generating alias");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        Ok(response.json().await?)
    }

    /// Reserve a generated address under `label`.
    pub async fn reserve_alias(
        &self,
        address: &str,
        label: &str,
    ) -> Result<Envelope<serde_json::Value>, ClientError> {
        let url = self.url("/v1/hme/reserve");
        debug!(url = %url, address = %address, "Reserving alias");

        let body = serde_json::json!({
            "hme": address,
            "label": label,
        });
        let response = self.client.post(&url).json(&body).send().await?;

        Ok(response.json().await?)
    }

    /// Fetch every alias on the account.
    pub async fn list_aliases(&self) -> Result<Envelope<AliasList>, ClientError> {
        let url = self.url("/v2/hme/list");
        debug!(url = %url, "Listing aliases");

        let response = self.client.get(&url).send().await?;

        Ok(response.json().await?)
    }
}

/// Result payload of a generate call.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedAlias {
    pub hme: String,
}

/// Result payload of a list call.
#[derive(Debug, Clone, Deserialize)]
pub struct AliasList {
    #[serde(rename = "hmeEmails")]
    pub hme_emails: Vec<AliasRecord>,
}

/// One alias as reported by the service. Immutable once fetched; the
/// service is the system of record.
#[derive(Debug, Clone, Deserialize)]
pub struct AliasRecord {
    pub label: String,

    /// The alias address.
    pub hme: String,

    /// Creation time in epoch milliseconds.
    #[serde(rename = "createTimestamp")]
    pub create_timestamp: i64,

    #[serde(rename = "isActive")]
    pub is_active: bool,
}
