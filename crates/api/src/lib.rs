//! Admin API client for the grouped-navigation pipeline.
//!
//! A thin wrapper around `reqwest` covering the four external calls the
//! pipeline makes:
//!
//! - content-type listing (`/content-manager/content-types`)
//! - permissions for the current user (`/admin/users/me/permissions`)
//! - runtime configuration (`/group-nav/config`)
//! - the enablement probe (reachability of the config endpoint)
//!
//! The admin API is an unversioned contract: payloads may arrive wrapped
//! (`{"data": […]}`) or bare, and individual records may be malformed.
//! One normalization step tolerates the shape variance before records are
//! handed to the engine, and malformed records are dropped per-record
//! with a warning rather than failing the batch.
//!
//! # Example
//!
//! ```ignore
//! use groupnav_api::AdminClient;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = AdminClient::new_from_env()?;
//! if client.probe_enabled().await {
//!     let listing = client.fetch_content_types().await?;
//!     println!("{} content types", listing.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use groupnav_types::{Permission, RawContentType, RuntimeConfig};
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Base URL of the host admin panel (e.g. `http://localhost:1337`).
pub const API_BASE_ENV: &str = "GROUPNAV_API_BASE";
/// Admin JWT used as a bearer token, when the deployment requires one.
pub const API_TOKEN_ENV: &str = "GROUPNAV_API_TOKEN";

const DEFAULT_API_BASE: &str = "http://localhost:1337";
const LISTING_PATH: &str = "/content-manager/content-types";
const PERMISSIONS_PATH: &str = "/admin/users/me/permissions";
const CONFIG_PATH: &str = "/group-nav/config";

/// Keys under which the admin API wraps list payloads, tried in order.
const PAYLOAD_ARRAY_KEYS: &[&str] = &["data", "results", "items"];

/// Errors emitted by admin API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level or protocol failure.
    #[error("admin API request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("admin API returned {0} for {1}")]
    Status(StatusCode, String),
    /// The payload was neither a bare array nor a known wrapper.
    #[error("unexpected admin API payload shape: {0}")]
    UnexpectedPayload(String),
}

/// Thin wrapper around a configured `reqwest::Client` for admin API
/// access. Construct via [`AdminClient::new`] or
/// [`AdminClient::new_from_env`].
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: Url,
    http: Client,
}

impl AdminClient {
    /// Builds a client against the given base URL with an optional bearer
    /// token and the default timeout and headers.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("invalid admin base URL: {base_url}"))?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let bearer = format!("Bearer {token}");
            let value = header::HeaderValue::from_str(&bearer).context("admin token is not a valid header value")?;
            default_headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { base_url, http })
    }

    /// Builds a client from `GROUPNAV_API_BASE` and `GROUPNAV_API_TOKEN`,
    /// falling back to the local development host.
    pub fn new_from_env() -> Result<Self> {
        let base = env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let token = env::var(API_TOKEN_ENV).ok();
        Self::new(&base, token.as_deref())
    }

    /// Fetches the raw content-type listing.
    ///
    /// Wrapped and bare array payloads are both accepted; records that
    /// fail to deserialize are skipped with a warning so one malformed
    /// entry cannot empty the navigation.
    pub async fn fetch_content_types(&self) -> Result<Vec<RawContentType>, ApiError> {
        let payload = self.get_json(LISTING_PATH).await?;
        let records = extract_array(&payload)
            .ok_or_else(|| ApiError::UnexpectedPayload(LISTING_PATH.to_string()))?;
        Ok(deserialize_records(records, "content type"))
    }

    /// Fetches the current user's permission pairs. Same shape tolerance
    /// as the listing fetch.
    pub async fn fetch_permissions(&self) -> Result<Vec<Permission>, ApiError> {
        let payload = self.get_json(PERMISSIONS_PATH).await?;
        let records = extract_array(&payload)
            .ok_or_else(|| ApiError::UnexpectedPayload(PERMISSIONS_PATH.to_string()))?;
        Ok(deserialize_records(records, "permission"))
    }

    /// Fetches the runtime configuration. Any failure, network or
    /// otherwise, degrades to an empty payload so defaults apply and the
    /// feature proceeds.
    pub async fn fetch_config(&self) -> RuntimeConfig {
        match self.get_json(CONFIG_PATH).await {
            Ok(payload) => serde_json::from_value(payload).unwrap_or_else(|error| {
                warn!(%error, "config payload did not match the two-field contract; using defaults");
                RuntimeConfig::default()
            }),
            Err(error) => {
                warn!(%error, "config fetch failed; using defaults");
                RuntimeConfig::default()
            }
        }
    }

    /// Enablement probe: the config endpoint's reachability doubles as the
    /// feature flag. A non-success status (404 in particular) or an
    /// unreachable host means the injection pipeline must not run.
    pub async fn probe_enabled(&self) -> bool {
        let url = match self.endpoint(CONFIG_PATH) {
            Ok(url) => url,
            Err(_) => return false,
        };
        match self.http.get(url).send().await {
            Ok(response) => {
                let enabled = response.status().is_success();
                debug!(status = %response.status(), enabled, "enablement probe completed");
                enabled
            }
            Err(error) => {
                warn!(%error, "enablement probe failed; treating feature as disabled");
                false
            }
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::UnexpectedPayload(format!("unjoinable path: {path}")))
    }

    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status, path.to_string()));
        }
        Ok(response.json().await?)
    }
}

/// Unwraps a list payload: a bare array is returned as-is, an object is
/// probed for the known wrapper keys in priority order.
fn extract_array(payload: &Value) -> Option<&Vec<Value>> {
    if let Some(array) = payload.as_array() {
        return Some(array);
    }
    let object = payload.as_object()?;
    PAYLOAD_ARRAY_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))
}

/// Deserializes each record independently, dropping failures with a
/// warning. One bad record never aborts the batch.
fn deserialize_records<T: serde::de::DeserializeOwned>(records: &[Value], kind: &str) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                warn!(%error, kind, "skipping malformed record");
                None
            }
        })
        .collect()
}
