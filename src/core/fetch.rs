//! Dual-source contract fetching
//!
//! One interface over "read the live catalog" and "read the local cache",
//! selected by an explicit [`FetchMode`] argument. The live path wraps the
//! catalog source in a bounded retry loop; the cached path never errors on an
//! empty group (a cache miss is a valid "no records" outcome).

use std::time::Duration;

use console::style;
use serde_json::Value;
use thiserror::Error;

use crate::core::cache::{CacheError, ContractCache};

/// Where a fetch reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Query the remote catalog, with bounded retry
    Live,
    /// Read whatever the local cache holds
    Cached,
}

/// Nested resource kinds a contract carries.
///
/// Closed set: each kind maps to one fixed cache table, so no caller-supplied
/// string ever reaches a SQL identifier position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SubResource {
    History,
    Payments,
    LineItems,
    Attachments,
}

impl SubResource {
    pub const ALL: [SubResource; 4] = [
        SubResource::History,
        SubResource::Payments,
        SubResource::LineItems,
        SubResource::Attachments,
    ];

    /// Cache table backing this kind
    pub fn table(&self) -> &'static str {
        match self {
            SubResource::History => "sub_history",
            SubResource::Payments => "sub_payments",
            SubResource::LineItems => "sub_line_items",
            SubResource::Attachments => "sub_attachments",
        }
    }

    /// Catalog path segment for this kind
    pub fn path(&self) -> &'static str {
        match self {
            SubResource::History => "history",
            SubResource::Payments => "payments",
            SubResource::LineItems => "line-items",
            SubResource::Attachments => "attachments",
        }
    }
}

impl std::fmt::Display for SubResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// A fetched contract payload, identified and group-stamped
#[derive(Debug, Clone, PartialEq)]
pub struct RawContract {
    pub id: String,
    pub group_code: String,
    pub payload: Value,
}

impl RawContract {
    /// Wrap a catalog payload, requiring a string `id` field
    pub fn from_payload(group_code: &str, payload: Value) -> Option<Self> {
        let id = payload["id"].as_str()?.to_string();
        Some(Self {
            id,
            group_code: group_code.to_string(),
            payload,
        })
    }
}

/// Errors from the remote catalog itself
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by a fetch call
#[derive(Debug, Error)]
pub enum FetchError {
    /// Live source unavailable after every attempt; the cache was not touched
    #[error("catalog unavailable after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: SourceError },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Retry behavior for the live path
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// The remote catalog boundary.
///
/// Implementations are expected to bound each call (a timeout on the
/// underlying client); the retry loop in [`Fetcher`] adds attempts, not
/// patience.
pub trait CatalogSource {
    /// All contract payloads for one group. Empty is a valid result;
    /// unavailability is an error.
    fn fetch_group(&self, group_code: &str) -> Result<Vec<Value>, SourceError>;

    /// Nested resource payloads for one contract
    fn fetch_sub(&self, contract_id: &str, kind: SubResource) -> Result<Vec<Value>, SourceError>;
}

/// HTTP client for a JSON contract catalog
pub struct HttpCatalogSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpCatalogSource {
    /// Create a client for the given base URL (no trailing slash needed).
    ///
    /// `timeout` bounds every individual request, which keeps the whole live
    /// path bounded at attempts x (timeout + delay).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json(&self, url: &str) -> Result<Vec<Value>, SourceError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(SourceError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json()?)
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch_group(&self, group_code: &str) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/groups/{}/contracts", self.base_url, group_code);
        self.get_json(&url)
    }

    fn fetch_sub(&self, contract_id: &str, kind: SubResource) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/contracts/{}/{}", self.base_url, contract_id, kind.path());
        self.get_json(&url)
    }
}

/// Dual-source fetcher: a catalog source plus a retry policy
pub struct Fetcher {
    source: Box<dyn CatalogSource>,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(source: Box<dyn CatalogSource>, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }

    /// Fetch all contracts of a group from the selected source
    pub fn fetch(
        &self,
        cache: &ContractCache,
        group_code: &str,
        mode: FetchMode,
    ) -> Result<Vec<RawContract>, FetchError> {
        match mode {
            FetchMode::Live => self.fetch_live(group_code),
            FetchMode::Cached => Ok(cache.read_group(group_code)?),
        }
    }

    /// Fetch from the live catalog with bounded retry
    pub fn fetch_live(&self, group_code: &str) -> Result<Vec<RawContract>, FetchError> {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.source.fetch_group(group_code) {
                Ok(payloads) => return Ok(wrap_payloads(group_code, payloads)),
                Err(e) => {
                    if attempt >= attempts {
                        return Err(FetchError::Exhausted { attempts, last: e });
                    }
                    std::thread::sleep(self.retry.delay);
                }
            }
        }
    }

    /// Fetch one contract's nested resource from the selected source.
    ///
    /// A live fetch also refreshes the cached copy, so later cached reads and
    /// offline reporting see what was last retrieved.
    pub fn fetch_sub(
        &self,
        cache: &mut ContractCache,
        contract_id: &str,
        kind: SubResource,
        mode: FetchMode,
    ) -> Result<Vec<Value>, FetchError> {
        match mode {
            FetchMode::Cached => Ok(cache.read_sub(contract_id, kind)?),
            FetchMode::Live => {
                let attempts = self.retry.attempts.max(1);
                let mut attempt = 0;
                let payloads = loop {
                    attempt += 1;
                    match self.source.fetch_sub(contract_id, kind) {
                        Ok(p) => break p,
                        Err(e) => {
                            if attempt >= attempts {
                                return Err(FetchError::Exhausted { attempts, last: e });
                            }
                            std::thread::sleep(self.retry.delay);
                        }
                    }
                };
                cache.replace_sub(contract_id, kind, &payloads)?;
                Ok(payloads)
            }
        }
    }
}

/// Wrap payloads into [`RawContract`]s, dropping id-less entries with a warning
fn wrap_payloads(group_code: &str, payloads: Vec<Value>) -> Vec<RawContract> {
    let total = payloads.len();
    let records: Vec<RawContract> = payloads
        .into_iter()
        .filter_map(|p| RawContract::from_payload(group_code, p))
        .collect();

    let dropped = total - records.len();
    if dropped > 0 {
        eprintln!(
            "{} {} record(s) from group {} had no 'id' field and were ignored",
            style("⚠").yellow(),
            dropped,
            group_code
        );
    }

    records
}
