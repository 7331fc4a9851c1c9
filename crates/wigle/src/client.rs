// Async HTTP client for the WiGLE v2 API.
//
// Base path: https://api.wigle.net/api/v2/
// Auth: `Authorization: Basic <encoded token>`

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::credentials::WigleApiKey;
use crate::error::{ApiError, Error};
use crate::query::SearchQuery;

pub const DEFAULT_BASE_URL: &str = "https://api.wigle.net/api/v2/";

// ── Configuration ────────────────────────────────────────────────────

/// Where and how to reach the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root; `profile/user` and `network/search` are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. `None` waits as long as the transport does.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

// ── Responses ────────────────────────────────────────────────────────

/// Body of a successful `network/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Handed to the workflow untouched. `null` when the body has none.
    #[serde(default)]
    pub results: Value,
    #[serde(default, rename = "totalResults")]
    pub total_results: Option<u64>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Client for the WiGLE API.
///
/// Authorization and JSON headers are installed as defaults on the inner
/// `reqwest::Client`, so every request carries them.
pub struct WigleClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WigleClient {
    pub fn new(api_key: &WigleApiKey, config: &ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, api_key.authorization()?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("wigle-node/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(Error::Client)?;

        Ok(Self {
            http,
            base_url: Self::normalize_base_url(&config.base_url)?,
        })
    }

    /// Parse the base URL and make sure it ends with `/` so relative
    /// endpoint paths join under it instead of replacing its last segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET profile/user`. Any non-success status is an error; the body is
    /// not inspected.
    pub async fn user_profile(&self) -> Result<(), Error> {
        let url = self.url("profile/user")?;
        debug!("GET {url}");

        self.http.get(url).send().await?.error_for_status()?;
        Ok(())
    }

    /// `GET network/search` with `query` as the query string.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, Error> {
        let url = self.url("network/search")?;
        debug!("GET {url} params={query:?}");

        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let err = ApiError::from_status(status);
            warn!(status = err.status(), "network search rejected: {err}");
            return Err(err.into());
        }

        // Read first so a dropped connection stays a transport error.
        let bytes = resp.bytes().await?;
        let body: SearchResponse = serde_json::from_slice(&bytes).map_err(Error::Decode)?;
        debug!("network search returned {:?} total results", body.total_results);
        Ok(body)
    }
}
