//! Navitia HTTP client.
//!
//! Provides async methods for querying the places and journeys endpoints.
//! Handles authentication, timeouts, error bodies, and conversion to
//! domain types.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{JourneyOption, JourneyRequest, LocationCandidate};

use super::api::TransitApi;
use super::convert::{convert_journeys, convert_places};
use super::error::NavitiaError;
use super::types::{ErrorResponse, JourneysResponse, PlacesResponse};

/// Default base URL for the SNCF Navitia API.
pub const DEFAULT_BASE_URL: &str = "https://api.sncf.com/v1";

/// Default coverage region.
pub const DEFAULT_COVERAGE: &str = "sncf";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest slice of a response body kept in error messages.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the Navitia client.
#[derive(Clone)]
pub struct NavitiaConfig {
    /// API key, sent as the Basic auth username
    pub api_key: String,
    /// Base URL for the API (defaults to the SNCF production instance)
    pub base_url: String,
    /// Coverage region queried under `/coverage/{coverage}/`
    pub coverage: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NavitiaConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            coverage: DEFAULT_COVERAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the coverage region.
    pub fn with_coverage(mut self, coverage: impl Into<String>) -> Self {
        self.coverage = coverage.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl fmt::Debug for NavitiaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavitiaConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("coverage", &self.coverage)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Navitia API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct NavitiaClient {
    http: reqwest::Client,
    base_url: String,
    coverage: String,
    timeout_secs: u64,
}

impl NavitiaClient {
    /// Create a new Navitia client with the given configuration.
    pub fn new(config: NavitiaConfig) -> Result<Self, NavitiaError> {
        let mut headers = HeaderMap::new();

        // Basic auth: API key as username, empty password
        let credentials = BASE64.encode(format!("{}:", config.api_key));
        let mut auth = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|_| NavitiaError::InvalidConfig("invalid API key format".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(NavitiaError::Http)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            coverage: config.coverage,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Search places by free text.
    pub async fn places(&self, query: &str) -> Result<PlacesResponse, NavitiaError> {
        self.get("places", &[("q", query.to_string())]).await
    }

    /// Search journeys departing at or after the requested instant.
    pub async fn journeys(&self, request: &JourneyRequest) -> Result<JourneysResponse, NavitiaError> {
        let mut query = vec![
            ("from", request.from.as_str().to_string()),
            ("to", request.to.as_str().to_string()),
            ("datetime", request.departure_after.to_api_string()),
            ("datetime_represents", "departure".to_string()),
        ];
        if let Some(count) = request.count {
            query.push(("count", count.to_string()));
        }

        self.get("journeys", &query).await
    }

    /// GET `{base}/coverage/{coverage}/{endpoint}` and decode the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, NavitiaError> {
        let url = format!("{}/coverage/{}/{}", self.base_url, self.coverage, endpoint);
        debug!(%url, ?query, "navitia request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "navitia response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NavitiaError::Api {
                status: status.as_u16(),
                message: error_detail(&body),
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        serde_json::from_str(&body).map_err(|e| NavitiaError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> NavitiaError {
        if err.is_timeout() {
            NavitiaError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            NavitiaError::Http(err)
        }
    }
}

#[async_trait]
impl TransitApi for NavitiaClient {
    async fn search_places(&self, query: &str) -> Result<Vec<LocationCandidate>, NavitiaError> {
        let response = self.places(query).await?;
        Ok(convert_places(&response))
    }

    async fn search_journeys(
        &self,
        request: &JourneyRequest,
    ) -> Result<Vec<JourneyOption>, NavitiaError> {
        let response = self.journeys(request).await?;
        if let Some(error) = response.error.as_ref().filter(|_| response.journeys.is_empty()) {
            debug!(id = ?error.id, message = ?error.message, "upstream returned no journeys");
        }
        Ok(convert_journeys(&response))
    }
}

/// Pull a readable message out of an error body: the upstream's own
/// message if the body is a Navitia error object, else the raw text.
fn error_detail(body: &str) -> Option<String> {
    if let Some(detail) = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.detail().map(str::to_string))
    {
        return Some(detail);
    }

    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.chars().take(BODY_SNIPPET_CHARS).collect())
}
