//! In-memory transit API for testing without upstream access.
//!
//! Serves canned places and journeys (typically loaded from the JSON
//! fixtures under `testdata/`) and records every call it receives so
//! tests can assert on what was asked of the upstream.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{JourneyOption, JourneyRequest, LocationCandidate};

use super::api::TransitApi;
use super::convert::{convert_journeys, convert_places};
use super::error::NavitiaError;
use super::types::{JourneysResponse, PlacesResponse};

/// A failure to inject in place of a response.
#[derive(Debug, Clone)]
enum Failure {
    Api { status: u16, message: Option<String> },
    Timeout { timeout_secs: u64 },
}

impl Failure {
    fn to_error(&self) -> NavitiaError {
        match self {
            Failure::Api { status, message } => NavitiaError::Api {
                status: *status,
                message: message.clone(),
            },
            Failure::Timeout { timeout_secs } => NavitiaError::Timeout {
                timeout_secs: *timeout_secs,
            },
        }
    }
}

/// Fixture-backed [`TransitApi`].
///
/// Place queries are matched exactly after trimming. Journeys are keyed by
/// the `(from, to)` location ids. Anything unknown yields an empty list,
/// which is what the upstream returns for no match.
#[derive(Debug, Default)]
pub struct FixtureApi {
    places: HashMap<String, Vec<LocationCandidate>>,
    journeys: HashMap<(String, String), Vec<JourneyOption>>,
    places_failure: Option<Failure>,
    journeys_failure: Option<Failure>,
    place_queries: Mutex<Vec<String>>,
    journey_requests: Mutex<Vec<JourneyRequest>>,
}

impl FixtureApi {
    /// Create an API that knows no places and no journeys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `candidates` for the place query `query`.
    pub fn with_places(mut self, query: &str, candidates: Vec<LocationCandidate>) -> Self {
        self.places.insert(query.trim().to_string(), candidates);
        self
    }

    /// Serve a raw places response body for the place query `query`.
    pub fn with_places_json(self, query: &str, json: &str) -> Result<Self, NavitiaError> {
        let response: PlacesResponse = parse_fixture(json)?;
        Ok(self.with_places(query, convert_places(&response)))
    }

    /// Serve `options` for journeys between two location ids.
    pub fn with_journeys(mut self, from: &str, to: &str, options: Vec<JourneyOption>) -> Self {
        self.journeys
            .insert((from.to_string(), to.to_string()), options);
        self
    }

    /// Serve a raw journeys response body for journeys between two location ids.
    pub fn with_journeys_json(self, from: &str, to: &str, json: &str) -> Result<Self, NavitiaError> {
        let response: JourneysResponse = parse_fixture(json)?;
        Ok(self.with_journeys(from, to, convert_journeys(&response)))
    }

    /// Fail every place search with an upstream status.
    pub fn failing_places(mut self, status: u16, message: Option<&str>) -> Self {
        self.places_failure = Some(Failure::Api {
            status,
            message: message.map(str::to_string),
        });
        self
    }

    /// Fail every journey search with an upstream status.
    pub fn failing_journeys(mut self, status: u16, message: Option<&str>) -> Self {
        self.journeys_failure = Some(Failure::Api {
            status,
            message: message.map(str::to_string),
        });
        self
    }

    /// Time out every journey search.
    pub fn timing_out_journeys(mut self, timeout_secs: u64) -> Self {
        self.journeys_failure = Some(Failure::Timeout { timeout_secs });
        self
    }

    /// Place queries received so far, in order.
    pub fn place_queries(&self) -> Vec<String> {
        self.place_queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Journey requests received so far, in order.
    pub fn journey_requests(&self) -> Vec<JourneyRequest> {
        self.journey_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

fn parse_fixture<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, NavitiaError> {
    serde_json::from_str(json).map_err(|e| NavitiaError::Json {
        message: e.to_string(),
        body: None,
    })
}

#[async_trait]
impl TransitApi for FixtureApi {
    async fn search_places(&self, query: &str) -> Result<Vec<LocationCandidate>, NavitiaError> {
        if let Ok(mut queries) = self.place_queries.lock() {
            queries.push(query.to_string());
        }

        if let Some(failure) = &self.places_failure {
            return Err(failure.to_error());
        }

        Ok(self.places.get(query.trim()).cloned().unwrap_or_default())
    }

    async fn search_journeys(
        &self,
        request: &JourneyRequest,
    ) -> Result<Vec<JourneyOption>, NavitiaError> {
        if let Ok(mut requests) = self.journey_requests.lock() {
            requests.push(request.clone());
        }

        if let Some(failure) = &self.journeys_failure {
            return Err(failure.to_error());
        }

        let key = (
            request.from.as_str().to_string(),
            request.to.as_str().to_string(),
        );
        let mut options = self.journeys.get(&key).cloned().unwrap_or_default();
        if let Some(count) = request.count {
            options.truncate(usize::try_from(count).unwrap_or(usize::MAX));
        }
        Ok(options)
    }
}
