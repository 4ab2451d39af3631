//! The two tool operations: train search and station lookup.
//!
//! Pipeline for a train search: resolve the departure time, resolve both
//! stations, query journeys, then hand everything to the report renderer.
//! Any failure ends the search; there is no partial result.

use std::sync::Arc;

use chrono::NaiveDateTime;
use futures::future::try_join;
use serde::Deserialize;
use tracing::info;

use crate::domain::{
    DateTimeResolver, JourneyOption, JourneyRequest, PageRequest, ResolvedTimestamp,
};
use crate::navitia::TransitApi;
use crate::stations::{StationMatch, StationResolver};

use super::config::SearchConfig;
use super::error::SearchError;
use super::query::JourneyQuery;

/// Arguments of a train search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainSearchRequest {
    /// Origin station name, e.g. "Paris".
    pub origin: String,

    /// Destination station name, e.g. "Lyon".
    pub destination: String,

    /// Earliest departure, in any accepted encoding. Absent means now.
    #[serde(default)]
    pub departure_datetime: Option<String>,

    /// 1-based page of results to render. Absent means the first page.
    #[serde(default)]
    pub page: Option<u32>,
}

impl TrainSearchRequest {
    /// Create a search departing now, showing the first page.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_datetime: None,
            page: None,
        }
    }

    /// Depart at or after the given (unparsed) date/time.
    pub fn departing(mut self, datetime: impl Into<String>) -> Self {
        self.departure_datetime = Some(datetime.into());
        self
    }

    /// Render the given 1-based page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Validate the arguments that can be checked without the upstream.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.page == Some(0) {
            return Err(SearchError::InvalidArgument {
                message: "page numbers start at 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Everything needed to render a successful train search.
#[derive(Debug, Clone)]
pub struct TrainSearchResult {
    pub origin: StationMatch,
    pub destination: StationMatch,

    /// The resolved earliest departure sent upstream.
    pub departure_after: ResolvedTimestamp,

    /// True if no departure time was given and "now" was used.
    pub departs_now: bool,

    /// All journeys in upstream order (not just the requested page).
    pub options: Vec<JourneyOption>,

    /// The page to render.
    pub page: PageRequest,
}

/// Train search service shared by the tool handlers.
///
/// Holds the upstream API and search settings; nothing else is kept
/// between calls.
#[derive(Clone)]
pub struct TrainSearch {
    api: Arc<dyn TransitApi>,
    config: SearchConfig,
    reference_time: Option<NaiveDateTime>,
}

impl TrainSearch {
    /// Create a new service.
    pub fn new(api: Arc<dyn TransitApi>, config: SearchConfig) -> Self {
        Self {
            api,
            config,
            reference_time: None,
        }
    }

    /// Pin "now" to a fixed instant instead of the host clock.
    pub fn with_reference_time(mut self, reference: NaiveDateTime) -> Self {
        self.reference_time = Some(reference);
        self
    }

    fn resolver(&self) -> DateTimeResolver {
        self.reference_time
            .map(DateTimeResolver::at)
            .unwrap_or_else(DateTimeResolver::now)
    }

    /// Search journeys between two free-text station names.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for page 0, `UnparseableDateTime` for an
    /// unrecognised departure time (checked before any upstream call),
    /// `StationNotFound` if either station has no match, and the upstream
    /// variants if an upstream call fails.
    pub async fn search_trains(
        &self,
        request: &TrainSearchRequest,
    ) -> Result<TrainSearchResult, SearchError> {
        request.validate()?;

        let page_number = usize::try_from(request.page.unwrap_or(1)).unwrap_or(usize::MAX);
        let page = PageRequest::from_page_number(self.config.page_size, page_number)
            .unwrap_or_else(|| PageRequest::first(self.config.page_size));

        let departure_after = self.resolver().resolve(request.departure_datetime.as_deref())?;
        let departs_now = request
            .departure_datetime
            .as_deref()
            .is_none_or(|s| s.trim().is_empty());

        let stations = StationResolver::new(self.api.as_ref(), self.config.candidate_limit);
        let (origin, destination) = try_join(
            stations.resolve(&request.origin),
            stations.resolve(&request.destination),
        )
        .await?;

        let journey_request = JourneyRequest::new(
            origin.selected().external_id.clone(),
            destination.selected().external_id.clone(),
            departure_after,
        )
        .with_count(self.config.max_journeys);

        let options = JourneyQuery::new(self.api.as_ref())
            .run(&journey_request)
            .await?;

        info!(
            origin = %origin.selected().display_name,
            destination = %destination.selected().display_name,
            departure_after = %departure_after,
            journeys = options.len(),
            page = page.page_index() + 1,
            "train search complete"
        );

        Ok(TrainSearchResult {
            origin,
            destination,
            departure_after,
            departs_now,
            options,
            page,
        })
    }

    /// Look up a station name and return the ranked candidates.
    pub async fn find_station(&self, station_name: &str) -> Result<StationMatch, SearchError> {
        StationResolver::new(self.api.as_ref(), self.config.candidate_limit)
            .resolve(station_name)
            .await
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
