//! Journey search against the upstream.

use tracing::{debug, info};

use crate::domain::{JourneyOption, JourneyRequest};
use crate::navitia::TransitApi;

use super::error::SearchError;

/// Runs a single upstream journey search.
///
/// One call per request: no retry, no caching, no local sorting. The
/// upstream's ordering (earliest departure first) is preserved.
pub struct JourneyQuery<'a> {
    api: &'a dyn TransitApi,
}

impl<'a> JourneyQuery<'a> {
    pub fn new(api: &'a dyn TransitApi) -> Self {
        Self { api }
    }

    /// Fetch journeys departing at or after `request.departure_after`.
    ///
    /// An empty list means the upstream found no itinerary; it is not an
    /// error.
    pub async fn run(&self, request: &JourneyRequest) -> Result<Vec<JourneyOption>, SearchError> {
        debug!(
            from = %request.from,
            to = %request.to,
            datetime = %request.departure_after.to_api_string(),
            count = ?request.count,
            "journey search"
        );

        let options = self.api.search_journeys(request).await?;

        info!(
            from = %request.from,
            to = %request.to,
            found = options.len(),
            "journeys fetched"
        );
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationId, ResolvedTimestamp};
    use crate::navitia::FixtureApi;

    fn request() -> JourneyRequest {
        JourneyRequest::new(
            LocationId::parse("admin:fr:75056").unwrap(),
            LocationId::parse("admin:fr:69123").unwrap(),
            ResolvedTimestamp::parse_api("20251120T140000").unwrap(),
        )
    }

    #[tokio::test]
    async fn preserves_upstream_order() {
        let api = FixtureApi::new()
            .with_journeys_json(
                "admin:fr:75056",
                "admin:fr:69123",
                include_str!("../../testdata/journeys_paris_lyon.json"),
            )
            .unwrap();

        let options = JourneyQuery::new(&api).run(&request()).await.unwrap();

        let departures: Vec<_> = options
            .iter()
            .map(|o| o.departure().to_api_string())
            .collect();
        assert_eq!(
            departures,
            ["20251120T140400", "20251120T145900", "20251120T151800"]
        );
        assert_eq!(api.journey_requests(), vec![request()]);
    }

    #[tokio::test]
    async fn unknown_route_is_empty_not_an_error() {
        let api = FixtureApi::new();
        let options = JourneyQuery::new(&api).run(&request()).await.unwrap();
        assert!(options.is_empty());
    }

    #[tokio::test]
    async fn upstream_errors_are_mapped() {
        let api = FixtureApi::new().failing_journeys(404, Some("date is not in data production period"));
        let err = JourneyQuery::new(&api).run(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::UpstreamRequestFailed { status: 404, detail: Some(_) }
        ));

        let api = FixtureApi::new().timing_out_journeys(30);
        let err = JourneyQuery::new(&api).run(&request()).await.unwrap_err();
        assert!(matches!(err, SearchError::UpstreamTimeout { timeout_secs: 30 }));
    }
}
