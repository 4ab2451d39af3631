//! The upstream capabilities the search pipeline depends on.

use async_trait::async_trait;

use crate::domain::{JourneyOption, JourneyRequest, LocationCandidate};

use super::error::NavitiaError;

/// Trait for the journey-planning upstream.
///
/// This abstraction allows the search pipeline to be tested with fixture
/// data. Implementations must be safe to share between concurrent calls.
#[async_trait]
pub trait TransitApi: Send + Sync {
    /// Free-text place search. Returns candidates in upstream relevance order.
    async fn search_places(&self, query: &str) -> Result<Vec<LocationCandidate>, NavitiaError>;

    /// Journeys departing at or after `request.departure_after`, in upstream order.
    async fn search_journeys(
        &self,
        request: &JourneyRequest,
    ) -> Result<Vec<JourneyOption>, NavitiaError>;
}
