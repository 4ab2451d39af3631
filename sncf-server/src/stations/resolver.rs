//! First-ranked-candidate station resolution.

use tracing::{debug, info};

use crate::domain::LocationCandidate;
use crate::navitia::TransitApi;
use crate::search::SearchError;

/// Outcome of a successful station lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationMatch {
    /// The name as the caller typed it
    pub query: String,
    /// Candidates in upstream order, at most the resolver's limit.
    /// Never empty; the first one is the selection.
    candidates: Vec<LocationCandidate>,
}

impl StationMatch {
    /// Build a match from candidates in upstream order.
    ///
    /// Returns `None` if there are no candidates.
    pub fn new(query: impl Into<String>, candidates: Vec<LocationCandidate>) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        Some(Self {
            query: query.into(),
            candidates,
        })
    }

    /// The chosen candidate (the upstream's first-ranked match).
    pub fn selected(&self) -> &LocationCandidate {
        &self.candidates[0]
    }

    /// All retained candidates, selection first.
    pub fn candidates(&self) -> &[LocationCandidate] {
        &self.candidates
    }

    /// Candidates other than the selection.
    pub fn alternates(&self) -> &[LocationCandidate] {
        &self.candidates[1..]
    }
}

/// Resolves station names against the upstream places search.
///
/// No local re-ranking or filtering: the upstream's relevance order is
/// trusted as-is and the first match wins.
pub struct StationResolver<'a> {
    api: &'a dyn TransitApi,
    limit: usize,
}

impl<'a> StationResolver<'a> {
    /// Create a resolver keeping at most `limit` candidates (at least one).
    pub fn new(api: &'a dyn TransitApi, limit: usize) -> Self {
        Self {
            api,
            limit: limit.max(1),
        }
    }

    /// Look up `query` and select the first-ranked candidate.
    ///
    /// # Errors
    ///
    /// `StationNotFound` if the query is blank (no upstream call is made)
    /// or the upstream has no match. Upstream failures are passed through.
    pub async fn resolve(&self, query: &str) -> Result<StationMatch, SearchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SearchError::StationNotFound {
                query: query.to_string(),
            });
        }

        let mut candidates = self.api.search_places(trimmed).await?;
        debug!(query = trimmed, found = candidates.len(), "places search");

        candidates.truncate(self.limit);
        let station =
            StationMatch::new(query, candidates).ok_or_else(|| SearchError::StationNotFound {
                query: query.to_string(),
            })?;
        info!(
            query = trimmed,
            selected = %station.selected().external_id,
            name = %station.selected().display_name,
            "station resolved"
        );
        Ok(station)
    }
}
