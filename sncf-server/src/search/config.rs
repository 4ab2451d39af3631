//! Search configuration.

/// Default number of journeys rendered per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default number of station candidates shown per lookup.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 3;

/// Configuration parameters for the search pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Journeys rendered per page.
    pub page_size: usize,

    /// Station candidates kept (and shown) per lookup.
    pub candidate_limit: usize,

    /// How many journeys to ask the upstream for.
    /// `None` leaves it to the upstream's default.
    pub max_journeys: Option<u32>,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    ///
    /// Zero sizes are bumped to one.
    pub fn new(page_size: usize, candidate_limit: usize, max_journeys: Option<u32>) -> Self {
        Self {
            page_size: page_size.max(1),
            candidate_limit: candidate_limit.max(1),
            max_journeys: max_journeys.filter(|&n| n > 0),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            max_journeys: None,
        }
    }
}
