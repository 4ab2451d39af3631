//! Train search pipeline.
//!
//! Ties the pieces together for the two tool operations: the date/time
//! resolver, station resolution, the upstream journey query and page
//! selection. Rendering lives in [`crate::report`].

mod config;
mod error;
mod query;
mod service;

pub use config::{DEFAULT_CANDIDATE_LIMIT, DEFAULT_PAGE_SIZE, SearchConfig};
pub use error::SearchError;
pub use query::JourneyQuery;
pub use service::{TrainSearch, TrainSearchRequest, TrainSearchResult};
