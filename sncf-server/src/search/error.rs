//! Search error types.

use crate::domain::UnparseableDateTime;
use crate::navitia::NavitiaError;

/// Errors that end a tool invocation.
///
/// Every variant is terminal: nothing resolved before the failure is
/// reported alongside it.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The requested departure time matched no accepted encoding
    #[error(transparent)]
    UnparseableDateTime(#[from] UnparseableDateTime),

    /// The places search returned nothing for a station name
    #[error("no station found for '{query}'. Please check the spelling or try a different name.")]
    StationNotFound { query: String },

    /// The upstream answered with a non-success status
    #[error("SNCF API request failed with status {status}{}", detail_suffix(.detail))]
    UpstreamRequestFailed { status: u16, detail: Option<String> },

    /// The upstream did not answer within the configured timeout
    #[error("SNCF API did not respond within {timeout_secs}s")]
    UpstreamTimeout { timeout_secs: u64 },

    /// The upstream could not be reached at all
    #[error("could not reach the SNCF API: {message}")]
    UpstreamUnavailable { message: String },

    /// The upstream answered with a body that could not be decoded
    #[error("unexpected response from the SNCF API: {message}")]
    UpstreamResponseInvalid { message: String },

    /// A tool argument was out of range
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl SearchError {
    /// A suggestion for the caller, if there is an obvious one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SearchError::UpstreamRequestFailed {
                status: 401 | 403, ..
            } => Some("Check that SNCF_API holds a valid API key."),
            SearchError::UpstreamRequestFailed { status: 404, .. } => {
                Some("The date may be outside the period covered by the timetable data.")
            }
            SearchError::UpstreamTimeout { .. } | SearchError::UpstreamUnavailable { .. } => {
                Some("The SNCF API may be temporarily unavailable; try again shortly.")
            }
            _ => None,
        }
    }
}

impl From<NavitiaError> for SearchError {
    fn from(err: NavitiaError) -> Self {
        match err {
            NavitiaError::Timeout { timeout_secs } => SearchError::UpstreamTimeout { timeout_secs },
            NavitiaError::Api { status, message } => SearchError::UpstreamRequestFailed {
                status,
                detail: message,
            },
            NavitiaError::Json { message, .. } => SearchError::UpstreamResponseInvalid { message },
            NavitiaError::Http(e) => SearchError::UpstreamUnavailable {
                message: e.to_string(),
            },
            NavitiaError::InvalidConfig(message) => SearchError::UpstreamUnavailable { message },
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}
