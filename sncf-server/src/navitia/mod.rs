//! Navitia journey-planning API client.
//!
//! This module provides an HTTP client for the SNCF open-data API, which
//! is a Navitia instance. Two endpoints are used:
//!
//! - `places` for free-text location search, returning ranked matches
//! - `journeys` for itineraries between two location identifiers
//!
//! Key characteristics of the API:
//! - HTTP Basic authentication with the API key as username and an
//!   empty password
//! - Timestamps are naive local time in `YYYYMMDDThhmmss` form
//! - Empty result lists are often omitted from the JSON entirely

mod api;
mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use api::TransitApi;
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_COVERAGE, DEFAULT_TIMEOUT_SECS, NavitiaClient, NavitiaConfig,
};
pub use convert::{ConversionError, convert_journey, convert_journeys, convert_places};
pub use error::NavitiaError;
pub use mock::FixtureApi;
pub use types::{
    ApiErrorBody, ErrorResponse, Journey, JourneysResponse, Place, PlacesResponse, Section,
    SectionPlace,
};
