//! Domain types for the train search.
//!
//! This module contains the validated value types the search pipeline
//! passes around. All types enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod error;
mod journey;
mod page;
mod station;
mod time;

pub use error::DomainError;
pub use journey::{JourneyLeg, JourneyOption, JourneyRequest};
pub use page::{Page, PageRequest, PageSlice};
pub use station::{InvalidLocationId, LocationCandidate, LocationId};
pub use time::{DateTimeResolver, InvalidTimestamp, ResolvedTimestamp, UnparseableDateTime};
