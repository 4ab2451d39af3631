//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from API/IO errors.

use super::ResolvedTimestamp;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// An itinerary claims to arrive before it departs
    #[error("journey arrives at {arrival} before departing at {departure}")]
    ArrivalBeforeDeparture {
        departure: ResolvedTimestamp,
        arrival: ResolvedTimestamp,
    },
}
