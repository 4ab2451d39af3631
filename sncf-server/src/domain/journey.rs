//! Journey types.
//!
//! A `JourneyOption` is one itinerary returned by the upstream journey
//! search. It is read-only and only ever consumed for rendering.

use super::{DomainError, LocationId, ResolvedTimestamp};

/// A request for journeys departing at or after an instant.
///
/// Both endpoints are [`LocationId`]s, so the request can only be built
/// once both stations have actually been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyRequest {
    /// Origin location
    pub from: LocationId,
    /// Destination location
    pub to: LocationId,
    /// Earliest acceptable departure
    pub departure_after: ResolvedTimestamp,
    /// How many itineraries to ask the upstream for (upstream default if `None`)
    pub count: Option<u32>,
}

impl JourneyRequest {
    /// Creates a request using the upstream's default result count.
    pub fn new(from: LocationId, to: LocationId, departure_after: ResolvedTimestamp) -> Self {
        Self {
            from,
            to,
            departure_after,
            count: None,
        }
    }

    /// Ask the upstream for up to `count` itineraries.
    pub fn with_count(mut self, count: Option<u32>) -> Self {
        self.count = count;
        self
    }
}

/// One uninterrupted public-transport segment of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyLeg {
    /// Name of the stop the leg starts from
    pub origin_name: String,
    /// Name of the stop the leg ends at
    pub destination_name: String,
    /// Train ridden, e.g. "TGV INOUI 6617", when the upstream names it
    pub service: Option<String>,
}

impl JourneyLeg {
    /// Creates a new leg.
    pub fn new(origin_name: impl Into<String>, destination_name: impl Into<String>) -> Self {
        Self {
            origin_name: origin_name.into(),
            destination_name: destination_name.into(),
            service: None,
        }
    }

    /// Names the train ridden on this leg.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

/// One itinerary between two locations.
///
/// # Invariants
///
/// - `arrival` is not before `departure`
/// - `duration_minutes` equals `arrival - departure` in whole minutes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyOption {
    departure: ResolvedTimestamp,
    arrival: ResolvedTimestamp,
    duration_minutes: i64,
    transfer_count: u32,
    legs: Vec<JourneyLeg>,
}

impl JourneyOption {
    /// Constructs a journey option, deriving its duration from the timestamps.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `arrival` is before `departure`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sncf_server::domain::{JourneyLeg, JourneyOption, ResolvedTimestamp};
    ///
    /// let dep = ResolvedTimestamp::parse_api("20251120T140000").unwrap();
    /// let arr = ResolvedTimestamp::parse_api("20251120T160400").unwrap();
    /// let option = JourneyOption::new(dep, arr, 0, vec![JourneyLeg::new("Paris", "Lyon")]).unwrap();
    ///
    /// assert_eq!(option.duration_minutes(), 124);
    /// assert!(option.is_direct());
    ///
    /// assert!(JourneyOption::new(arr, dep, 0, vec![]).is_err());
    /// ```
    pub fn new(
        departure: ResolvedTimestamp,
        arrival: ResolvedTimestamp,
        transfer_count: u32,
        legs: Vec<JourneyLeg>,
    ) -> Result<Self, DomainError> {
        let duration_minutes = departure.minutes_until(arrival);
        if duration_minutes < 0 {
            return Err(DomainError::ArrivalBeforeDeparture { departure, arrival });
        }

        Ok(Self {
            departure,
            arrival,
            duration_minutes,
            transfer_count,
            legs,
        })
    }

    /// Departure from the origin.
    pub fn departure(&self) -> ResolvedTimestamp {
        self.departure
    }

    /// Arrival at the destination.
    pub fn arrival(&self) -> ResolvedTimestamp {
        self.arrival
    }

    /// Total door-to-door duration in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }

    /// Number of changes as reported by the upstream.
    pub fn transfer_count(&self) -> u32 {
        self.transfer_count
    }

    /// Public-transport legs in travel order.
    pub fn legs(&self) -> &[JourneyLeg] {
        &self.legs
    }

    /// Returns true if the journey needs no change.
    pub fn is_direct(&self) -> bool {
        self.transfer_count == 0
    }
}
