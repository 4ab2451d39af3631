//! Conversion from Navitia DTOs to domain types.
//!
//! Individual records that fail to convert are logged and skipped rather
//! than failing the whole response.

use tracing::warn;

use crate::domain::{
    DomainError, InvalidTimestamp, JourneyLeg, JourneyOption, LocationCandidate, LocationId,
    ResolvedTimestamp,
};

use super::types::{Journey, JourneysResponse, PlacesResponse, SectionPlace};

/// Placeholder for a section endpoint the upstream did not name.
const UNKNOWN_STOP: &str = "?";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Failed to parse a timestamp
    #[error(transparent)]
    InvalidTimestamp(#[from] InvalidTimestamp),

    /// Data is inconsistent
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Convert a places response to ranked candidates, preserving upstream order.
///
/// `match_rank` is the 1-based position in the upstream list, so a skipped
/// record leaves a gap rather than promoting the ones after it.
pub fn convert_places(response: &PlacesResponse) -> Vec<LocationCandidate> {
    response
        .places
        .iter()
        .enumerate()
        .filter_map(|(i, place)| {
            let rank = u32::try_from(i + 1).unwrap_or(u32::MAX);
            let id = place.id.as_deref().and_then(|id| LocationId::parse(id).ok());
            let name = place.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
            match (id, name) {
                (Some(id), Some(name)) => Some(LocationCandidate::new(name, id, rank)),
                _ => {
                    warn!(rank, id = ?place.id, name = ?place.name, "skipping place without id or name");
                    None
                }
            }
        })
        .collect()
}

/// Convert a journeys response, preserving upstream order.
pub fn convert_journeys(response: &JourneysResponse) -> Vec<JourneyOption> {
    response
        .journeys
        .iter()
        .enumerate()
        .filter_map(|(i, journey)| match convert_journey(journey) {
            Ok(option) => Some(option),
            Err(e) => {
                warn!(index = i, error = %e, "skipping journey");
                None
            }
        })
        .collect()
}

/// Convert a single itinerary.
///
/// Legs are the public transport sections; walks, waits and transfers are
/// not legs. The duration is derived from the departure and arrival times.
pub fn convert_journey(journey: &Journey) -> Result<JourneyOption, ConversionError> {
    let departure = journey
        .departure_date_time
        .as_deref()
        .ok_or(ConversionError::MissingField("departure_date_time"))?;
    let departure = ResolvedTimestamp::parse_api(departure)?;

    let arrival = journey
        .arrival_date_time
        .as_deref()
        .ok_or(ConversionError::MissingField("arrival_date_time"))?;
    let arrival = ResolvedTimestamp::parse_api(arrival)?;

    let legs = journey
        .sections
        .iter()
        .filter(|s| s.is_public_transport())
        .map(|s| {
            let stop_name = |place: &Option<SectionPlace>| {
                place
                    .as_ref()
                    .and_then(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_STOP.to_string())
            };
            let leg = JourneyLeg::new(stop_name(&s.from), stop_name(&s.to));
            match s.service_name() {
                Some(service) => leg.with_service(service),
                None => leg,
            }
        })
        .collect();

    let transfers = journey.nb_transfers.unwrap_or(0);

    Ok(JourneyOption::new(departure, arrival, transfers, legs)?)
}
