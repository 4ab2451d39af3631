//! Navitia API response DTOs.
//!
//! These types map directly to the Navitia JSON responses. They use
//! `Option` and `#[serde(default)]` liberally because Navitia omits
//! fields (including whole lists) rather than sending empty values.
//! Unknown fields are ignored.

use serde::Deserialize;

/// Response from `coverage/{coverage}/places`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacesResponse {
    /// Ranked matches, most relevant first. Absent when nothing matched.
    #[serde(default)]
    pub places: Vec<Place>,
}

/// A place returned by the places search.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    /// Identifier, e.g. "stop_area:SNCF:87686006" or "admin:fr:75056".
    pub id: Option<String>,

    /// Display name, e.g. "Paris Gare de Lyon (Paris)".
    pub name: Option<String>,
}

/// Response from `coverage/{coverage}/journeys`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JourneysResponse {
    /// Itineraries, earliest departure first. Absent on "no_solution".
    #[serde(default)]
    pub journeys: Vec<Journey>,

    /// Error object the upstream may attach to a 200 response.
    pub error: Option<ApiErrorBody>,
}

/// One itinerary.
#[derive(Debug, Clone, Deserialize)]
pub struct Journey {
    /// Departure from the origin, `YYYYMMDDThhmmss`.
    pub departure_date_time: Option<String>,

    /// Arrival at the destination, `YYYYMMDDThhmmss`.
    pub arrival_date_time: Option<String>,

    /// Number of changes.
    pub nb_transfers: Option<u32>,

    /// Sections in travel order (walks, waits, transfers, trains).
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A section of an itinerary.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    /// "public_transport", "street_network", "transfer", "waiting", ...
    #[serde(rename = "type")]
    pub section_type: Option<String>,

    /// Where the section starts.
    pub from: Option<SectionPlace>,

    /// Where the section ends.
    pub to: Option<SectionPlace>,

    /// Line and vehicle details for public transport sections.
    pub display_informations: Option<DisplayInformations>,
}

impl Section {
    /// Returns true if this section is ridden on a vehicle.
    pub fn is_public_transport(&self) -> bool {
        self.section_type.as_deref() == Some("public_transport")
    }

    /// Mode and train number, e.g. "TGV INOUI 6617", if either is given.
    pub fn service_name(&self) -> Option<String> {
        let info = self.display_informations.as_ref()?;
        let parts: Vec<&str> = [info.commercial_mode.as_deref(), info.headsign.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

/// Endpoint of a section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionPlace {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Vehicle details for a public transport section.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayInformations {
    /// e.g. "TGV INOUI", "TER"
    pub commercial_mode: Option<String>,
    /// Train number, e.g. "6601"
    pub headsign: Option<String>,
}

/// Body of a non-success response.
///
/// Navitia reports most failures as `{"error": {"id", "message"}}`;
/// authentication failures come back as a bare `{"message"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<ApiErrorBody>,
    pub message: Option<String>,
}

impl ErrorResponse {
    /// The most specific human-readable message available.
    pub fn detail(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .or(self.message.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

/// Upstream error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable id, e.g. "no_solution", "date_out_of_bounds".
    pub id: Option<String>,
    pub message: Option<String>,
}
