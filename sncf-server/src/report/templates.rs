//! Askama templates for tool responses.

use askama::Template;

use crate::domain::JourneyOption;
use crate::stations::StationMatch;

// ============================================================================
// Document Templates (a whole tool response, banner to banner)
// ============================================================================

/// Successful train search.
#[derive(Template)]
#[template(path = "journey_search.txt")]
pub struct JourneySearchTemplate<'a> {
    pub banner: &'a str,
    pub rule: &'a str,
    pub origin: &'a str,
    pub destination: &'a str,
    pub departure: String,
    pub departs_now: bool,
    pub api_datetime: String,
    pub journeys: &'a str,
}

/// Successful station lookup.
#[derive(Template)]
#[template(path = "station_search.txt")]
pub struct StationSearchTemplate<'a> {
    pub banner: &'a str,
    pub candidates: &'a str,
    pub selected_name: &'a str,
    pub selected_id: &'a str,
}

/// Any failed tool call.
#[derive(Template)]
#[template(path = "error.txt")]
pub struct ErrorTemplate<'a> {
    pub banner: &'a str,
    pub title: &'a str,
    pub message: String,
    /// Empty if there is nothing to suggest
    pub hint: &'a str,
}

// ============================================================================
// Fragment Templates (embedded in a document)
// ============================================================================

/// One page of journeys.
#[derive(Template)]
#[template(path = "journey_list.txt")]
pub struct JourneyListTemplate {
    pub header: String,
    pub journeys: Vec<JourneyView>,
    /// Pointer to the next page, empty on the last page
    pub footer: String,
}

/// Candidates considered for one station name.
#[derive(Template)]
#[template(path = "candidates.txt")]
pub struct CandidatesTemplate<'a> {
    pub query: &'a str,
    pub candidates: Vec<CandidateView<'a>>,
    pub selected: &'a str,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Journey view model for templates.
#[derive(Debug, Clone)]
pub struct JourneyView {
    /// 1-based position in the full result list
    pub number: usize,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub transfers: String,
    /// Legs joined for display; empty for direct journeys
    pub route: String,
    /// Named trains in leg order; empty when the upstream names none
    pub trains: String,
}

impl JourneyView {
    /// Create from a domain journey option at 1-based position `number`.
    pub fn from_option(number: usize, option: &JourneyOption) -> Self {
        let transfers = match option.transfer_count() {
            0 => "Direct".to_string(),
            k => format!("{k} change(s)"),
        };

        let route = if option.is_direct() {
            String::new()
        } else {
            option
                .legs()
                .iter()
                .map(|leg| format!("{} → {}", leg.origin_name, leg.destination_name))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        let trains = option
            .legs()
            .iter()
            .filter_map(|leg| leg.service.as_deref())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            number,
            departure: option.departure().to_string(),
            arrival: option.arrival().to_string(),
            duration: super::format::format_duration(option.duration_minutes()),
            transfers,
            route,
            trains,
        }
    }
}

/// Station candidate view model for templates.
#[derive(Debug, Clone)]
pub struct CandidateView<'a> {
    /// "✓" for the selected candidate, a space otherwise
    pub marker: &'static str,
    pub name: &'a str,
    pub id: &'a str,
}

impl<'a> CandidateView<'a> {
    /// One view per retained candidate, selection first.
    pub fn from_match(station: &'a StationMatch) -> Vec<Self> {
        station
            .candidates()
            .iter()
            .enumerate()
            .map(|(i, c)| CandidateView {
                marker: if i == 0 { "✓" } else { " " },
                name: &c.display_name,
                id: c.external_id.as_str(),
            })
            .collect()
    }
}
