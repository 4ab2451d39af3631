//! Rendering entry points.

use askama::Template;

use crate::domain::{JourneyOption, PageRequest, PageSlice};
use crate::search::{SearchError, TrainSearchResult};
use crate::stations::StationMatch;

use super::templates::{
    CandidateView, CandidatesTemplate, ErrorTemplate, JourneyListTemplate, JourneySearchTemplate,
    JourneyView, StationSearchTemplate,
};

/// Width of the banner framing every response, in characters.
pub const BANNER_WIDTH: usize = 35;

/// Width of the rule above and below the journey list.
const RULE_WIDTH: usize = 33;

/// Title of `search_trains` responses.
pub const JOURNEY_SEARCH_TITLE: &str = "SNCF JOURNEY SEARCH";

/// Title of `find_station` responses.
pub const STATION_SEARCH_TITLE: &str = "STATION SEARCH";

/// Rendered when the upstream found no itinerary at all.
pub const NO_JOURNEYS_MESSAGE: &str =
    "No journeys found for this route and time. Try a different time or date.";

/// The banner line.
pub fn banner() -> String {
    "═".repeat(BANNER_WIDTH)
}

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

fn render(template: &impl Template) -> String {
    template
        .render()
        .unwrap_or_else(|e| format!("Template error: {}", e))
}

/// Format a duration as `{H}h {M}min`.
///
/// # Examples
///
/// ```
/// use sncf_server::report::format_duration;
///
/// assert_eq!(format_duration(116), "1h 56min");
/// assert_eq!(format_duration(45), "0h 45min");
/// ```
pub fn format_duration(minutes: i64) -> String {
    format!("{}h {}min", minutes / 60, minutes % 60)
}

/// Render one page of journey options.
///
/// Options are numbered by their position in the full list, so page 2 of
/// size 10 starts at 11. An empty list and a page past the end each get
/// their own message.
pub fn format_journeys(options: &[JourneyOption], page: PageRequest) -> String {
    match page.slice(options) {
        PageSlice::Empty => NO_JOURNEYS_MESSAGE.to_string(),
        PageSlice::Exhausted {
            page_number,
            total_pages,
            total,
        } => format!(
            "No more results: page {page_number} is past the last page \
             ({total_pages}) of {total} journey option(s)."
        ),
        PageSlice::Page(page) => {
            let header = format!(
                "Showing results {}-{} of {} journey option(s) (page {}/{})",
                page.start_index + 1,
                page.end_position(),
                page.total,
                page.page_number,
                page.total_pages,
            );

            let journeys = page
                .items
                .iter()
                .enumerate()
                .map(|(i, option)| JourneyView::from_option(page.start_index + i + 1, option))
                .collect();

            let footer = if page.page_number < page.total_pages {
                format!("More results available: use page {}.", page.page_number + 1)
            } else {
                String::new()
            };

            let template = JourneyListTemplate {
                header,
                journeys,
                footer,
            };
            render(&template).trim_end().to_string()
        }
    }
}

/// Render the candidates considered for a station name, marking the selection.
pub fn format_candidates(station: &StationMatch) -> String {
    let template = CandidatesTemplate {
        query: &station.query,
        candidates: CandidateView::from_match(station),
        selected: &station.selected().display_name,
    };
    render(&template)
}

/// Render a successful train search.
pub fn render_train_search(result: &TrainSearchResult) -> String {
    let banner = banner();
    let rule = rule();
    let origin = format_candidates(&result.origin);
    let destination = format_candidates(&result.destination);
    let journeys = format_journeys(&result.options, result.page);

    let template = JourneySearchTemplate {
        banner: &banner,
        rule: &rule,
        origin: &origin,
        destination: &destination,
        departure: result.departure_after.to_string(),
        departs_now: result.departs_now,
        api_datetime: result.departure_after.to_api_string(),
        journeys: &journeys,
    };
    render(&template)
}

/// Render a successful station lookup.
pub fn render_station_search(station: &StationMatch) -> String {
    let banner = banner();
    let candidates = format_candidates(station);
    let selected = station.selected();

    let template = StationSearchTemplate {
        banner: &banner,
        candidates: &candidates,
        selected_name: &selected.display_name,
        selected_id: selected.external_id.as_str(),
    };
    render(&template)
}

/// Render a failed tool call under the given title.
pub fn render_error(title: &str, error: &SearchError) -> String {
    let banner = banner();
    let template = ErrorTemplate {
        banner: &banner,
        title,
        message: error.to_string(),
        hint: error.hint().unwrap_or_default(),
    };
    render(&template)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{DateTimeResolver, ResolvedTimestamp};
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn instant() -> impl Strategy<Value = NaiveDateTime> {
        (2000i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(|(y, mo, d, h, mi)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, 0)
                .unwrap()
        })
    }

    proptest! {
        /// Displayed departure and arrival re-parse to the exact minute.
        #[test]
        fn render_reparse_roundtrip(start in instant(), minutes in 0i64..3000) {
            let departure = ResolvedTimestamp::new(start);
            let arrival = ResolvedTimestamp::new(start + chrono::Duration::minutes(minutes));
            let option = JourneyOption::new(departure, arrival, 0, vec![]).unwrap();

            let text = format_journeys(&[option], PageRequest::first(10));
            let line = text.lines().find(|l| l.contains("Depart: ")).unwrap();
            let (_, rest) = line.split_once("Depart: ").unwrap();
            let (dep, arr) = rest.split_once(" → Arrive: ").unwrap();

            let resolver = DateTimeResolver::now();
            prop_assert_eq!(resolver.resolve(Some(dep)).unwrap(), departure);
            prop_assert_eq!(resolver.resolve(Some(arr)).unwrap(), arrival);

            let expected = format!("Duration: {}", format_duration(minutes));
            prop_assert!(text.contains(&expected));
        }
    }
}
