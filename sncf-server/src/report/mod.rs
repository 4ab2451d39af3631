//! Plain-text rendering of tool results.
//!
//! Every tool response is a banner-framed block of text meant to be read
//! by an assistant (and relayed to a person), so the wording is explicit
//! about what was searched, what was selected and what was found.

mod format;
mod templates;

pub use format::{
    BANNER_WIDTH, JOURNEY_SEARCH_TITLE, NO_JOURNEYS_MESSAGE, STATION_SEARCH_TITLE, banner,
    format_candidates, format_duration, format_journeys, render_error, render_station_search,
    render_train_search,
};
