//! The SNCF tools: `search_trains` and `find_station`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::report::{
    JOURNEY_SEARCH_TITLE, STATION_SEARCH_TITLE, render_error, render_station_search,
    render_train_search,
};
use crate::search::{TrainSearch, TrainSearchRequest};

use super::protocol::{CallToolResult, ToolSchema};
use super::registry::{
    Tool, ToolError, json_schema_integer, json_schema_object, json_schema_string,
};

/// Search journeys between two stations.
pub struct SearchTrainsTool {
    search: TrainSearch,
}

impl SearchTrainsTool {
    pub const NAME: &'static str = "search_trains";

    pub fn new(search: TrainSearch) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for SearchTrainsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.to_string(),
            description: "Search for train journeys between two stations. Station names are \
                          resolved to the best upstream match, and alternates are shown. \
                          Results are paginated."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "origin": json_schema_string(
                        "Starting station name (e.g. \"Paris Est\", \"Lyon\")"
                    ),
                    "destination": json_schema_string(
                        "Destination station name (e.g. \"Marseille\", \"Bordeaux\")"
                    ),
                    "departure_datetime": json_schema_string(
                        "Earliest departure. Accepts \"2025-11-28 08:00\" (recommended), \
                         \"28/11/2025 08:00\" (day first), or \"November 28, 2025 8:00am\". \
                         Defaults to now."
                    ),
                    "page": json_schema_integer("1-based page of results (default 1)", 1),
                }),
                &["origin", "destination"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let request: TrainSearchRequest =
            serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
                tool: Self::NAME,
                source,
            })?;

        info!(
            origin = %request.origin,
            destination = %request.destination,
            departure = ?request.departure_datetime,
            page = ?request.page,
            "search_trains"
        );

        match self.search.search_trains(&request).await {
            Ok(result) => Ok(CallToolResult::text(render_train_search(&result))),
            Err(e) => {
                warn!(error = %e, "search_trains failed");
                Ok(CallToolResult::error(render_error(JOURNEY_SEARCH_TITLE, &e)))
            }
        }
    }
}

/// Arguments of `find_station`.
#[derive(Debug, Deserialize)]
struct FindStationArgs {
    station_name: String,
}

/// Look up a station name and show the ranked candidates.
pub struct FindStationTool {
    search: TrainSearch,
}

impl FindStationTool {
    pub const NAME: &'static str = "find_station";

    pub fn new(search: TrainSearch) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for FindStationTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.to_string(),
            description: "Search for a train station by name and list the best matches with \
                          their IDs. Useful for checking a station name before searching."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "station_name": json_schema_string(
                        "Station name to search for (e.g. \"Paris\", \"Lyon Part-Dieu\")"
                    ),
                }),
                &["station_name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult, ToolError> {
        let args: FindStationArgs =
            serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
                tool: Self::NAME,
                source,
            })?;

        info!(station_name = %args.station_name, "find_station");

        match self.search.find_station(&args.station_name).await {
            Ok(station) => Ok(CallToolResult::text(render_station_search(&station))),
            Err(e) => {
                warn!(error = %e, "find_station failed");
                Ok(CallToolResult::error(render_error(STATION_SEARCH_TITLE, &e)))
            }
        }
    }
}
