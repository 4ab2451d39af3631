//! SNCF train search tool server.
//!
//! An MCP server that lets an assistant search French rail journeys
//! through the SNCF (Navitia) API: flexible date parsing, station name
//! resolution, journey search and paginated plain-text results.

pub mod config;
pub mod domain;
pub mod mcp;
pub mod navitia;
pub mod report;
pub mod search;
pub mod stations;
