use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sncf_server::config::ServerConfig;
use sncf_server::mcp::{FindStationTool, McpServer, SearchTrainsTool, ToolRegistry};
use sncf_server::navitia::{NavitiaClient, TransitApi};
use sncf_server::search::TrainSearch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set
    dotenvy::dotenv().ok();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = ServerConfig::parse();
    info!(
        base_url = %config.base_url,
        coverage = %config.coverage,
        timeout_secs = config.timeout_secs,
        "SNCF server starting"
    );

    let client = NavitiaClient::new(config.navitia()).context("failed to create SNCF API client")?;
    let api: Arc<dyn TransitApi> = Arc::new(client);
    let search = TrainSearch::new(api, config.search());

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchTrainsTool::new(search.clone())));
    registry.register(Arc::new(FindStationTool::new(search)));
    info!("Registered {} tools", registry.len());

    McpServer::new(registry)
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await
        .context("MCP server failed")?;

    Ok(())
}
