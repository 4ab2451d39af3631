//! Server configuration.
//!
//! Every setting can be given as a command-line flag or an environment
//! variable; `main` loads a `.env` file first, so the variables can live
//! there too.

use std::fmt;

use clap::Parser;
use clap::builder::RangedU64ValueParser;

use crate::navitia::{DEFAULT_BASE_URL, DEFAULT_COVERAGE, DEFAULT_TIMEOUT_SECS, NavitiaConfig};
use crate::search::{DEFAULT_CANDIDATE_LIMIT, DEFAULT_PAGE_SIZE, SearchConfig};

/// SNCF train search MCP server (JSON-RPC over stdio).
#[derive(Clone, Parser)]
#[command(name = "sncf-server", version, about, long_about = None)]
pub struct ServerConfig {
    /// SNCF API key (sent as the Basic auth username)
    #[arg(long, env = "SNCF_API", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the SNCF API
    #[arg(long, env = "SNCF_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Coverage region to query
    #[arg(long, env = "SNCF_COVERAGE", default_value = DEFAULT_COVERAGE)]
    pub coverage: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "SNCF_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Journeys shown per page
    #[arg(long, env = "SNCF_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE,
          value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub page_size: usize,

    /// Station candidates shown per lookup
    #[arg(long, env = "SNCF_CANDIDATES", default_value_t = DEFAULT_CANDIDATE_LIMIT,
          value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub candidates: usize,

    /// Journeys to request from the upstream (upstream default if unset)
    #[arg(long, env = "SNCF_MAX_JOURNEYS",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub max_journeys: Option<u32>,
}

impl ServerConfig {
    /// Upstream client settings.
    pub fn navitia(&self) -> NavitiaConfig {
        NavitiaConfig::new(&self.api_key)
            .with_base_url(&self.base_url)
            .with_coverage(&self.coverage)
            .with_timeout(self.timeout_secs)
    }

    /// Search pipeline settings.
    pub fn search(&self) -> SearchConfig {
        SearchConfig::new(self.page_size, self.candidates, self.max_journeys)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("coverage", &self.coverage)
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .field("candidates", &self.candidates)
            .field("max_journeys", &self.max_journeys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ServerConfig::try_parse_from(["sncf-server", "--api-key", "k"]).unwrap();

        assert_eq!(config.api_key, "k");
        assert_eq!(config.base_url, "https://api.sncf.com/v1");
        assert_eq!(config.coverage, "sncf");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.candidates, 3);
        assert_eq!(config.max_journeys, None);
    }

    #[test]
    fn config_flags() {
        let config = ServerConfig::try_parse_from([
            "sncf-server",
            "--api-key",
            "k",
            "--base-url",
            "http://localhost:9999",
            "--coverage",
            "fr-idf",
            "--timeout-secs",
            "5",
            "--page-size",
            "4",
            "--candidates",
            "5",
            "--max-journeys",
            "40",
        ])
        .unwrap();

        let navitia = config.navitia();
        assert_eq!(navitia.api_key, "k");
        assert_eq!(navitia.base_url, "http://localhost:9999");
        assert_eq!(navitia.coverage, "fr-idf");
        assert_eq!(navitia.timeout_secs, 5);

        assert_eq!(config.search(), SearchConfig::new(4, 5, Some(40)));
    }

    #[test]
    fn zero_sizes_rejected() {
        assert!(
            ServerConfig::try_parse_from(["sncf-server", "--api-key", "k", "--page-size", "0"])
                .is_err()
        );
        assert!(
            ServerConfig::try_parse_from(["sncf-server", "--api-key", "k", "--max-journeys", "0"])
                .is_err()
        );
        assert!(
            ServerConfig::try_parse_from(["sncf-server", "--api-key", "k", "--timeout-secs", "0"])
                .is_err()
        );
        assert!(
            ServerConfig::try_parse_from(["sncf-server", "--api-key", "k", "--candidates", "0"])
                .is_err()
        );
    }

    #[test]
    fn debug_hides_key() {
        let config =
            ServerConfig::try_parse_from(["sncf-server", "--api-key", "super-secret"]).unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        ServerConfig::command().debug_assert();
    }
}
