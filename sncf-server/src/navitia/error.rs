//! Navitia client error types.

/// Errors from the Navitia HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum NavitiaError {
    /// The request did not complete within the configured timeout
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// HTTP request failed (connection refused, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// API returned a non-success status code
    #[error("API error {status}{}", detail_suffix(.message))]
    Api { status: u16, message: Option<String> },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Client could not be built from the given configuration
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}
