//! Tracker configuration.

/// Configuration for the tracker's external collaborators.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Base URL of the passport identity API, e.g. `http://passport:8080`.
    pub passport_api_host: String,
    /// Per-request timeout for identity lookups in seconds (default: 10).
    pub request_timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            passport_api_host: "http://127.0.0.1:8081".into(),
            request_timeout_secs: 10,
        }
    }
}
