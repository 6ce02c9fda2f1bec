use std::net::IpAddr;
use std::str::FromStr;

use serde::Deserialize;

/// Where the analytics payloads come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsMode {
    /// Fixed sample data for every analysis
    Sample,
    /// Transaction flow built from the upstream data provider
    Live,
}

impl FromStr for AnalyticsMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sample" => Ok(AnalyticsMode::Sample),
            "live" => Ok(AnalyticsMode::Live),
            other => Err(anyhow::anyhow!(
                "ANALYTICS_MODE must be 'sample' or 'live', got '{}'",
                other
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// TCP port the API listens on (default: 8080)
    pub port: u16,

    /// Interface to bind (default: all interfaces)
    pub bind_address: IpAddr,

    /// Base URL of the blockchain data provider
    pub upstream_base_url: String,

    /// API key sent to the data provider; required in live mode
    pub upstream_api_key: Option<String>,

    /// Chain segment used in provider paths, e.g. `svm`
    pub upstream_chain: String,

    /// Timeout for each outbound provider call in seconds (default: 30)
    pub upstream_timeout_secs: u64,

    /// Base URL of the provider's saved-query API
    pub query_base_url: String,

    /// Delay before each saved-query status check in milliseconds (default: 2000)
    pub query_poll_interval_ms: u64,

    /// Status checks before a saved-query execution is given up (default: 10)
    pub query_max_polls: u32,

    pub analytics_mode: AnalyticsMode,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid u16"))?,
            bind_address: lookup("BIND_ADDRESS")
                .unwrap_or_else(|| "0.0.0.0".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("BIND_ADDRESS must be a valid IP address"))?,
            upstream_base_url: lookup("DUNE_API_BASE_URL")
                .unwrap_or_else(|| "https://api.dune.com/api/echo/beta".to_string()),
            upstream_api_key: lookup("DUNE_API_KEY").filter(|key| !key.is_empty()),
            upstream_chain: lookup("DUNE_CHAIN").unwrap_or_else(|| "svm".to_string()),
            upstream_timeout_secs: lookup("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("UPSTREAM_TIMEOUT_SECS must be a valid u64"))?,
            query_base_url: lookup("DUNE_QUERY_API_BASE_URL")
                .unwrap_or_else(|| "https://api.dune.com/api/v1".to_string()),
            query_poll_interval_ms: lookup("DUNE_QUERY_POLL_INTERVAL_MS")
                .unwrap_or_else(|| "2000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DUNE_QUERY_POLL_INTERVAL_MS must be a valid u64"))?,
            query_max_polls: lookup("DUNE_QUERY_MAX_POLLS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DUNE_QUERY_MAX_POLLS must be a valid u32"))?,
            analytics_mode: lookup("ANALYTICS_MODE")
                .unwrap_or_else(|| "sample".to_string())
                .parse()?,
        };

        if config.analytics_mode == AnalyticsMode::Live && config.upstream_api_key.is_none() {
            anyhow::bail!("DUNE_API_KEY environment variable is required in live mode");
        }

        Ok(config)
    }
}
