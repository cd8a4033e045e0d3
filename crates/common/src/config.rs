use serde::Deserialize;

/// Global application configuration loaded from environment variables.
///
/// Operator-facing knobs (RPC URL, ilk selection, target price) come from the
/// CLI; these are the service-level settings with sensible defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Vulcanize GraphQL endpoint serving ilk and urn state
    pub vulcanize_url: String,

    /// Timeout for Vulcanize HTTP requests in seconds (default: 30)
    pub http_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            vulcanize_url: std::env::var("VAULTS_VDB_URL")
                .unwrap_or_else(|_| "https://api.makerdao.com/graphql".to_string()),
            http_timeout_secs: std::env::var("VAULTS_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("VAULTS_HTTP_TIMEOUT_SECS must be a valid u64"))?,
        })
    }
}
