use std::time::Duration;

use serde::Deserialize;

/// Metric types of custom metrics written by this exporter start with this.
pub const DEFAULT_METRIC_TYPE_PREFIX: &str = "custom.googleapis.com/server/";
pub const DEFAULT_ENDPOINT: &str = "https://monitoring.googleapis.com";
/// Most time series the backend accepts in one `timeSeries.create` call.
pub const MAX_SERIES_PER_REQUEST: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct ExporterConfig {
    #[serde(default = "default_metric_type_prefix")]
    pub metric_type_prefix: String,

    /// Upload batch size. `1` sends every point on its own.
    #[serde(default = "default_max_series_per_request")]
    pub max_series_per_request: usize,

    #[serde(default)]
    pub client: ClientConfig,
}
impl ExporterConfig {
    pub fn batch_size(&self) -> usize {
        self.max_series_per_request.clamp(1, MAX_SERIES_PER_REQUEST)
    }
}
impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            metric_type_prefix: default_metric_type_prefix(),
            max_series_per_request: default_max_series_per_request(),
            client: ClientConfig::default(),
        }
    }
}

/// Settings of [`crate::client::HttpMetricServiceClient`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// OAuth2 bearer token. Acquiring and refreshing it is up to the caller.
    #[serde(default)]
    pub access_token: Option<String>,
}
impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            access_token: None,
        }
    }
}

fn default_metric_type_prefix() -> String {
    DEFAULT_METRIC_TYPE_PREFIX.to_string()
}
fn default_max_series_per_request() -> usize {
    1
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
