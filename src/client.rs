use anyhow::Context;

use crate::{
    config::ClientConfig,
    series::{CreateTimeSeriesRequest, ProjectName, TimeSeries},
};

/// Writes time series to the monitoring backend.
///
/// Retries and backoff belong to implementations; the exporter calls each batch
/// exactly once.
pub trait MetricServiceClient: Send + Sync {
    /// Blocking I/O
    fn create_time_series(&self, project: &ProjectName, series: &[TimeSeries])
        -> anyhow::Result<()>;
}

/// `projects.timeSeries.create` over HTTP/JSON.
pub struct HttpMetricServiceClient {
    client: ureq::Agent,
    endpoint: String,
    access_token: Option<String>,
}
impl HttpMetricServiceClient {
    pub fn new(config: &ClientConfig) -> Self {
        let client = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        }
    }

    pub fn url(&self, project: &ProjectName) -> String {
        format!("{}/v3/{project}/timeSeries", self.endpoint)
    }
}
impl MetricServiceClient for HttpMetricServiceClient {
    fn create_time_series(
        &self,
        project: &ProjectName,
        series: &[TimeSeries],
    ) -> anyhow::Result<()> {
        let body = CreateTimeSeriesRequest {
            time_series: series,
        };
        let mut req = self.client.post(&self.url(project));
        if let Some(token) = &self.access_token {
            req = req.set("Authorization", &format!("Bearer {token}"));
        }
        match req.send_json(&body) {
            Ok(_resp) => Ok(()),
            Err(ureq::Error::Status(code, resp)) => {
                let detail = resp.into_string().unwrap_or_default();
                anyhow::bail!("create time series in {project}: status {code}: {detail}")
            }
            Err(e) => Err(e).with_context(|| format!("create time series in {project}")),
        }
    }
}
impl core::fmt::Debug for HttpMetricServiceClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpMetricServiceClient")
            .field("endpoint", &self.endpoint)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
