use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    client::MetricServiceClient,
    config::ExporterConfig,
    convert::{convert, metric_kind},
    data::Metric,
    error::{Error, Result},
    series::{MonitoredResource, Point, ProjectName, TimeSeries},
};

/// Converts metric snapshots and writes them to Cloud Monitoring.
pub struct CloudMonitoringExporter<C> {
    client: Arc<C>,
    project: ProjectName,
    resource: MonitoredResource,
    config: ExporterConfig,
}
impl<C> CloudMonitoringExporter<C>
where
    C: MetricServiceClient,
{
    pub fn new(
        client: C,
        project: ProjectName,
        resource: MonitoredResource,
        config: ExporterConfig,
    ) -> Self {
        Self {
            client: Arc::new(client),
            project,
            resource,
            config,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
    pub fn project(&self) -> &ProjectName {
        &self.project
    }

    /// Blocking I/O
    ///
    /// Points are visited in metric order then data point order. An aggregation
    /// that cannot be converted aborts the export with [`Error::Aborted`]: points
    /// before it have been sent, none after it are, and the error carries the report
    /// of what was sent. Upload failures do not abort; they are collected in the
    /// report.
    ///
    /// `cancel` is checked before every point is queued and before every request.
    #[instrument(skip_all, fields(project = %self.project, metrics = metrics.len()))]
    pub fn export(&self, metrics: &[Metric], cancel: &CancellationToken) -> Result<ExportReport> {
        let mut uploader = Uploader {
            client: self.client.as_ref(),
            project: &self.project,
            batch_size: self.config.batch_size(),
            cancel,
            pending: vec![],
            report: ExportReport::default(),
        };
        let dispatched = self.dispatch(metrics, &mut uploader);
        let flushed = uploader.flush();
        let report = uploader.report;
        if let Err(source) = dispatched.and(flushed) {
            warn!(
                error = %source,
                uploaded = report.uploaded,
                failed = report.failures.len(),
                "export aborted"
            );
            return Err(Error::Aborted {
                source: Box::new(source),
                report,
            });
        }

        info!(
            uploaded = report.uploaded,
            skipped = report.skipped,
            failed = report.failures.len(),
            "export finished"
        );
        Ok(report)
    }

    fn dispatch(&self, metrics: &[Metric], uploader: &mut Uploader<'_, C>) -> Result<()> {
        for metric in metrics {
            for data in &metric.data {
                let kind = metric_kind(metric.aggregation)?;
                let found = data.value.kind();
                if found != metric.aggregation {
                    return Err(Error::MismatchedDataPoint {
                        expected: metric.aggregation,
                        found,
                    });
                }
                let Some(point) = convert(data)? else {
                    debug!(metric = %metric.name, "no data in point, skipping");
                    uploader.report.skipped += 1;
                    continue;
                };
                let series = TimeSeries::new(
                    &self.config.metric_type_prefix,
                    &metric.name,
                    &data.labels,
                    kind,
                    &self.resource,
                );
                uploader.upload(series, point)?;
            }
        }
        Ok(())
    }
}
impl<C> CloudMonitoringExporter<C>
where
    C: MetricServiceClient + 'static,
{
    /// Runs [`Self::export`] on the blocking thread pool.
    pub async fn export_async(
        &self,
        metrics: Vec<Metric>,
        cancel: CancellationToken,
    ) -> Result<ExportReport> {
        let exporter = self.clone();
        tokio::task::spawn_blocking(move || exporter.export(&metrics, &cancel))
            .await
            .map_err(|e| Error::Join(e.to_string()))?
    }
}
impl<C> Clone for CloudMonitoringExporter<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            project: self.project.clone(),
            resource: self.resource.clone(),
            config: self.config.clone(),
        }
    }
}
impl<C> core::fmt::Debug for CloudMonitoringExporter<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CloudMonitoringExporter")
            .field("project", &self.project)
            .field("resource", &self.resource)
            .field("config", &self.config)
            .finish()
    }
}

/// Outcome of one export call.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Time series the backend accepted.
    pub uploaded: usize,
    /// Points that carried no data.
    pub skipped: usize,
    pub failures: Vec<UploadFailure>,
}
impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub metric_type: String,
    /// Shared by every series of the failed request.
    pub error: Arc<anyhow::Error>,
}

struct Uploader<'a, C> {
    client: &'a C,
    project: &'a ProjectName,
    batch_size: usize,
    cancel: &'a CancellationToken,
    pending: Vec<TimeSeries>,
    report: ExportReport,
}
impl<C> Uploader<'_, C>
where
    C: MetricServiceClient,
{
    pub fn upload(&mut self, mut series: TimeSeries, point: Point) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        // one request must not carry the same series twice
        if self.pending.iter().any(|pending| pending.metric == series.metric) {
            self.flush()?;
        }
        series.points.push(point);
        self.pending.push(series);
        if self.pending.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let batch = std::mem::take(&mut self.pending);
        match self.client.create_time_series(self.project, &batch) {
            Ok(()) => self.report.uploaded += batch.len(),
            Err(e) => {
                warn!(
                    series = batch.len(),
                    error = %format!("{e:#}"),
                    "failed to create time series"
                );
                let error = Arc::new(e);
                self.report
                    .failures
                    .extend(batch.into_iter().map(|series| UploadFailure {
                        metric_type: series.metric.metric_type,
                        error: Arc::clone(&error),
                    }));
            }
        }
        Ok(())
    }
}
