pub mod bucket;
pub mod client;
pub mod config;
pub mod convert;
pub mod data;
pub mod error;
pub mod exporter;
pub mod interval;
pub mod series;

pub use client::{HttpMetricServiceClient, MetricServiceClient};
pub use config::ExporterConfig;
pub use error::{Error, Result};
pub use exporter::{CloudMonitoringExporter, ExportReport, UploadFailure};
pub use tokio_util::sync::CancellationToken;

/// Label set of a data point or resource. Keys are unique.
pub type Labels = std::collections::BTreeMap<String, String>;
