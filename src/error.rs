use std::time::SystemTime;

use thiserror::Error;

use crate::{data::AggregationKind, exporter::ExportReport};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported aggregation kind: {0:?}")]
    UnsupportedAggregationKind(AggregationKind),

    #[error("data point of kind {found:?} does not match metric aggregation {expected:?}")]
    MismatchedDataPoint {
        expected: AggregationKind,
        found: AggregationKind,
    },

    /// The distribution carries no bucket options the backend can express.
    #[error("unsupported bucket options")]
    UnsupportedBucketOptions,

    #[error("invalid cumulative interval: start {start:?} end {end:?}")]
    InvalidInterval {
        start: Option<SystemTime>,
        end: SystemTime,
    },

    /// Outside what RFC 3339 can express: before 1970 or after year 9999.
    #[error("timestamp out of range: {0:?}")]
    TimestampOutOfRange(SystemTime),

    #[error("export cancelled")]
    Cancelled,

    /// An export stopped early. `report` covers the points handled before the stop.
    #[error("export aborted: {source}")]
    Aborted {
        source: Box<Error>,
        report: ExportReport,
    },

    #[error("export task failed: {0}")]
    Join(String),
}
impl Error {
    /// The error that stopped an aborted export, `self` otherwise.
    pub fn reason(&self) -> &Error {
        match self {
            Self::Aborted { source, .. } => source,
            other => other,
        }
    }
    pub fn report(&self) -> Option<&ExportReport> {
        match self {
            Self::Aborted { report, .. } => Some(report),
            _ => None,
        }
    }
}
