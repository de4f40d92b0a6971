use std::time::{Duration, SystemTime};

use serde::{ser::Error as _, Serialize, Serializer};

use crate::Labels;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    Gauge,
    Cumulative,
}

/// A backend time series, serialized with the proto3 JSON mapping the monitoring API
/// accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub metric: SeriesMetric,
    pub resource: MonitoredResource,
    pub metric_kind: MetricKind,
    pub points: Vec<Point>,
}
impl TimeSeries {
    /// Identity of the series a data point belongs to. Points are appended by the
    /// uploader.
    pub fn new(
        type_prefix: &str,
        metric_name: &str,
        labels: &Labels,
        metric_kind: MetricKind,
        resource: &MonitoredResource,
    ) -> Self {
        let metric = SeriesMetric {
            metric_type: format!("{type_prefix}{metric_name}"),
            labels: labels.clone(),
        };
        Self {
            metric,
            resource: resource.clone(),
            metric_kind,
            points: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesMetric {
    #[serde(rename = "type")]
    pub metric_type: String,
    #[serde(skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoredResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub labels: Labels,
}
impl MonitoredResource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            labels: Labels::new(),
        }
    }
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
    /// A Compute Engine VM.
    pub fn gce_instance(project_id: &str, instance_id: u64, zone: &str) -> Self {
        Self::new("gce_instance")
            .with_label("project_id", project_id)
            .with_label("instance_id", instance_id.to_string())
            .with_label("zone", zone)
    }
}

/// Project the time series are written to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);
impl ProjectName {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self(project_id.into())
    }
    pub fn project_id(&self) -> &str {
        &self.0
    }
}
impl core::fmt::Display for ProjectName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "projects/{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub interval: TimeInterval,
    pub value: TypedValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_timestamp"
    )]
    pub start_time: Option<SystemTime>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub end_time: SystemTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypedValue {
    #[serde(serialize_with = "serialize_int64")]
    Int64Value(i64),
    DoubleValue(f64),
    DistributionValue(Distribution),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    #[serde(serialize_with = "serialize_int64")]
    pub count: i64,
    pub mean: f64,
    pub sum_of_squared_deviation: f64,
    pub bucket_options: BucketOptions,
    #[serde(serialize_with = "serialize_int64s")]
    pub bucket_counts: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BucketOptions {
    ExplicitBuckets {
        bounds: Vec<f64>,
    },
    LinearBuckets {
        num_finite_buckets: i32,
        width: f64,
        offset: f64,
    },
    ExponentialBuckets {
        num_finite_buckets: i32,
        growth_factor: f64,
        scale: f64,
    },
}

/// Body of `projects.timeSeries.create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSeriesRequest<'a> {
    pub time_series: &'a [TimeSeries],
}

/// Whether `time` fits an RFC 3339 timestamp: 1970-01-01 up to the end of year 9999.
pub fn in_timestamp_range(time: SystemTime) -> bool {
    let max = SystemTime::UNIX_EPOCH + Duration::new(253_402_300_799, 999_999_999);
    SystemTime::UNIX_EPOCH <= time && time <= max
}

fn serialize_timestamp<S: Serializer>(time: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
    if !in_timestamp_range(*time) {
        return Err(S::Error::custom(format!("timestamp out of range: {time:?}")));
    }
    s.collect_str(&humantime::format_rfc3339_nanos(*time))
}
fn serialize_opt_timestamp<S: Serializer>(
    time: &Option<SystemTime>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(time) => serialize_timestamp(time, s),
        None => s.serialize_none(),
    }
}
// int64 travels as a decimal string in proto3 JSON
fn serialize_int64<S: Serializer>(value: &i64, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}
fn serialize_int64s<S: Serializer>(values: &[i64], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(values.iter().map(|v| v.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_time_series() {
        let mut labels = Labels::new();
        labels.insert("host".into(), "a".into());
        let resource = MonitoredResource::new("global");
        let series = TimeSeries::new(
            "custom.googleapis.com/server/",
            "latency",
            &labels,
            MetricKind::Gauge,
            &resource,
        );
        assert_eq!(series.metric.metric_type, "custom.googleapis.com/server/latency");
        assert_eq!(series.metric.labels, labels);
        assert_eq!(series.resource, resource);
        assert_eq!(series.metric_kind, MetricKind::Gauge);
        assert!(series.points.is_empty());
    }

    #[test]
    fn test_empty_labels_omitted() {
        let series = TimeSeries::new(
            "p/",
            "m",
            &Labels::new(),
            MetricKind::Cumulative,
            &MonitoredResource::new("global"),
        );
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["metric"], json!({ "type": "p/m" }));
        assert_eq!(value["metricKind"], "CUMULATIVE");
    }

    #[test]
    fn test_point_json() {
        let end = SystemTime::UNIX_EPOCH + Duration::from_secs(60);
        let point = Point {
            interval: TimeInterval {
                start_time: None,
                end_time: end,
            },
            value: TypedValue::Int64Value(15),
        };
        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(
            value,
            json!({
                "interval": { "endTime": "1970-01-01T00:01:00.000000000Z" },
                "value": { "int64Value": "15" },
            })
        );
    }

    #[test]
    fn test_distribution_json() {
        let distribution = Distribution {
            count: 3,
            mean: 2.0,
            sum_of_squared_deviation: 0.5,
            bucket_options: BucketOptions::LinearBuckets {
                num_finite_buckets: 2,
                width: 1.5,
                offset: 0.0,
            },
            bucket_counts: vec![1, 2],
        };
        let value = serde_json::to_value(TypedValue::DistributionValue(distribution)).unwrap();
        assert_eq!(
            value,
            json!({
                "distributionValue": {
                    "count": "3",
                    "mean": 2.0,
                    "sumOfSquaredDeviation": 0.5,
                    "bucketOptions": {
                        "linearBuckets": { "numFiniteBuckets": 2, "width": 1.5, "offset": 0.0 }
                    },
                    "bucketCounts": ["1", "2"],
                }
            })
        );
    }

    #[test]
    fn test_out_of_range_timestamp_not_serialized() {
        let point = Point {
            interval: TimeInterval {
                start_time: None,
                end_time: SystemTime::UNIX_EPOCH - Duration::from_secs(10),
            },
            value: TypedValue::DoubleValue(1.0),
        };
        let err = serde_json::to_value(&point).unwrap_err();
        assert!(err.to_string().contains("timestamp out of range"));

        let far = SystemTime::UNIX_EPOCH + Duration::from_secs(253_402_300_800);
        assert!(!in_timestamp_range(far));
        assert!(in_timestamp_range(SystemTime::UNIX_EPOCH));
    }

    #[test]
    fn test_gce_instance() {
        let resource = MonitoredResource::gce_instance("ops", u64::MAX, "us-east1-b");
        assert_eq!(resource.resource_type, "gce_instance");
        assert_eq!(resource.labels["instance_id"], u64::MAX.to_string());
        assert_eq!(resource.labels["project_id"], "ops");
        assert_eq!(resource.labels["zone"], "us-east1-b");
        assert_eq!(ProjectName::new("ops").to_string(), "projects/ops");
    }
}
