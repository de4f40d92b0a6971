use std::time::SystemTime;

use crate::{series::TypedValue, Labels};

/// Tag naming how the instrumentation library aggregated a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    /// Emitted for instruments without an aggregator; nothing converts it.
    Unspecified,
    LongSum,
    DoubleSum,
    Int64Summary,
    DoubleSummary,
    Int64Distribution,
    DoubleDistribution,
}

/// A metric snapshot as handed over by the instrumentation library once per export
/// cycle.
#[derive(Debug, Clone)]
pub struct Metric {
    pub namespace: String,
    pub name: String,
    pub description: String,
    pub aggregation: AggregationKind,
    pub data: Vec<MetricData>,
}
impl Metric {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        aggregation: AggregationKind,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            description: description.into(),
            aggregation,
            data: vec![],
        }
    }
    pub fn with_data(mut self, data: MetricData) -> Self {
        self.data.push(data);
        self
    }
}

/// One data point of a [`Metric`].
#[derive(Debug, Clone)]
pub struct MetricData {
    pub labels: Labels,
    /// Required by cumulative values.
    pub start_timestamp: Option<SystemTime>,
    pub timestamp: SystemTime,
    pub value: DataValue,
}
impl MetricData {
    pub fn new(value: DataValue, timestamp: SystemTime) -> Self {
        Self {
            labels: Labels::new(),
            start_timestamp: None,
            timestamp,
            value,
        }
    }
    pub fn with_start(mut self, start: SystemTime) -> Self {
        self.start_timestamp = Some(start);
        self
    }
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    LongSum(SumData<i64>),
    DoubleSum(SumData<f64>),
    Int64Summary(SummaryData<i64>),
    DoubleSummary(SummaryData<f64>),
    Int64Distribution(DistributionData<i64>),
    DoubleDistribution(DistributionData<f64>),
}
impl DataValue {
    pub fn kind(&self) -> AggregationKind {
        match self {
            Self::LongSum(_) => AggregationKind::LongSum,
            Self::DoubleSum(_) => AggregationKind::DoubleSum,
            Self::Int64Summary(_) => AggregationKind::Int64Summary,
            Self::DoubleSummary(_) => AggregationKind::DoubleSummary,
            Self::Int64Distribution(_) => AggregationKind::Int64Distribution,
            Self::DoubleDistribution(_) => AggregationKind::DoubleDistribution,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SumData<T> {
    pub sum: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryData<T> {
    pub count: i64,
    pub sum: T,
    pub min: T,
    pub max: T,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistributionData<T> {
    pub count: i64,
    pub mean: f64,
    pub sum_of_squared_deviation: f64,
    pub bucket_counts: Vec<i64>,
    pub bucket_spec: Option<BucketSpec<T>>,
}

/// How a distribution's buckets were laid out by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketSpec<T> {
    Explicit {
        bounds: Vec<T>,
    },
    Linear {
        num_finite_buckets: i32,
        offset: T,
        width: T,
    },
    Exponential {
        num_finite_buckets: i32,
        scale: f64,
        growth_factor: f64,
    },
}

/// Integer or floating measurement values.
pub trait Number: Copy + PartialEq + Default + core::fmt::Debug {
    fn as_f64(self) -> f64;
    fn into_value(self) -> TypedValue;

    fn is_zero(self) -> bool {
        self == Self::default()
    }
}
impl Number for i64 {
    fn as_f64(self) -> f64 {
        self as f64
    }
    fn into_value(self) -> TypedValue {
        TypedValue::Int64Value(self)
    }
}
impl Number for f64 {
    fn as_f64(self) -> f64 {
        self
    }
    fn into_value(self) -> TypedValue {
        TypedValue::DoubleValue(self)
    }
}
