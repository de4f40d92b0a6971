use crate::{
    bucket::encode_bucket_options,
    data::{AggregationKind, DataValue, DistributionData, MetricData, Number, SumData, SummaryData},
    error::{Error, Result},
    interval::{cumulative_interval, end_only_interval, gauge_interval},
    series::{Distribution, MetricKind, Point, TypedValue},
};

/// Backend metric kind a converted aggregation is reported as.
pub fn metric_kind(aggregation: AggregationKind) -> Result<MetricKind> {
    let kind = match aggregation {
        AggregationKind::LongSum | AggregationKind::DoubleSum => MetricKind::Cumulative,
        AggregationKind::Int64Summary
        | AggregationKind::DoubleSummary
        | AggregationKind::Int64Distribution
        | AggregationKind::DoubleDistribution => MetricKind::Gauge,
        AggregationKind::Unspecified => {
            return Err(Error::UnsupportedAggregationKind(aggregation));
        }
    };
    Ok(kind)
}

/// Converts one data point to a backend point.
///
/// `Ok(None)` for a point that carries no information: a zero sum, or a summary or
/// distribution that saw no measurements.
pub fn convert(data: &MetricData) -> Result<Option<Point>> {
    match &data.value {
        DataValue::LongSum(sum) => convert_sum(data, sum),
        DataValue::DoubleSum(sum) => convert_sum(data, sum),
        DataValue::Int64Summary(summary) => convert_summary(data, summary),
        DataValue::DoubleSummary(summary) => convert_summary(data, summary),
        DataValue::Int64Distribution(distribution) => convert_distribution(data, distribution),
        DataValue::DoubleDistribution(distribution) => convert_distribution(data, distribution),
    }
}

fn convert_sum<T: Number>(data: &MetricData, sum: &SumData<T>) -> Result<Option<Point>> {
    if sum.sum.is_zero() {
        return Ok(None);
    }
    Ok(Some(Point {
        interval: cumulative_interval(data)?,
        value: sum.sum.into_value(),
    }))
}

fn convert_summary<T: Number>(
    data: &MetricData,
    summary: &SummaryData<T>,
) -> Result<Option<Point>> {
    if summary.count == 0 {
        return Ok(None);
    }
    let mean = summary.sum.as_f64() / summary.count as f64;
    Ok(Some(Point {
        interval: end_only_interval(data.timestamp)?,
        value: TypedValue::DoubleValue(mean),
    }))
}

fn convert_distribution<T: Number>(
    data: &MetricData,
    distribution: &DistributionData<T>,
) -> Result<Option<Point>> {
    if distribution.count == 0 {
        return Ok(None);
    }
    let value = Distribution {
        count: distribution.count,
        mean: distribution.mean,
        sum_of_squared_deviation: distribution.sum_of_squared_deviation,
        bucket_options: encode_bucket_options(distribution.bucket_spec.as_ref())?,
        bucket_counts: distribution.bucket_counts.clone(),
    };
    Ok(Some(Point {
        interval: gauge_interval(data)?,
        value: TypedValue::DistributionValue(value),
    }))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::{data::BucketSpec, series::BucketOptions};

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_metric_kind() {
        assert_eq!(
            metric_kind(AggregationKind::LongSum).unwrap(),
            MetricKind::Cumulative
        );
        assert_eq!(
            metric_kind(AggregationKind::DoubleSummary).unwrap(),
            MetricKind::Gauge
        );
        assert_eq!(
            metric_kind(AggregationKind::Int64Distribution).unwrap(),
            MetricKind::Gauge
        );
        assert!(matches!(
            metric_kind(AggregationKind::Unspecified),
            Err(Error::UnsupportedAggregationKind(AggregationKind::Unspecified))
        ));
    }

    #[test]
    fn test_long_sum() {
        let data =
            MetricData::new(DataValue::LongSum(SumData { sum: 15 }), at(100)).with_start(at(85));
        let point = convert(&data).unwrap().unwrap();
        assert_eq!(point.value, TypedValue::Int64Value(15));
        assert_eq!(point.interval.start_time, Some(at(85)));
        assert_eq!(point.interval.end_time, at(100));
    }

    #[test]
    fn test_double_sum() {
        let data =
            MetricData::new(DataValue::DoubleSum(SumData { sum: 5.0 }), at(100)).with_start(at(0));
        let point = convert(&data).unwrap().unwrap();
        assert_eq!(point.value, TypedValue::DoubleValue(5.0));
    }

    #[test]
    fn test_zero_sum_skipped() {
        // no start timestamp either; the zero check comes first
        let data = MetricData::new(DataValue::LongSum(SumData::default()), at(1));
        assert!(convert(&data).unwrap().is_none());
        let data = MetricData::new(DataValue::DoubleSum(SumData::default()), at(1));
        assert!(convert(&data).unwrap().is_none());
    }

    #[test]
    fn test_summary_mean() {
        let summary = SummaryData {
            count: 2,
            sum: 4.5,
            min: 1.0,
            max: 3.5,
        };
        let data = MetricData::new(DataValue::DoubleSummary(summary), at(9)).with_start(at(1));
        let point = convert(&data).unwrap().unwrap();
        assert_eq!(point.value, TypedValue::DoubleValue(2.25));
        assert_eq!(point.interval.start_time, None);
        assert_eq!(point.interval.end_time, at(9));

        let summary = SummaryData {
            count: 2,
            sum: 5_i64,
            min: 2,
            max: 3,
        };
        let data = MetricData::new(DataValue::Int64Summary(summary), at(9));
        let point = convert(&data).unwrap().unwrap();
        assert_eq!(point.value, TypedValue::DoubleValue(2.5));
    }

    #[test]
    fn test_empty_summary_skipped() {
        let data = MetricData::new(DataValue::Int64Summary(SummaryData::default()), at(1));
        assert!(convert(&data).unwrap().is_none());
        let data = MetricData::new(DataValue::DoubleSummary(SummaryData::default()), at(1));
        assert!(convert(&data).unwrap().is_none());
    }

    #[test]
    fn test_distribution() {
        let distribution = DistributionData {
            count: 6,
            mean: 1.5,
            sum_of_squared_deviation: 3.25,
            bucket_counts: vec![1, 2, 0, 3],
            bucket_spec: Some(BucketSpec::Explicit {
                bounds: vec![1_i64, 2, 3],
            }),
        };
        let data =
            MetricData::new(DataValue::Int64Distribution(distribution), at(42)).with_start(at(2));
        let point = convert(&data).unwrap().unwrap();
        assert_eq!(point.interval.start_time, Some(at(42)));
        assert_eq!(point.interval.end_time, at(42));
        let TypedValue::DistributionValue(value) = point.value else {
            panic!("expected a distribution");
        };
        assert_eq!(value.count, 6);
        assert_eq!(value.mean, 1.5);
        assert_eq!(value.sum_of_squared_deviation, 3.25);
        assert_eq!(value.bucket_counts, [1, 2, 0, 3]);
        assert_eq!(
            value.bucket_options,
            BucketOptions::ExplicitBuckets {
                bounds: vec![1.0, 2.0, 3.0]
            }
        );
    }

    #[test]
    fn test_empty_distribution_skipped() {
        // skipped before bucket options are looked at
        let data = MetricData::new(
            DataValue::DoubleDistribution(DistributionData::default()),
            at(1),
        );
        assert!(convert(&data).unwrap().is_none());
    }

    #[test]
    fn test_distribution_without_buckets() {
        let distribution = DistributionData::<f64> {
            count: 1,
            ..Default::default()
        };
        let data = MetricData::new(DataValue::DoubleDistribution(distribution), at(1));
        assert!(matches!(
            convert(&data),
            Err(Error::UnsupportedBucketOptions)
        ));
    }
}
