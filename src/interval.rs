use std::time::SystemTime;

use crate::{
    data::MetricData,
    error::{Error, Result},
    series::{in_timestamp_range, TimeInterval},
};

/// `[start_timestamp, timestamp]`; the start must be present and not after the end.
pub fn cumulative_interval(data: &MetricData) -> Result<TimeInterval> {
    let end = checked(data.timestamp)?;
    match data.start_timestamp {
        Some(start) if start <= end => Ok(TimeInterval {
            start_time: Some(checked(start)?),
            end_time: end,
        }),
        start => Err(Error::InvalidInterval { start, end }),
    }
}

/// Zero-width interval at the point's timestamp.
pub fn gauge_interval(data: &MetricData) -> Result<TimeInterval> {
    let at = checked(data.timestamp)?;
    Ok(TimeInterval {
        start_time: Some(at),
        end_time: at,
    })
}

pub fn end_only_interval(end: SystemTime) -> Result<TimeInterval> {
    Ok(TimeInterval {
        start_time: None,
        end_time: checked(end)?,
    })
}

fn checked(time: SystemTime) -> Result<SystemTime> {
    if in_timestamp_range(time) {
        Ok(time)
    } else {
        Err(Error::TimestampOutOfRange(time))
    }
}
