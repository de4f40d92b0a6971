use crate::{
    data::{BucketSpec, Number},
    error::{Error, Result},
    series::BucketOptions,
};

/// Maps an aggregator's bucket layout onto the backend's bucket options.
///
/// Integer bounds, offsets and widths are widened to `f64`; everything else is
/// copied as is, bound order included.
pub fn encode_bucket_options<T: Number>(spec: Option<&BucketSpec<T>>) -> Result<BucketOptions> {
    let Some(spec) = spec else {
        return Err(Error::UnsupportedBucketOptions);
    };
    let options = match spec {
        BucketSpec::Explicit { bounds } => BucketOptions::ExplicitBuckets {
            bounds: bounds.iter().map(|bound| bound.as_f64()).collect(),
        },
        BucketSpec::Linear {
            num_finite_buckets,
            offset,
            width,
        } => BucketOptions::LinearBuckets {
            num_finite_buckets: *num_finite_buckets,
            width: width.as_f64(),
            offset: offset.as_f64(),
        },
        BucketSpec::Exponential {
            num_finite_buckets,
            scale,
            growth_factor,
        } => BucketOptions::ExponentialBuckets {
            num_finite_buckets: *num_finite_buckets,
            growth_factor: *growth_factor,
            scale: *scale,
        },
    };
    Ok(options)
}
