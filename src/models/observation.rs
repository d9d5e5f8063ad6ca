use chrono::NaiveDate;

use crate::error::ValidationError;

/// One daily row of a time-series dataset, as seen by the query service and
/// the aggregation pipeline.
pub trait Observation {
    /// Metric column names this row type can be aggregated on.
    const METRICS: &'static [&'static str];

    fn date(&self) -> NaiveDate;

    /// Normalized region code. `None` when the source row could not be mapped.
    fn region_code(&self) -> Option<&str>;

    /// Value of `name` for this row. Missing cells and unknown names both
    /// yield `None`; use [`check_metric`] to tell them apart.
    fn metric(&self, name: &str) -> Option<f64>;
}

pub fn check_metric<R: Observation>(name: &str) -> Result<(), ValidationError> {
    if R::METRICS.contains(&name) {
        Ok(())
    } else {
        Err(ValidationError::UnknownMetric(name.to_string()))
    }
}
