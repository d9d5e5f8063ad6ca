//! Chart-ready aggregates computed from a filtered row sequence.
//!
//! Every function here is pure and tolerates empty input by returning an
//! empty result.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::{check_metric, Observation, OrderedSeries};

/// Sum `metric` per date, ascending by date. Missing cells count as zero.
pub fn sum_by_date<R: Observation>(
    rows: &[R],
    metric: &str,
) -> Result<OrderedSeries<f64>, ValidationError> {
    check_metric::<R>(metric)?;

    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in rows {
        *sums.entry(row.date()).or_default() += row.metric(metric).unwrap_or(0.0);
    }

    Ok(sums.into_iter().collect())
}

/// Sum `metric` per region code. Rows without a code are not grouped.
pub fn sum_by_region<R: Observation>(
    rows: &[R],
    metric: &str,
) -> Result<BTreeMap<String, f64>, ValidationError> {
    check_metric::<R>(metric)?;

    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for row in rows {
        if let Some(code) = row.region_code() {
            *sums.entry(code.to_string()).or_default() += row.metric(metric).unwrap_or(0.0);
        }
    }

    Ok(sums)
}

/// Like [`sum_by_date`] for several metrics at once: one point per date
/// carrying every requested sum.
pub fn sum_by_date_multi<R: Observation>(
    rows: &[R],
    metrics: &[&str],
) -> Result<OrderedSeries<BTreeMap<String, f64>>, ValidationError> {
    for metric in metrics {
        check_metric::<R>(metric)?;
    }

    let mut sums: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    for row in rows {
        let entry = sums.entry(row.date()).or_insert_with(|| {
            metrics
                .iter()
                .map(|m| (m.to_string(), 0.0))
                .collect()
        });
        for metric in metrics {
            if let (Some(total), Some(value)) = (entry.get_mut(*metric), row.metric(metric)) {
                *total += value;
            }
        }
    }

    Ok(sums.into_iter().collect())
}

/// First difference. The first point, and any point whose difference is not
/// a number, is 0.
pub fn diff_series(series: &OrderedSeries<f64>) -> OrderedSeries<f64> {
    let mut previous: Option<f64> = None;
    series.map(|&value| {
        let diff = match previous {
            Some(prev) => value - prev,
            None => 0.0,
        };
        previous = Some(value);
        if diff.is_nan() {
            0.0
        } else {
            diff
        }
    })
}

/// Simple moving average over `window` consecutive points. The first
/// `window - 1` points, and any window containing a NaN, are `None`.
pub fn rolling_mean(
    series: &OrderedSeries<f64>,
    window: usize,
) -> Result<OrderedSeries<Option<f64>>, ValidationError> {
    if window == 0 {
        return Err(ValidationError::InvalidWindow);
    }

    let values: Vec<f64> = series.values().copied().collect();
    let mut index = 0;
    Ok(series.map(|_| {
        let end = index + 1;
        index += 1;
        if end < window {
            return None;
        }

        let slice = &values[end - window..end];
        if slice.iter().any(|v| v.is_nan()) {
            return None;
        }
        Some(slice.iter().sum::<f64>() / window as f64)
    }))
}

/// All rows sharing the latest date in `rows`, in input order.
pub fn latest_snapshot<R: Observation + Clone>(rows: &[R]) -> Vec<R> {
    let Some(latest) = rows.iter().map(R::date).max() else {
        return Vec::new();
    };

    rows.iter()
        .filter(|row| row.date() == latest)
        .cloned()
        .collect()
}
