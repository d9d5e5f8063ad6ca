use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use epi_dashboard::models::{HospitalCounts, HospitalRecord, OrderedSeries, QueryFilter};
use epi_dashboard::processors::{
    diff_series, latest_snapshot, rolling_mean, sum_by_date, QueryService,
};
use epi_dashboard::store::Dataset;
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
}

fn record(dep: u8, offset: i64, hosp: Option<i64>) -> HospitalRecord {
    let date = base() + Duration::days(offset);
    HospitalRecord::from_raw(
        dep.to_string(),
        date.to_string(),
        date,
        HospitalCounts {
            hosp,
            ..Default::default()
        },
    )
}

fn rows_strategy() -> impl Strategy<Value = Vec<HospitalRecord>> {
    prop::collection::vec(
        (1u8..6, 0i64..30, prop::option::of(0i64..500)),
        1..60,
    )
    .prop_map(|cells| {
        cells
            .into_iter()
            .map(|(dep, offset, hosp)| record(dep, offset, hosp))
            .collect()
    })
}

fn series_strategy() -> impl Strategy<Value = OrderedSeries<f64>> {
    prop::collection::vec(-10_000i32..10_000, 0..40).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (base() + Duration::days(i as i64), v as f64))
            .collect()
    })
}

proptest! {
    #[test]
    fn filtered_rows_match_filter_and_nothing_is_dropped(
        rows in rows_strategy(),
        dep in 1u8..6,
        start in 0i64..30,
        len in 0i64..30,
    ) {
        let dataset = Dataset::new(rows.clone());
        let code = format!("{:0>2}", dep);
        let filter = QueryFilter::between(base() + Duration::days(start), base() + Duration::days(start + len));

        let filter = if dataset.has_region(&code) { filter.with_region(code) } else { filter };
        let result = QueryService::new(Arc::new(dataset)).query(&filter).unwrap();

        prop_assert!(result.iter().all(|r| filter.matches(r)));
        let expected: Vec<_> = rows.into_iter().filter(|r| filter.matches(r)).collect();
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn sum_by_date_keys_are_distinct_dates(rows in rows_strategy()) {
        let sums = sum_by_date(&rows, "incid_hosp").unwrap();
        let dates: BTreeSet<NaiveDate> = rows.iter().map(|r| r.date).collect();

        prop_assert_eq!(sums.dates().collect::<Vec<_>>(), dates.into_iter().collect::<Vec<_>>());

        let total: f64 = sums.values().sum();
        let expected: i64 = rows.iter().filter_map(|r| r.incid_hosp).sum();
        prop_assert_eq!(total, expected as f64);
    }

    #[test]
    fn diff_reconstructs_series(series in series_strategy()) {
        let diffs = diff_series(&series);
        prop_assert_eq!(diffs.len(), series.len());

        if let Some(first) = series.values().next() {
            let mut running = *first;
            for (diff, original) in diffs.values().skip(1).zip(series.values().skip(1)) {
                running += diff;
                prop_assert_eq!(running, *original);
            }
        }
    }

    #[test]
    fn rolling_mean_of_constant_is_constant(value in -1_000i32..1_000, len in 1usize..30, window in 1usize..10) {
        let series: OrderedSeries<f64> = (0..len)
            .map(|i| (base() + Duration::days(i as i64), value as f64))
            .collect();
        let means = rolling_mean(&series, window).unwrap();

        for (i, mean) in means.values().enumerate() {
            if i + 1 < window {
                prop_assert_eq!(*mean, None);
            } else {
                prop_assert_eq!(*mean, Some(value as f64));
            }
        }
    }

    #[test]
    fn latest_snapshot_holds_only_the_latest_date(rows in rows_strategy()) {
        let latest = latest_snapshot(&rows);
        let max = rows.iter().map(|r| r.date).max().unwrap();

        prop_assert!(!latest.is_empty());
        prop_assert!(latest.iter().all(|r| r.date == max));
        prop_assert_eq!(latest.len(), rows.iter().filter(|r| r.date == max).count());
    }
}
