use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::models::hospital::{INCID_DC, INCID_HOSP, INCID_REA};
use crate::models::state::{CASES, DEATHS};
use crate::models::{HospitalRecord, OrderedSeries, StateRecord};
use crate::processors::{
    diff_series, latest_snapshot, rolling_mean, sum_by_date, sum_by_date_multi, sum_by_region,
};
use crate::utils::constants::BOUNDARY_FEATURE_KEY;

/// Metrics charted together on the France key-metrics chart, with their labels.
pub const FRANCE_KEY_METRICS: &[(&str, &str)] = &[
    (INCID_HOSP, "New Hospital Admissions"),
    (INCID_REA, "New ICU Admissions"),
    (INCID_DC, "New Deaths"),
];

/// A chart panel, or the "no data" state for an empty selection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    NoData,
}

impl<T> Panel<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(view) => Some(view),
            Panel::NoData => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethLayer {
    pub feature_key: &'static str,
    pub values: BTreeMap<String, f64>,
    pub geojson: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FranceView {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub admissions_by_date: OrderedSeries<f64>,
    pub admissions_by_department: BTreeMap<String, f64>,
    pub department_map: Option<ChoroplethLayer>,
    /// Keyed by chart label rather than column name.
    pub key_metrics: OrderedSeries<BTreeMap<String, f64>>,
}

pub fn build_france_view(
    rows: &[HospitalRecord],
    period: (NaiveDate, NaiveDate),
    boundaries: Option<Value>,
) -> Result<Panel<FranceView>, ValidationError> {
    if rows.is_empty() {
        return Ok(Panel::NoData);
    }

    let admissions_by_date = sum_by_date(rows, INCID_HOSP)?;
    let admissions_by_department = sum_by_region(rows, INCID_HOSP)?;

    let department_map = match boundaries {
        Some(geojson) if !admissions_by_department.is_empty() => Some(ChoroplethLayer {
            feature_key: BOUNDARY_FEATURE_KEY,
            values: admissions_by_department.clone(),
            geojson,
        }),
        _ => None,
    };

    let metrics: Vec<&str> = FRANCE_KEY_METRICS.iter().map(|(m, _)| *m).collect();
    let key_metrics = sum_by_date_multi(rows, &metrics)?.map(|sums| {
        FRANCE_KEY_METRICS
            .iter()
            .map(|(metric, label)| (label.to_string(), sums.get(*metric).copied().unwrap_or(0.0)))
            .collect::<BTreeMap<_, _>>()
    });

    Ok(Panel::Ready(FranceView {
        start_date: period.0,
        end_date: period.1,
        admissions_by_date,
        admissions_by_department,
        department_map,
        key_metrics,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NationalPoint {
    pub cases: f64,
    pub deaths: f64,
    pub new_cases: f64,
    pub new_deaths: f64,
    pub cases_7d: Option<f64>,
    pub deaths_7d: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsaView {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub national: OrderedSeries<NationalPoint>,
    /// Cumulative totals per state on the last date of the selection.
    pub latest: Vec<StateRecord>,
}

pub fn build_usa_view(
    rows: &[StateRecord],
    period: (NaiveDate, NaiveDate),
    window: usize,
) -> Result<Panel<UsaView>, ValidationError> {
    if rows.is_empty() {
        return Ok(Panel::NoData);
    }

    let totals = sum_by_date_multi(rows, &[CASES, DEATHS])?;
    let cases = totals.map(|t| t.get(CASES).copied().unwrap_or(0.0));
    let deaths = totals.map(|t| t.get(DEATHS).copied().unwrap_or(0.0));

    let new_cases = diff_series(&cases);
    let new_deaths = diff_series(&deaths);
    let cases_avg = rolling_mean(&new_cases, window)?;
    let deaths_avg = rolling_mean(&new_deaths, window)?;

    let national = cases
        .iter()
        .zip(deaths.values())
        .zip(new_cases.values().zip(new_deaths.values()))
        .zip(cases_avg.values().zip(deaths_avg.values()))
        .map(|(((point, deaths), (new_cases, new_deaths)), (cases_7d, deaths_7d))| {
            (
                point.date,
                NationalPoint {
                    cases: point.value,
                    deaths: *deaths,
                    new_cases: *new_cases,
                    new_deaths: *new_deaths,
                    cases_7d: *cases_7d,
                    deaths_7d: *deaths_7d,
                },
            )
        })
        .collect();

    Ok(Panel::Ready(UsaView {
        start_date: period.0,
        end_date: period.1,
        national,
        latest: latest_snapshot(rows),
    }))
}
