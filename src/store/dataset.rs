use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::Observation;

/// Rows loaded once at startup. Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset<R> {
    rows: Vec<R>,
    regions: BTreeSet<String>,
    date_range: Option<(NaiveDate, NaiveDate)>,
}

impl<R: Observation> Dataset<R> {
    pub fn new(rows: Vec<R>) -> Self {
        let regions = rows
            .iter()
            .filter_map(|r| r.region_code().map(str::to_string))
            .collect();
        let date_range = date_bounds(&rows);

        Self {
            rows,
            regions,
            date_range,
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_region(&self, code: &str) -> bool {
        self.regions.contains(code)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> + '_ {
        self.regions.iter().map(String::as_str)
    }

    /// Earliest and latest date present, `None` when empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range
    }
}

pub fn date_bounds<R: Observation>(rows: &[R]) -> Option<(NaiveDate, NaiveDate)> {
    rows.iter().map(R::date).fold(None, |acc, date| match acc {
        None => Some((date, date)),
        Some((min, max)) => Some((min.min(date), max.max(date))),
    })
}
