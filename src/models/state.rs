use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Observation;

pub const CASES: &str = "cases";
pub const DEATHS: &str = "deaths";

/// Cumulative cases and deaths for one US state on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub date: NaiveDate,
    pub state: String,
    pub fips: Option<String>,
    pub cases: Option<i64>,
    pub deaths: Option<i64>,
    /// Two-letter code from the state lookup table, `None` if the name is not in it.
    pub abbr: Option<String>,
}

impl Observation for StateRecord {
    const METRICS: &'static [&'static str] = &[CASES, DEATHS];

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn region_code(&self) -> Option<&str> {
        self.abbr.as_deref()
    }

    fn metric(&self, name: &str) -> Option<f64> {
        let value = match name {
            CASES => self.cases,
            DEATHS => self.deaths,
            _ => None,
        };
        value.map(|v| v as f64)
    }
}
