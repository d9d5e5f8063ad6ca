use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Observation;

pub const INCID_HOSP: &str = "incid_hosp";
pub const INCID_REA: &str = "incid_rea";
pub const INCID_DC: &str = "incid_dc";
pub const INCID_RAD: &str = "incid_rad";

/// Daily new hospital events for one French department.
///
/// Field order matches the served and exported column order: the original
/// source columns first, then the derived `date` and `dep_str`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalRecord {
    pub dep: String,
    pub jour: String,
    pub incid_hosp: Option<i64>,
    pub incid_rea: Option<i64>,
    pub incid_dc: Option<i64>,
    pub incid_rad: Option<i64>,
    pub date: NaiveDate,
    pub dep_str: String,
}

impl HospitalRecord {
    /// Build a record from raw source fields, deriving `date` and `dep_str`.
    pub fn from_raw(dep: String, jour: String, date: NaiveDate, counts: HospitalCounts) -> Self {
        let dep_str = normalize_department(&dep);
        Self {
            dep,
            jour,
            incid_hosp: counts.hosp,
            incid_rea: counts.rea,
            incid_dc: counts.dc,
            incid_rad: counts.rad,
            date,
            dep_str,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HospitalCounts {
    pub hosp: Option<i64>,
    pub rea: Option<i64>,
    pub dc: Option<i64>,
    pub rad: Option<i64>,
}

impl Observation for HospitalRecord {
    const METRICS: &'static [&'static str] = &[INCID_HOSP, INCID_REA, INCID_DC, INCID_RAD];

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn region_code(&self) -> Option<&str> {
        Some(&self.dep_str)
    }

    fn metric(&self, name: &str) -> Option<f64> {
        let value = match name {
            INCID_HOSP => self.incid_hosp,
            INCID_REA => self.incid_rea,
            INCID_DC => self.incid_dc,
            INCID_RAD => self.incid_rad,
            _ => None,
        };
        value.map(|v| v as f64)
    }
}

/// Zero-pad a department code to two characters (`1` -> `01`).
/// Longer codes such as `971` or `2A` are kept as they are.
pub fn normalize_department(raw: &str) -> String {
    format!("{:0>2}", raw.trim())
}
