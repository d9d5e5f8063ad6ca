use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::debug;

use crate::error::LoadError;
use crate::models::{HospitalCounts, HospitalRecord};
use crate::utils::constants::{france_cutoff_date, FRANCE_DELIMITER, SOURCE_DATE_FORMAT};

#[derive(Debug, Deserialize)]
struct RawHospitalRow {
    dep: String,
    jour: String,
    incid_hosp: Option<i64>,
    incid_rea: Option<i64>,
    incid_dc: Option<i64>,
    incid_rad: Option<i64>,
}

/// Parser for the daily new-hospitalisations-by-department file.
pub struct HospitalReader {
    cutoff: NaiveDate,
}

impl HospitalReader {
    pub fn new() -> Self {
        Self {
            cutoff: france_cutoff_date(),
        }
    }

    pub fn with_cutoff(mut self, cutoff: NaiveDate) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Parse the whole file, dropping rows dated before the cutoff.
    pub fn parse(&self, text: &str, source_name: &str) -> Result<Vec<HospitalRecord>, LoadError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(FRANCE_DELIMITER)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        let mut total_rows = 0u64;

        for result in reader.deserialize::<RawHospitalRow>() {
            let raw = result?;
            total_rows += 1;

            let date = NaiveDate::parse_from_str(&raw.jour, SOURCE_DATE_FORMAT).map_err(|error| {
                LoadError::DateParse {
                    row: total_rows,
                    value: raw.jour.clone(),
                    error,
                }
            })?;

            if date < self.cutoff {
                continue;
            }

            let counts = HospitalCounts {
                hosp: raw.incid_hosp,
                rea: raw.incid_rea,
                dc: raw.incid_dc,
                rad: raw.incid_rad,
            };
            records.push(HospitalRecord::from_raw(raw.dep, raw.jour, date, counts));
        }

        if total_rows == 0 {
            return Err(LoadError::Empty(source_name.to_string()));
        }
        if records.is_empty() {
            return Err(LoadError::AllFiltered {
                source_name: source_name.to_string(),
                rows: total_rows,
                filter: format!("the {} cutoff", self.cutoff),
            });
        }

        debug!(
            "Parsed {} rows from {source_name}, kept {} on or after {}",
            total_rows,
            records.len(),
            self.cutoff
        );

        Ok(records)
    }
}

impl Default for HospitalReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
dep;jour;incid_hosp;incid_rea;incid_dc;incid_rad
1;2019-12-31;9;9;9;9
1;2020-03-19;1;0;0;0
01;2020-03-20;2;1;;0
2A;2020-03-20;3;0;1;2
971;2020-03-20;0;0;0;1
";

    #[test]
    fn test_parse_normalizes_rows() {
        let records = HospitalReader::new().parse(SAMPLE, "sample").unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].dep, "1");
        assert_eq!(records[0].dep_str, "01");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2020, 3, 19).unwrap());
        assert_eq!(records[1].dep_str, "01");
        assert_eq!(records[1].incid_dc, None);
        assert_eq!(records[2].dep_str, "2A");
        assert_eq!(records[3].dep_str, "971");
    }

    #[test]
    fn test_cutoff_drops_early_rows() {
        let cutoff = NaiveDate::from_ymd_opt(2020, 3, 20).unwrap();
        let records = HospitalReader::new()
            .with_cutoff(cutoff)
            .parse(SAMPLE, "sample")
            .unwrap();

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.date >= cutoff));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let text = "dep;sexe;jour;incid_hosp;incid_rea;incid_dc;incid_rad\n13;0;2021-01-01;4;1;0;2\n";
        let records = HospitalReader::new().parse(text, "sample").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].incid_hosp, Some(4));
    }

    #[test]
    fn test_malformed_date_fails() {
        let text = "dep;jour;incid_hosp;incid_rea;incid_dc;incid_rad\n1;20/03/2020;1;0;0;0\n";
        let err = HospitalReader::new().parse(text, "sample").unwrap_err();
        assert!(matches!(err, LoadError::DateParse { row: 1, .. }));
    }

    #[test]
    fn test_malformed_count_fails() {
        let text = "dep;jour;incid_hosp;incid_rea;incid_dc;incid_rad\n1;2020-03-20;many;0;0;0\n";
        let err = HospitalReader::new().parse(text, "sample").unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn test_all_rows_before_cutoff_fails() {
        let text = "dep;jour;incid_hosp;incid_rea;incid_dc;incid_rad\n1;2019-12-30;1;0;0;0\n2;2019-12-31;2;0;0;0\n";
        let err = HospitalReader::new().parse(text, "sample").unwrap_err();

        assert!(matches!(err, LoadError::AllFiltered { rows: 2, .. }));
        assert!(err.to_string().contains("2020-01-01 cutoff"));
    }

    #[test]
    fn test_header_only_is_empty() {
        let text = "dep;jour;incid_hosp;incid_rea;incid_dc;incid_rad\n";
        let err = HospitalReader::new().parse(text, "sample").unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
    }
}
