use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::models::{HospitalRecord, StateRecord};

/// Row types that can be exported with a fixed header row.
pub trait CsvExport: Serialize {
    const COLUMNS: &'static [&'static str];
}

impl CsvExport for HospitalRecord {
    const COLUMNS: &'static [&'static str] = &[
        "dep",
        "jour",
        "incid_hosp",
        "incid_rea",
        "incid_dc",
        "incid_rad",
        "date",
        "dep_str",
    ];
}

impl CsvExport for StateRecord {
    const COLUMNS: &'static [&'static str] = &["date", "state", "fips", "cases", "deaths", "abbr"];
}

pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write the header row followed by every record. The header is written
    /// even when `records` is empty.
    pub fn write_to<T: CsvExport, W: Write>(&self, records: &[T], writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(T::COLUMNS)?;
        for record in records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;

        Ok(())
    }

    pub fn to_bytes<T: CsvExport>(&self, records: &[T]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(records, &mut buffer)?;
        Ok(buffer)
    }

    pub fn write_records<T: CsvExport>(&self, records: &[T], path: &Path) -> Result<ExportInfo> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        self.write_to(records, file)?;

        let info = ExportInfo {
            path: path.to_path_buf(),
            rows: records.len(),
            bytes: std::fs::metadata(path)?.len(),
        };
        info!("{}", info.summary());
        Ok(info)
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ExportInfo {
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

impl ExportInfo {
    pub fn summary(&self) -> String {
        format!(
            "Exported {} rows ({:.1} KB) to {}",
            self.rows,
            self.bytes as f64 / 1024.0,
            self.path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HospitalCounts;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record() -> HospitalRecord {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        HospitalRecord::from_raw(
            "1".to_string(),
            "2021-01-01".to_string(),
            date,
            HospitalCounts {
                hosp: Some(5),
                rea: Some(1),
                dc: None,
                rad: Some(2),
            },
        )
    }

    #[test]
    fn test_export_includes_header_and_derived_columns() {
        let bytes = CsvWriter::new().to_bytes(&[record()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "dep,jour,incid_hosp,incid_rea,incid_dc,incid_rad,date,dep_str\n\
             1,2021-01-01,5,1,,2,2021-01-01,01\n"
        );
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let records: Vec<StateRecord> = Vec::new();
        let bytes = CsvWriter::new().to_bytes(&records).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "date,state,fips,cases,deaths,abbr\n");
    }

    #[test]
    fn test_write_records_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("france.csv");

        let info = CsvWriter::new().write_records(&[record(), record()], &path).unwrap();

        assert!(path.exists());
        assert_eq!(info.rows, 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 3);
    }
}
