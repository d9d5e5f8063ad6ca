use std::collections::BTreeSet;

use chrono::NaiveDate;
use clap::ValueEnum;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::state_codes::state_code;
use crate::error::LoadError;
use crate::models::StateRecord;
use crate::utils::constants::{SOURCE_DATE_FORMAT, USA_DELIMITER};

/// What to do with rows whose state name is missing from the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Keep the row with an undefined code.
    #[default]
    Keep,
    /// Keep the row and log each distinct unmapped name once.
    Warn,
    /// Remove the row.
    Drop,
}

#[derive(Debug, Deserialize)]
struct RawStateRow {
    date: String,
    state: String,
    fips: Option<String>,
    cases: Option<i64>,
    deaths: Option<i64>,
}

/// Parser for the cumulative cases/deaths by US state file.
pub struct StateReader {
    policy: UnmappedPolicy,
}

impl StateReader {
    pub fn new() -> Self {
        Self {
            policy: UnmappedPolicy::default(),
        }
    }

    pub fn with_policy(policy: UnmappedPolicy) -> Self {
        Self { policy }
    }

    pub fn parse(&self, text: &str, source_name: &str) -> Result<Vec<StateRecord>, LoadError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(USA_DELIMITER)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        let mut unmapped = BTreeSet::new();
        let mut total_rows = 0u64;

        for result in reader.deserialize::<RawStateRow>() {
            let raw = result?;
            total_rows += 1;

            let date = NaiveDate::parse_from_str(&raw.date, SOURCE_DATE_FORMAT).map_err(|error| {
                LoadError::DateParse {
                    row: total_rows,
                    value: raw.date.clone(),
                    error,
                }
            })?;

            let abbr = state_code(&raw.state).map(str::to_string);
            if abbr.is_none() {
                let first_seen = unmapped.insert(raw.state.clone());
                match self.policy {
                    UnmappedPolicy::Drop => continue,
                    UnmappedPolicy::Warn if first_seen => {
                        warn!("State '{}' has no code in the lookup table", raw.state);
                    }
                    _ => {}
                }
            }

            records.push(StateRecord {
                date,
                state: raw.state,
                fips: raw.fips.filter(|f| !f.is_empty()),
                cases: raw.cases,
                deaths: raw.deaths,
                abbr,
            });
        }

        if total_rows == 0 {
            return Err(LoadError::Empty(source_name.to_string()));
        }
        if records.is_empty() {
            return Err(LoadError::AllFiltered {
                source_name: source_name.to_string(),
                rows: total_rows,
                filter: "dropping unmapped state names".to_string(),
            });
        }

        debug!(
            "Parsed {} rows from {source_name}, {} unmapped state names ({:?} policy)",
            total_rows,
            unmapped.len(),
            self.policy
        );

        Ok(records)
    }
}

impl Default for StateReader {
    fn default() -> Self {
        Self::new()
    }
}
