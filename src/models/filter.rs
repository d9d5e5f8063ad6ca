use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Observation;
use crate::error::ValidationError;
use crate::utils::constants::ALL_REGIONS;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RegionSelector {
    #[default]
    All,
    Code(String),
}

impl RegionSelector {
    /// Parse a user-supplied code. Absent, blank and `All` (any case) select every region.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => RegionSelector::All,
            Some(v) if v.eq_ignore_ascii_case(ALL_REGIONS) => RegionSelector::All,
            Some(v) => RegionSelector::Code(v.to_string()),
        }
    }

    pub fn as_code(&self) -> Option<&str> {
        match self {
            RegionSelector::All => None,
            RegionSelector::Code(code) => Some(code),
        }
    }
}

/// Predicates applied to a dataset. All supplied predicates must hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct QueryFilter {
    pub region: RegionSelector,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl QueryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, code: impl Into<String>) -> Self {
        self.region = RegionSelector::Code(code.into());
        self
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::all().with_start(start).with_end(end)
    }

    pub fn matches<R: Observation>(&self, row: &R) -> bool {
        if let Some(code) = self.region.as_code() {
            if row.region_code() != Some(code) {
                return false;
            }
        }

        let date = row.date();
        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }

        true
    }
}

/// Raw query-string parameters as they arrive over HTTP or from the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    #[serde(alias = "dept")]
    pub region_code: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl QueryParams {
    pub fn into_filter(self) -> Result<QueryFilter, ValidationError> {
        Ok(QueryFilter {
            region: RegionSelector::parse(self.region_code.as_deref()),
            start_date: parse_query_date("start_date", self.start_date.as_deref())?,
            end_date: parse_query_date("end_date", self.end_date.as_deref())?,
        })
    }
}

/// Parse an optional date parameter. Blank means absent; a trailing
/// `THH:MM:SS` time part is accepted and discarded.
pub fn parse_query_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(v) => v,
    };

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        })
}
