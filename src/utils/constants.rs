use chrono::NaiveDate;

/// Region selector meaning "no region filter"
pub const ALL_REGIONS: &str = "All";

/// Default data sources
pub const FRANCE_SOURCE_URL: &str =
    "https://www.data.gouv.fr/fr/datasets/r/6fadff46-9efd-4c53-942a-54aca783c30c";
pub const USA_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us-states.csv";
pub const FRANCE_BOUNDARIES_URL: &str =
    "https://france-geojson.gregoiredavid.fr/repo/departements.geojson";

/// GeoJSON property holding the department code
pub const BOUNDARY_FEATURE_KEY: &str = "properties.code";

/// Source delimiters
pub const FRANCE_DELIMITER: u8 = b';';
pub const USA_DELIMITER: u8 = b',';

/// Source date formats
pub const SOURCE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Earliest observation kept from the France dataset
pub const FRANCE_CUTOFF: (i32, u32, u32) = (2020, 1, 1);

pub fn france_cutoff_date() -> NaiveDate {
    let (y, m, d) = FRANCE_CUTOFF;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Server defaults
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Query cache defaults
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 64;

/// Rolling average window for the USA view
pub const DEFAULT_ROLLING_WINDOW: usize = 7;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "EPI";
