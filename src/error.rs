use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Startup failures while fetching or parsing a dataset. Always fatal.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File I/O error reading {source_name}: {error}")]
    Io {
        source_name: String,
        error: std::io::Error,
    },

    #[error("HTTP error fetching {source_name}: {error}")]
    Http {
        source_name: String,
        error: reqwest::Error,
    },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid date '{value}' on row {row}: {error}")]
    DateParse {
        row: u64,
        value: String,
        error: chrono::ParseError,
    },

    #[error("Source {0} contains no data rows")]
    Empty(String),

    #[error("Source {source_name} has {rows} data rows but none remain after {filter}")]
    AllFiltered {
        source_name: String,
        rows: u64,
        filter: String,
    },
}

/// Rejected request parameters. Recoverable, reported to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("Unknown region code '{0}'")]
    UnknownRegion(String),

    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("Rolling window must be at least 1")]
    InvalidWindow,
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidSettings(#[from] validator::ValidationErrors),

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    Export(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, DashboardError::Validation(_))
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, self.to_string()).into_response()
    }
}
