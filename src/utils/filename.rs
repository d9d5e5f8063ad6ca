use std::path::PathBuf;

/// Default export filename with format: covid_data_{scope}_filtered.csv
pub fn default_export_filename(scope: &str) -> PathBuf {
    PathBuf::from(format!("covid_data_{}_filtered.csv", scope.to_lowercase()))
}
