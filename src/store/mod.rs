//! Dataset loading. Each dataset is fetched and normalized exactly once;
//! any failure here is fatal to the caller.

pub mod dataset;

pub use dataset::{date_bounds, Dataset};

use tracing::info;

use crate::config::{FranceSettings, UsaSettings};
use crate::error::LoadError;
use crate::models::{HospitalRecord, StateRecord};
use crate::readers::{HospitalReader, StateReader};

pub async fn load_france(settings: &FranceSettings) -> Result<Dataset<HospitalRecord>, LoadError> {
    let source_name = settings.source.to_string();
    let text = settings.source.read_text().await?;
    let rows = HospitalReader::new()
        .with_cutoff(settings.cutoff_date)
        .parse(&text, &source_name)?;

    let dataset = Dataset::new(rows);
    info!(
        "Loaded {} France rows across {} departments from {source_name}",
        dataset.len(),
        dataset.regions().count()
    );
    Ok(dataset)
}

pub async fn load_usa(settings: &UsaSettings) -> Result<Dataset<StateRecord>, LoadError> {
    let source_name = settings.source.to_string();
    let text = settings.source.read_text().await?;
    let rows = StateReader::with_policy(settings.unmapped).parse(&text, &source_name)?;

    let dataset = Dataset::new(rows);
    info!(
        "Loaded {} USA rows across {} states from {source_name}",
        dataset.len(),
        dataset.regions().count()
    );
    Ok(dataset)
}
