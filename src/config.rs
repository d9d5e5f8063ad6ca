//! Layered settings.
//!
//! Built-in defaults, then an optional TOML/YAML file, then environment
//! variables prefixed with `EPI_` (`__` separates nested keys), e.g.
//!
//! ```text
//! EPI_SERVER__PORT=9000
//! EPI_FRANCE__SOURCE=data/donnees-hospitalieres.csv
//! EPI_USA__UNMAPPED=drop
//! ```
//!
//! Example file:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 8000
//!
//! [france]
//! source = "https://www.data.gouv.fr/fr/datasets/r/6fadff46-9efd-4c53-942a-54aca783c30c"
//! cutoff_date = "2020-01-01"
//!
//! [cache]
//! ttl_secs = 300
//! max_entries = 64
//! ```

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::readers::{DataSource, UnmappedPolicy};
use crate::utils::constants::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    #[validate(nested)]
    pub server: ServerSettings,
    pub france: FranceSettings,
    pub usa: UsaSettings,
    #[validate(nested)]
    pub cache: CacheSettings,
    #[validate(nested)]
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    #[validate(range(min = 1))]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FranceSettings {
    pub source: DataSource,
    pub cutoff_date: NaiveDate,
    pub boundaries_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsaSettings {
    pub source: DataSource,
    pub unmapped: UnmappedPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CacheSettings {
    #[validate(range(min = 1))]
    pub ttl_secs: u64,
    #[validate(range(min = 1))]
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardSettings {
    pub api_url: String,
    #[validate(range(min = 1))]
    pub rolling_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for FranceSettings {
    fn default() -> Self {
        Self {
            source: DataSource::parse(FRANCE_SOURCE_URL),
            cutoff_date: france_cutoff_date(),
            boundaries_url: FRANCE_BOUNDARIES_URL.to_string(),
        }
    }
}

impl Default for UsaSettings {
    fn default() -> Self {
        Self {
            source: DataSource::parse(USA_SOURCE_URL),
            unmapped: UnmappedPolicy::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}
