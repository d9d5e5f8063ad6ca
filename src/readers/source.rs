use std::fmt;
use std::fs::File;
use std::path::PathBuf;

use encoding_rs::{UTF_8, WINDOWS_1252};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::LoadError;

/// Where a dataset comes from: a remote URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Url(value.to_string())
        } else {
            DataSource::File(PathBuf::from(value))
        }
    }

    /// Fetch the whole source and decode it to text.
    pub async fn read_text(&self) -> Result<String, LoadError> {
        match self {
            DataSource::Url(url) => {
                info!("Fetching {url}");
                let bytes = fetch_url(url).await.map_err(|error| LoadError::Http {
                    source_name: self.to_string(),
                    error,
                })?;
                Ok(decode_text(&bytes))
            }
            DataSource::File(path) => {
                info!("Reading {}", path.display());
                let io_err = |error| LoadError::Io {
                    source_name: self.to_string(),
                    error,
                };
                let file = File::open(path).map_err(io_err)?;
                if file.metadata().map_err(io_err)?.len() == 0 {
                    return Ok(String::new());
                }
                // The file is only read while the map is alive and is not
                // expected to be truncated underneath us.
                let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
                Ok(decode_text(&mmap))
            }
        }
    }
}

async fn fetch_url(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;
    debug!("Fetched {} bytes from {url}", bytes.len());
    Ok(bytes.to_vec())
}

/// Decode UTF-8 (BOM stripped), falling back to Windows-1252 for legacy exports.
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return text.into_owned();
    }

    warn!("Source is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<String> for DataSource {
    fn from(value: String) -> Self {
        DataSource::parse(&value)
    }
}

impl From<DataSource> for String {
    fn from(value: DataSource) -> Self {
        value.to_string()
    }
}
