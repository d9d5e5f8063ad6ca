use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::cache::QueryCache;
use crate::config::CacheSettings;
use crate::error::Result;
use crate::models::{HospitalRecord, QueryFilter, RegionSelector};
use crate::utils::constants::ALL_REGIONS;

type FranceCache = QueryCache<QueryFilter, Arc<Vec<HospitalRecord>>>;

/// HTTP client for the query service with per-filter memoization.
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
    cache: Mutex<FranceCache>,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>, cache: &CacheSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Mutex::new(QueryCache::new(cache.ttl(), cache.max_entries)),
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Rows for `filter`, from cache when an identical filter was fetched
    /// within the TTL. Failures are not cached.
    pub async fn fetch_france(&self, filter: &QueryFilter) -> Result<Arc<Vec<HospitalRecord>>> {
        let cached = self.lock_cache().get(filter);
        if let Some(rows) = cached {
            debug!("Serving {:?} from cache", filter);
            return Ok(rows);
        }

        let url = format!("{}/data", self.base_url);
        info!("Requesting {url} with {:?}", filter);

        let rows: Vec<HospitalRecord> = self
            .http
            .get(&url)
            .query(&query_pairs(filter))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let rows = Arc::new(rows);
        self.lock_cache().insert(filter.clone(), Arc::clone(&rows));
        Ok(rows)
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, FranceCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn query_pairs(filter: &QueryFilter) -> Vec<(&'static str, String)> {
    let region = match &filter.region {
        RegionSelector::All => ALL_REGIONS.to_string(),
        RegionSelector::Code(code) => code.clone(),
    };

    let mut pairs = vec![("region_code", region)];
    if let Some(start) = filter.start_date {
        pairs.push(("start_date", start.to_string()));
    }
    if let Some(end) = filter.end_date {
        pairs.push(("end_date", end.to_string()));
    }
    pairs
}
