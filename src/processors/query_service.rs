use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::models::{Observation, QueryFilter, QueryParams};
use crate::store::Dataset;

/// Answers filter requests against a shared, immutable dataset.
pub struct QueryService<R> {
    dataset: Arc<Dataset<R>>,
}

impl<R> Clone for QueryService<R> {
    fn clone(&self) -> Self {
        Self {
            dataset: Arc::clone(&self.dataset),
        }
    }
}

impl<R: Observation + Clone> QueryService<R> {
    pub fn new(dataset: Arc<Dataset<R>>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset<R> {
        &self.dataset
    }

    /// Rows matching every predicate of `filter`, in dataset order.
    ///
    /// An empty result is not an error. A region code absent from the
    /// dataset is.
    pub fn query(&self, filter: &QueryFilter) -> Result<Vec<R>, ValidationError> {
        if let Some(code) = filter.region.as_code() {
            if !self.dataset.has_region(code) {
                return Err(ValidationError::UnknownRegion(code.to_string()));
            }
        }

        let rows: Vec<R> = self
            .dataset
            .rows()
            .iter()
            .filter(|row| filter.matches(*row))
            .cloned()
            .collect();

        if rows.is_empty() {
            warn!("No rows match filter {:?}", filter);
        } else {
            debug!("Filter {:?} matched {} of {} rows", filter, rows.len(), self.dataset.len());
        }

        Ok(rows)
    }

    pub fn query_params(&self, params: QueryParams) -> Result<Vec<R>, ValidationError> {
        self.query(&params.into_filter()?)
    }
}
