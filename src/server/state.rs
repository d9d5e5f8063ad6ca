use std::sync::Arc;

use crate::models::HospitalRecord;
use crate::processors::QueryService;
use crate::store::Dataset;

pub struct AppState {
    pub france: QueryService<HospitalRecord>,
}

impl AppState {
    pub fn new(dataset: Dataset<HospitalRecord>) -> Arc<Self> {
        Arc::new(Self {
            france: QueryService::new(Arc::new(dataset)),
        })
    }
}
