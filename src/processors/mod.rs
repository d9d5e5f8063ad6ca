pub mod aggregation;
pub mod query_service;

pub use aggregation::{
    diff_series, latest_snapshot, rolling_mean, sum_by_date, sum_by_date_multi, sum_by_region,
};
pub use query_service::QueryService;
