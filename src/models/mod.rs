pub mod filter;
pub mod hospital;
pub mod observation;
pub mod series;
pub mod state;

pub use filter::{parse_query_date, QueryFilter, QueryParams, RegionSelector};
pub use hospital::{normalize_department, HospitalCounts, HospitalRecord};
pub use observation::{check_metric, Observation};
pub use series::{OrderedSeries, SeriesPoint};
pub use state::StateRecord;
