//! Data behind each dashboard chart. Rendering is left to whatever consumes
//! the serialized reports.

pub mod boundaries;
pub mod client;
pub mod views;

pub use boundaries::fetch_boundaries;
pub use client::DashboardClient;
pub use views::{
    build_france_view, build_usa_view, ChoroplethLayer, FranceView, NationalPoint, Panel, UsaView,
};

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::models::{HospitalRecord, QueryFilter, StateRecord};
use crate::processors::QueryService;
use crate::store::{date_bounds, Dataset};
use crate::utils::constants::france_cutoff_date;

#[derive(Debug, Clone, Serialize)]
pub struct Report<R, V> {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip)]
    pub subset: Arc<Vec<R>>,
    pub panel: Panel<V>,
}

impl<R, V> Report<R, V> {
    pub fn has_data(&self) -> bool {
        matches!(self.panel, Panel::Ready(_))
    }
}

pub type FranceReport = Report<HospitalRecord, FranceView>;
pub type UsaReport = Report<StateRecord, UsaView>;

/// France charts, fed by the HTTP query service.
pub struct FranceDashboard<'a> {
    client: &'a DashboardClient,
    boundaries_url: Option<&'a str>,
}

impl<'a> FranceDashboard<'a> {
    pub fn new(client: &'a DashboardClient) -> Self {
        Self {
            client,
            boundaries_url: None,
        }
    }

    pub fn with_boundaries(mut self, url: &'a str) -> Self {
        self.boundaries_url = Some(url);
        self
    }

    /// Build the France report. Missing bounds default to the full range of
    /// the unfiltered data. A failed API request degrades to "no data".
    pub async fn render(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<FranceReport> {
        let (start_date, end_date) = match (start, end) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                let all = self.fetch_or_empty(&QueryFilter::all()).await;
                let (min, max) = date_bounds(all.as_slice())
                    .unwrap_or_else(|| (france_cutoff_date(), Local::now().date_naive()));
                (start.unwrap_or(min), end.unwrap_or(max))
            }
        };

        let subset = self
            .fetch_or_empty(&QueryFilter::between(start_date, end_date))
            .await;

        let boundaries = match self.boundaries_url {
            Some(url) if !subset.is_empty() => fetch_boundaries(self.client.http(), url).await,
            _ => None,
        };

        let panel = build_france_view(&subset, (start_date, end_date), boundaries)?;
        if !matches!(panel, Panel::Ready(_)) {
            warn!("No data available for the selected filters ({start_date} to {end_date})");
        }

        Ok(Report {
            start_date,
            end_date,
            subset,
            panel,
        })
    }

    async fn fetch_or_empty(&self, filter: &QueryFilter) -> Arc<Vec<HospitalRecord>> {
        match self.client.fetch_france(filter).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("{e}");
                Arc::new(Vec::new())
            }
        }
    }
}

/// USA charts, computed locally from the independently loaded state dataset.
pub struct UsaDashboard {
    service: QueryService<StateRecord>,
    window: usize,
}

impl UsaDashboard {
    pub fn new(dataset: Arc<Dataset<StateRecord>>, window: usize) -> Self {
        Self {
            service: QueryService::new(dataset),
            window,
        }
    }

    pub fn render(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<UsaReport> {
        let today = Local::now().date_naive();
        let (min, max) = self.service.dataset().date_range().unwrap_or((today, today));
        let start_date = start.unwrap_or(min);
        let end_date = end.unwrap_or(max);

        let subset = self
            .service
            .query(&QueryFilter::between(start_date, end_date))?;
        info!("USA selection {start_date} to {end_date}: {} rows", subset.len());

        let panel = build_usa_view(&subset, (start_date, end_date), self.window)?;
        if !matches!(panel, Panel::Ready(_)) {
            warn!("No data available for the selected filters ({start_date} to {end_date})");
        }

        Ok(Report {
            start_date,
            end_date,
            subset: Arc::new(subset),
            panel,
        })
    }
}
