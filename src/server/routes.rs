use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

use super::state::AppState;
use crate::error::Result;
use crate::models::{HospitalRecord, QueryParams};
use crate::utils::default_export_filename;
use crate::writers::CsvWriter;

pub async fn data_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<HospitalRecord>>> {
    let rows = state.france.query_params(params)?;
    Ok(Json(rows))
}

pub async fn export_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<impl IntoResponse> {
    let rows = state.france.query_params(params)?;
    let body = CsvWriter::new().to_bytes(&rows)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        default_export_filename("france").display()
    );

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rows: usize,
    pub regions: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dataset = state.france.dataset();
    let range = dataset.date_range();

    Json(HealthResponse {
        status: "ok",
        rows: dataset.len(),
        regions: dataset.regions().count(),
        first_date: range.map(|(first, _)| first),
        last_date: range.map(|(_, last)| last),
    })
}
