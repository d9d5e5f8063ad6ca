use std::io::Write;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use chrono::NaiveDate;
use epi_dashboard::config::{FranceSettings, UsaSettings};
use epi_dashboard::dashboard::{Panel, UsaDashboard};
use epi_dashboard::models::{HospitalRecord, QueryFilter};
use epi_dashboard::processors::{sum_by_date, sum_by_region, QueryService};
use epi_dashboard::readers::{DataSource, UnmappedPolicy};
use epi_dashboard::server::{router, AppState};
use epi_dashboard::store::{load_france, load_usa};
use epi_dashboard::writers::CsvWriter;
use epi_dashboard::{DashboardError, LoadError, ValidationError};
use pretty_assertions::assert_eq;
use tempfile::{NamedTempFile, TempDir};
use tower::ServiceExt;

const FRANCE_CSV: &str = "\
dep;jour;incid_hosp;incid_rea;incid_dc;incid_rad
1;2021-01-01;5;1;0;2
2;2021-01-01;3;;1;0
1;2021-01-02;7;2;0;1
";

const USA_CSV: &str = "\
date,state,fips,cases,deaths
2021-01-01,Ohio,39,100,2
2021-01-01,Guam,66,10,0
2021-01-02,Ohio,39,130,3
2021-01-02,Guam,66,12,0
";

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
}

fn write_source(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

async fn france_state() -> Arc<AppState> {
    let file = write_source(FRANCE_CSV);
    let settings = FranceSettings {
        source: DataSource::File(file.path().to_path_buf()),
        ..Default::default()
    };
    AppState::new(load_france(&settings).await.unwrap())
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_load_and_query_france() {
    let file = write_source(FRANCE_CSV);
    let settings = FranceSettings {
        source: DataSource::File(file.path().to_path_buf()),
        ..Default::default()
    };
    let dataset = load_france(&settings).await.unwrap();

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.regions().collect::<Vec<_>>(), vec!["01", "02"]);

    let service = QueryService::new(Arc::new(dataset));
    let rows = service
        .query(&QueryFilter::all().with_region("01"))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.dep_str == "01"));

    let rows = service.query(&QueryFilter::all().with_end(date(1))).unwrap();
    let by_date = sum_by_date(&rows, "incid_hosp").unwrap();
    assert_eq!(by_date.get(date(1)), Some(&8.0));
    assert_eq!(by_date.len(), 1);

    let by_region = sum_by_region(&service.query(&QueryFilter::all()).unwrap(), "incid_hosp").unwrap();
    assert_eq!(by_region["01"], 12.0);
    assert_eq!(by_region["02"], 3.0);
}

#[tokio::test]
async fn test_missing_source_is_load_error() {
    let dir = TempDir::new().unwrap();
    let settings = FranceSettings {
        source: DataSource::File(dir.path().join("absent.csv")),
        ..Default::default()
    };

    assert!(load_france(&settings).await.is_err());
}

#[tokio::test]
async fn test_source_before_cutoff_is_load_error() {
    let file = write_source("dep;jour;incid_hosp;incid_rea;incid_dc;incid_rad\n1;2019-12-30;1;0;0;0\n");
    let settings = FranceSettings {
        source: DataSource::File(file.path().to_path_buf()),
        ..Default::default()
    };

    let err = load_france(&settings).await.unwrap_err();
    assert!(matches!(err, LoadError::AllFiltered { .. }));
}

#[tokio::test]
async fn test_data_endpoint_filters() {
    let state = france_state().await;

    let (status, body) = get(state.clone(), "/data").await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<HospitalRecord> = serde_json::from_slice(&body).unwrap();
    assert_eq!(rows.len(), 3);

    let (status, body) = get(
        state.clone(),
        "/data?region_code=01&start_date=2021-01-02&end_date=2021-01-02",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows: Vec<HospitalRecord> = serde_json::from_slice(&body).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].incid_hosp, Some(7));
    assert_eq!(rows[0].date, date(2));

    let (status, body) = get(state, "/data?region_code=All&start_date=2022-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]".to_vec());
}

#[tokio::test]
async fn test_data_endpoint_row_shape() {
    let (_, body) = get(france_state().await, "/data?region_code=02").await;
    let rows: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(rows[0]["dep"], "2");
    assert_eq!(rows[0]["dep_str"], "02");
    assert_eq!(rows[0]["jour"], "2021-01-01");
    assert!(rows[0]["incid_rea"].is_null());
    assert_eq!(rows[0]["incid_dc"], 1);
}

#[tokio::test]
async fn test_bad_requests_are_400() {
    let state = france_state().await;

    let (status, body) = get(state.clone(), "/data?start_date=01/02/2021").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("start_date"));

    let (status, _) = get(state, "/data?region_code=99").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_csv_endpoint() {
    let state = france_state().await;
    let response = router(state)
        .oneshot(
            Request::builder()
                .uri("/data.csv?dept=01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("covid_data_france_filtered.csv"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("dep,jour,incid_hosp,incid_rea,incid_dc,incid_rad,date,dep_str")
    );
    assert_eq!(lines.count(), 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get(france_state().await, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["rows"], 3);
    assert_eq!(health["regions"], 2);
    assert_eq!(health["first_date"], "2021-01-01");
    assert_eq!(health["last_date"], "2021-01-02");
}

#[tokio::test]
async fn test_usa_dashboard_from_file() {
    let file = write_source(USA_CSV);
    let settings = UsaSettings {
        source: DataSource::File(file.path().to_path_buf()),
        unmapped: UnmappedPolicy::Keep,
    };
    let dataset = load_usa(&settings).await.unwrap();
    assert_eq!(dataset.len(), 4);

    let report = UsaDashboard::new(Arc::new(dataset), 2)
        .render(None, None)
        .unwrap();
    let view = match &report.panel {
        Panel::Ready(view) => view,
        Panel::NoData => panic!("expected data"),
    };

    let points: Vec<_> = view.national.values().collect();
    assert_eq!(points[0].cases, 110.0);
    assert_eq!(points[1].new_cases, 32.0);
    assert_eq!(points[1].cases_7d, Some(16.0));
    assert_eq!(view.latest.len(), 2);
}

#[tokio::test]
async fn test_export_filtered_subset() {
    let file = write_source(FRANCE_CSV);
    let settings = FranceSettings {
        source: DataSource::File(file.path().to_path_buf()),
        ..Default::default()
    };
    let service = QueryService::new(Arc::new(load_france(&settings).await.unwrap()));
    let rows = service.query(&QueryFilter::between(date(1), date(1))).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("subset.csv");
    let info = CsvWriter::new().write_records(&rows, &path).unwrap();

    assert_eq!(info.rows, 2);
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn test_validation_errors_are_client_errors() {
    let err: DashboardError = ValidationError::UnknownRegion("99".to_string()).into();
    assert!(err.is_client_error());
}
