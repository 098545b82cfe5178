use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::bulk::{parse_csv_rows, BulkRow};
use super::domain::{MetricsSubmission, Month, SiteId};
use super::repository::{MetricsRepository, RepositoryError};
use super::service::{MetricsService, MetricsServiceError};

/// Router builder exposing HTTP endpoints for metric submission, reads, and
/// bulk import.
pub fn metrics_router<R>(service: Arc<MetricsService<R>>) -> Router
where
    R: MetricsRepository + 'static,
{
    Router::new()
        .route("/api/v1/metrics", post(upsert_handler::<R>))
        .route(
            "/api/v1/metrics/:site_id/:year/:month",
            get(fetch_handler::<R>),
        )
        .route("/api/v1/metrics/:site_id/:year", get(list_handler::<R>))
        .route(
            "/api/v1/metrics/bulk-import",
            post(bulk_import_handler::<R>),
        )
        .route("/api/v1/kpi/:site_id/:year", get(kpi_summary_handler::<R>))
        .with_state(service)
}

/// Bulk-import payload: structured rows, or an inline CSV document in the
/// template layout. When both are present the CSV wins.
#[derive(Debug, Deserialize)]
pub(crate) struct BulkImportRequest {
    pub(crate) site_id: SiteId,
    pub(crate) year: i32,
    #[serde(default)]
    pub(crate) rows: Vec<BulkRow>,
    #[serde(default)]
    pub(crate) csv: Option<String>,
}

pub(crate) async fn upsert_handler<R>(
    State(service): State<Arc<MetricsService<R>>>,
    axum::Json(submission): axum::Json<MetricsSubmission>,
) -> Response
where
    R: MetricsRepository + 'static,
{
    match service.upsert(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(MetricsServiceError::Validation(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<MetricsService<R>>>,
    Path((site_id, year, month)): Path<(String, i32, String)>,
) -> Response
where
    R: MetricsRepository + 'static,
{
    let month = match month.parse::<Month>() {
        Ok(month) => month,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service.get(&SiteId(site_id), year, month) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(MetricsServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "Metrics not found for this period" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<MetricsService<R>>>,
    Path((site_id, year)): Path<(String, i32)>,
) -> Response
where
    R: MetricsRepository + 'static,
{
    match service.list(&SiteId(site_id), year) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn bulk_import_handler<R>(
    State(service): State<Arc<MetricsService<R>>>,
    axum::Json(request): axum::Json<BulkImportRequest>,
) -> Response
where
    R: MetricsRepository + 'static,
{
    let rows = match request.csv {
        Some(csv) => match parse_csv_rows(Cursor::new(csv.into_bytes())) {
            Ok(rows) => rows,
            Err(err) => {
                let payload = json!({ "error": err.to_string() });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
        None => request.rows,
    };

    match service.bulk_import(&request.site_id, request.year, rows) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(MetricsServiceError::Validation(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn kpi_summary_handler<R>(
    State(service): State<Arc<MetricsService<R>>>,
    Path((site_id, year)): Path<(String, i32)>,
) -> Response
where
    R: MetricsRepository + 'static,
{
    match service.kpi_summary(&SiteId(site_id), year) {
        Ok(totals) => (StatusCode::OK, axum::Json(totals)).into_response(),
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: MetricsServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
