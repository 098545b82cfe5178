//! Integration specifications for yearly bulk import.
//!
//! Drives the bulk-import endpoint with structured rows and with inline CSV
//! documents in the template layout, checking that row failures stay isolated
//! and that the counters always reconcile with the input size.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use sitesafe::scoring::{
        MetricRecord, MetricsRepository, MetricsService, Month, ParameterCatalog, RepositoryError,
        SiteId,
    };

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<HashMap<(SiteId, Month, i32), MetricRecord>>>,
    }

    impl MemoryRepository {
        pub(super) fn len(&self) -> usize {
            self.records.lock().expect("lock").len()
        }
    }

    impl MetricsRepository for MemoryRepository {
        fn upsert(&self, record: MetricRecord) -> Result<MetricRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            guard.insert(
                (record.site_id.clone(), record.month, record.year),
                record.clone(),
            );
            Ok(record)
        }

        fn fetch(
            &self,
            site_id: &SiteId,
            year: i32,
            month: Month,
        ) -> Result<Option<MetricRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.get(&(site_id.clone(), month, year)).cloned())
        }

        fn list_for_site(
            &self,
            site_id: &SiteId,
            year: i32,
        ) -> Result<Vec<MetricRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            let mut records: Vec<MetricRecord> = guard
                .values()
                .filter(|record| &record.site_id == site_id && record.year == year)
                .cloned()
                .collect();
            records.sort_by_key(|record| record.month);
            Ok(records)
        }
    }

    pub(super) fn build_router() -> (axum::Router, Arc<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::default());
        let service = Arc::new(MetricsService::new(
            repository.clone(),
            ParameterCatalog::standard(),
        ));
        (sitesafe::scoring::metrics_router(service), repository)
    }
}

mod bulk_import {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_bulk(router: axum::Router, payload: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/metrics/bulk-import")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let value = serde_json::from_slice(&body).expect("json");
        (status, value)
    }

    fn row(month: Value) -> Value {
        json!({
            "month": month,
            "parameters": {
                "manDays": { "target": 1000.0, "actual": 950.0 },
                "lostTimeInjury": { "target": 0.0, "actual": 0.0 }
            }
        })
    }

    #[tokio::test]
    async fn failures_stay_isolated_and_counters_reconcile() {
        let (router, repository) = build_router();

        let payload = json!({
            "site_id": "MFG-01",
            "year": 2025,
            "rows": [
                row(json!("January")),
                row(json!("Janurary")),
                row(Value::Null),
                row(json!("February")),
            ],
        });

        let (status, result) = post_bulk(router, payload).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(result.get("success"), Some(&json!(2)));
        assert_eq!(result.get("failed"), Some(&json!(2)));

        let errors = result
            .get("errors")
            .and_then(Value::as_array)
            .expect("errors array");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].get("month"), Some(&json!("Janurary")));
        assert_eq!(errors[0].get("error"), Some(&json!("Invalid month \"Janurary\"")));
        assert_eq!(errors[1].get("month"), Some(&json!("unknown")));
        assert_eq!(errors[1].get("error"), Some(&json!("Month is required")));

        assert_eq!(repository.len(), 2);
    }

    #[tokio::test]
    async fn inline_csv_document_is_parsed_and_scored() {
        let (router, repository) = build_router();

        let csv = "Month,ManDaysTarget,ManDaysActual,LostTimeInjuryTarget,LostTimeInjuryActual\n\
                   January,1000,950,0,0\n\
                   February,1000,not-a-number,0,0\n\
                   March,1000,980,0,0\n";
        let payload = json!({
            "site_id": "MFG-01",
            "year": 2025,
            "csv": csv,
        });

        let (status, result) = post_bulk(router, payload).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(result.get("success"), Some(&json!(2)));
        assert_eq!(result.get("failed"), Some(&json!(1)));
        let errors = result
            .get("errors")
            .and_then(Value::as_array)
            .expect("errors array");
        assert_eq!(errors[0].get("month"), Some(&json!("February")));
        assert_eq!(
            errors[0].get("error"),
            Some(&json!("ManDaysActual: Must be a number"))
        );
        assert_eq!(repository.len(), 2);
    }

    #[tokio::test]
    async fn csv_without_month_column_is_a_bad_request() {
        let (router, repository) = build_router();

        let payload = json!({
            "site_id": "MFG-01",
            "year": 2025,
            "csv": "ManDaysTarget,ManDaysActual\n1000,950\n",
        });

        let (status, body) = post_bulk(router, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("error").is_some());
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn out_of_range_year_rejects_the_whole_batch() {
        let (router, repository) = build_router();

        let payload = json!({
            "site_id": "MFG-01",
            "year": 1890,
            "rows": [row(json!("January"))],
        });

        let (status, _) = post_bulk(router, payload).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn imported_rows_replace_existing_months() {
        let (router, repository) = build_router();

        for _ in 0..2 {
            let payload = json!({
                "site_id": "MFG-01",
                "year": 2025,
                "rows": [row(json!("January"))],
            });
            let (status, result) = post_bulk(router.clone(), payload).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(result.get("success"), Some(&json!(1)));
        }

        assert_eq!(repository.len(), 1);
    }
}
