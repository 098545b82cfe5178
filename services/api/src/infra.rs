use metrics_exporter_prometheus::PrometheusHandle;
use sitesafe::scoring::{MetricRecord, MetricsRepository, Month, RepositoryError, SiteId};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Metrics store backing the service until a database-backed repository
/// lands. Records are keyed by `(site, month, year)` so resubmission
/// replaces rather than duplicates.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMetricsRepository {
    records: Arc<Mutex<HashMap<(SiteId, Month, i32), MetricRecord>>>,
}

impl MetricsRepository for InMemoryMetricsRepository {
    fn upsert(&self, record: MetricRecord) -> Result<MetricRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&(site_id.clone(), month, year)).cloned())
    }

    fn list_for_site(
        &self,
        site_id: &SiteId,
        year: i32,
    ) -> Result<Vec<MetricRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<MetricRecord> = guard
            .values()
            .filter(|record| &record.site_id == site_id && record.year == year)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.month);
        Ok(records)
    }
}

pub(crate) fn parse_month(raw: &str) -> Result<Month, String> {
    raw.parse::<Month>().map_err(|err| err.to_string())
}
