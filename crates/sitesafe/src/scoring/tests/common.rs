use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::scoring::{
    MetricRecord, MetricsRepository, MetricsService, Month, ParameterCatalog, ParameterKey,
    RepositoryError, SiteId, TargetActual,
};

pub(super) fn site() -> SiteId {
    SiteId("MFG-01".to_string())
}

/// Target/actual pairs where every catalog parameter exactly meets its
/// target, which must score full weight across the board.
pub(super) fn perfect_parameters(
    catalog: &ParameterCatalog,
) -> BTreeMap<ParameterKey, TargetActual> {
    catalog
        .iter()
        .map(|definition| {
            (
                definition.key,
                TargetActual {
                    target: 10.0,
                    actual: 10.0,
                },
            )
        })
        .collect()
}

/// A realistic mixed month: strong training numbers, one recordable incident.
pub(super) fn mixed_parameters() -> BTreeMap<ParameterKey, TargetActual> {
    let mut parameters = BTreeMap::new();
    parameters.insert(
        ParameterKey::ManDays,
        TargetActual {
            target: 1000.0,
            actual: 950.0,
        },
    );
    parameters.insert(
        ParameterKey::SafeWorkHours,
        TargetActual {
            target: 8000.0,
            actual: 7600.0,
        },
    );
    parameters.insert(
        ParameterKey::NearMissReport,
        TargetActual {
            target: 50.0,
            actual: 52.0,
        },
    );
    parameters.insert(
        ParameterKey::LostTimeInjury,
        TargetActual {
            target: 0.0,
            actual: 0.0,
        },
    );
    parameters.insert(
        ParameterKey::RecordableIncidents,
        TargetActual {
            target: 0.0,
            actual: 1.0,
        },
    );
    parameters.insert(
        ParameterKey::WasteGenerated,
        TargetActual {
            target: 500.0,
            actual: 600.0,
        },
    );
    parameters
}

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

pub(super) fn build_service() -> (MetricsService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = MetricsService::new(repository.clone(), ParameterCatalog::standard());
    (service, repository)
}
