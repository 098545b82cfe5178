use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::bulk::{BulkImportResult, BulkRow};
use super::catalog::ParameterCatalog;
use super::domain::{MetricRecord, MetricsSubmission, Month, ParameterEntry, SiteId};
use super::engine::ScoringEngine;
use super::kpi::{derive_kpis, DerivedKpiSnapshot, KpiTotals};
use super::repository::{MetricsRepository, RepositoryError};
use super::validation::{MetricsGuard, ValidationError};

/// Service composing the validation guard, scoring engine, and repository.
pub struct MetricsService<R> {
    guard: MetricsGuard,
    engine: Arc<ScoringEngine>,
    repository: Arc<R>,
}

impl<R> MetricsService<R>
where
    R: MetricsRepository + 'static,
{
    pub fn new(repository: Arc<R>, catalog: ParameterCatalog) -> Self {
        Self {
            guard: MetricsGuard,
            engine: Arc::new(ScoringEngine::new(catalog)),
            repository,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Validate, score, and persist one site-month. Replaces any existing
    /// record for the same `(site, month, year)` key.
    pub fn upsert(
        &self,
        submission: MetricsSubmission,
    ) -> Result<MetricRecord, MetricsServiceError> {
        self.guard.validate_submission(&submission)?;

        let record = self.scored_record(submission);
        let stored = self.repository.upsert(record)?;
        Ok(stored)
    }

    /// Fetch one record, re-deriving the aggregate from its stored scores
    /// and attaching a fresh KPI snapshot.
    pub fn get(
        &self,
        site_id: &SiteId,
        year: i32,
        month: Month,
    ) -> Result<MetricRecordView, MetricsServiceError> {
        let mut record = self
            .repository
            .fetch(site_id, year, month)?
            .ok_or(RepositoryError::NotFound)?;

        let summary = self.engine.summarize_record(&record);
        record.total_score = summary.total_score;
        record.percentage = summary.percentage;
        record.rating = summary.rating;

        let kpis = derive_kpis(&record).rounded();
        Ok(MetricRecordView { record, kpis })
    }

    /// All records for one site/year, ordered by calendar month.
    pub fn list(
        &self,
        site_id: &SiteId,
        year: i32,
    ) -> Result<Vec<MetricRecord>, MetricsServiceError> {
        Ok(self.repository.list_for_site(site_id, year)?)
    }

    /// Cross-month raw totals for the dashboard KPI cards.
    pub fn kpi_summary(
        &self,
        site_id: &SiteId,
        year: i32,
    ) -> Result<KpiTotals, MetricsServiceError> {
        let records = self.repository.list_for_site(site_id, year)?;
        Ok(KpiTotals::accumulate(&records))
    }

    /// Score and persist a batch of month rows for one site/year.
    ///
    /// Rows are processed strictly in input order and failures are isolated
    /// per row: a bad month, bad cell, or repository hiccup is recorded in
    /// the result and the batch moves on to the next row.
    pub fn bulk_import(
        &self,
        site_id: &SiteId,
        year: i32,
        rows: Vec<BulkRow>,
    ) -> Result<BulkImportResult, MetricsServiceError> {
        self.guard.validate_year(year)?;

        let mut result = BulkImportResult::default();

        for row in rows {
            let month_raw = row.month.as_deref();

            if let Some(issue) = &row.issue {
                result.record_failure(month_raw, issue.clone());
                continue;
            }

            let month = match month_raw {
                None => {
                    result.record_failure(None, "Month is required");
                    continue;
                }
                Some(raw) => match raw.parse::<Month>() {
                    Ok(month) => month,
                    Err(err) => {
                        result.record_failure(Some(raw), err.to_string());
                        continue;
                    }
                },
            };

            if let Err(err) = self.guard.validate_parameters(&row.parameters) {
                result.record_failure(month_raw, err.to_string());
                continue;
            }

            let record = self.scored_record(MetricsSubmission {
                site_id: site_id.clone(),
                month,
                year,
                parameters: row.parameters,
            });

            match self.repository.upsert(record) {
                Ok(_) => result.record_success(),
                Err(err) => result.record_failure(month_raw, err.to_string()),
            }
        }

        Ok(result)
    }

    fn scored_record(&self, submission: MetricsSubmission) -> MetricRecord {
        let scored = self.engine.score(&submission.parameters);

        let mut parameters = BTreeMap::new();
        for parameter in &scored.parameters {
            parameters.insert(
                parameter.key,
                ParameterEntry {
                    target: parameter.target,
                    actual: parameter.actual,
                    stored_score: parameter.stored_score,
                },
            );
        }

        MetricRecord {
            site_id: submission.site_id,
            month: submission.month,
            year: submission.year,
            parameters,
            total_score: scored.summary.total_score,
            percentage: scored.summary.percentage,
            rating: scored.summary.rating,
            updated_at: Utc::now(),
        }
    }
}

/// Read-model returned to the API: the persisted record with its re-derived
/// aggregate plus the ephemeral KPI snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRecordView {
    #[serde(flatten)]
    pub record: MetricRecord,
    pub kpis: DerivedKpiSnapshot,
}

/// Error raised by the metrics service.
#[derive(Debug, thiserror::Error)]
pub enum MetricsServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
