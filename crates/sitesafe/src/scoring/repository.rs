use super::domain::{MetricRecord, Month, SiteId};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// `upsert` replaces any existing record for the same `(site, month, year)`
/// key; concurrent writers race with last-write-wins semantics, which is all
/// the reporting flow requires.
pub trait MetricsRepository: Send + Sync {
    fn upsert(&self, record: MetricRecord) -> Result<MetricRecord, RepositoryError>;
    fn fetch(
        &self,
        site_id: &SiteId,
        year: i32,
        month: Month,
    ) -> Result<Option<MetricRecord>, RepositoryError>;
    /// Records for one site/year, ordered by calendar month.
    fn list_for_site(&self, site_id: &SiteId, year: i32)
        -> Result<Vec<MetricRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
