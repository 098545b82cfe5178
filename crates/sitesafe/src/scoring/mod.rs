//! Monthly safety-performance scoring.
//!
//! A submission carries target/actual pairs for the parameters in the
//! injected [`catalog::ParameterCatalog`]. The engine converts each pair to
//! points under its policy, sums them into the weighted 0-100 aggregate, and
//! the KPI module derives the dashboard ratios from the same raw values. The
//! service facade wires the boundary guard, engine, and repository together
//! for the HTTP layer.

pub mod bulk;
pub mod catalog;
pub mod domain;
pub mod engine;
pub mod kpi;
pub mod repository;
pub mod router;
pub mod service;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod tests;

pub use bulk::{BulkImportResult, BulkRow, BulkRowError, CsvImportError};
pub use catalog::{CatalogError, ParameterCatalog, ParameterDefinition, ParameterKey, ScoringPolicy};
pub use domain::{
    InvalidMonth, MetricRecord, MetricsSubmission, Month, ParameterEntry, SiteId, TargetActual,
};
pub use engine::{score_parameter, Rating, ScoreSummary, ScoredMetrics, ScoredParameter, ScoringEngine};
pub use kpi::{derive_kpis, DerivedKpiSnapshot, DerivedKpis, KpiTotals};
pub use repository::{MetricsRepository, RepositoryError};
pub use router::metrics_router;
pub use service::{MetricRecordView, MetricsService, MetricsServiceError};
pub use validation::{MetricsGuard, ValidationError};
