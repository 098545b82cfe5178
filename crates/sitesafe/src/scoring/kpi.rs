//! Derived safety-KPI ratios.
//!
//! Recomputed from raw actuals on every read, never persisted. Each ratio
//! guards its own denominator and yields 0 when it would divide by zero.

use serde::Serialize;

use super::catalog::ParameterKey;
use super::domain::MetricRecord;

/// OSHA-style normalization base for TRIR: incidents per 200,000 work hours.
const TRIR_HOURS_BASE: f64 = 200_000.0;
/// LTIFR base: lost-time injuries per 1,000,000 work hours.
const LTIFR_HOURS_BASE: f64 = 1_000_000.0;

/// Full-precision KPI values for one record. Use [`DerivedKpis::rounded`] for
/// the 2-decimal presentation form; keep full precision when aggregating
/// across months.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedKpis {
    pub trir: f64,
    pub ltifr: f64,
    pub near_miss_rate: f64,
    pub safety_inspection_completion: f64,
    pub ppe_compliance_rate: f64,
}

impl DerivedKpis {
    pub fn rounded(&self) -> DerivedKpiSnapshot {
        DerivedKpiSnapshot {
            trir: round2(self.trir),
            ltifr: round2(self.ltifr),
            near_miss_rate: round2(self.near_miss_rate),
            safety_inspection_completion: round2(self.safety_inspection_completion),
            ppe_compliance_rate: round2(self.ppe_compliance_rate),
        }
    }
}

/// Display form of the derived KPIs, rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedKpiSnapshot {
    pub trir: f64,
    pub ltifr: f64,
    pub near_miss_rate: f64,
    pub safety_inspection_completion: f64,
    pub ppe_compliance_rate: f64,
}

/// Compute the industry-standard ratios from a record's raw values.
pub fn derive_kpis(record: &MetricRecord) -> DerivedKpis {
    let safe_work_hours = record.actual(ParameterKey::SafeWorkHours);
    let man_days = record.actual(ParameterKey::ManDays);
    let inspection_target = record.target(ParameterKey::FormalSafetyInspection);

    DerivedKpis {
        trir: ratio_or_zero(
            record.actual(ParameterKey::RecordableIncidents) * TRIR_HOURS_BASE,
            safe_work_hours,
        ),
        ltifr: ratio_or_zero(
            record.actual(ParameterKey::LostTimeInjury) * LTIFR_HOURS_BASE,
            safe_work_hours,
        ),
        // Man-days stands in for headcount here, matching the legacy reports.
        near_miss_rate: ratio_or_zero(
            record.actual(ParameterKey::NearMissReport) * 100.0,
            man_days,
        ),
        safety_inspection_completion: ratio_or_zero(
            record.actual(ParameterKey::FormalSafetyInspection) * 100.0,
            inspection_target,
        ),
        // Already a percentage; passed through untouched.
        ppe_compliance_rate: record.actual(ParameterKey::PpeComplianceRate),
    }
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Cross-month raw totals backing the dashboard KPI cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KpiTotals {
    pub man_days: f64,
    pub safe_work_hours: f64,
    pub lost_time_injuries: f64,
    pub near_miss_reports: f64,
}

impl KpiTotals {
    pub fn accumulate<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MetricRecord>,
    {
        let mut totals = KpiTotals::default();
        for record in records {
            totals.man_days += record.actual(ParameterKey::ManDays);
            totals.safe_work_hours += record.actual(ParameterKey::SafeWorkHours);
            totals.lost_time_injuries += record.actual(ParameterKey::LostTimeInjury);
            totals.near_miss_reports += record.actual(ParameterKey::NearMissReport);
        }
        totals
    }
}
