use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::ParameterKey;
use super::engine::Rating;

/// Calendar month of a submission. Ordering matches the calendar so listings
/// come back January-first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Parse a canonical month name, tolerating surrounding whitespace and
    /// letter case but nothing else.
    pub fn from_name(value: &str) -> Option<Month> {
        let trimmed = value.trim();
        Month::ALL
            .iter()
            .copied()
            .find(|month| month.name().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = InvalidMonth;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Month::from_name(value).ok_or_else(|| InvalidMonth(value.trim().to_string()))
    }
}

/// Raised when a month string is not one of the twelve canonical names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid month \"{0}\"")]
pub struct InvalidMonth(pub String);

/// Opaque site identifier assigned by the tenant-administration layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SiteId(pub String);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One raw target/actual pair as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetActual {
    pub target: f64,
    pub actual: f64,
}

/// Inbound payload for one site-month of raw metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSubmission {
    pub site_id: SiteId,
    pub month: Month,
    pub year: i32,
    /// Parameters omitted from the map earn no points and are not stored.
    pub parameters: BTreeMap<ParameterKey, TargetActual>,
}

/// Stored state of one parameter inside a persisted record: the raw pair and
/// the legacy 0-10 storage-scale score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub target: f64,
    pub actual: f64,
    pub stored_score: f64,
}

/// One site's scored submission for a calendar month/year.
///
/// Identity is `(site_id, month, year)`; re-submission replaces the record.
/// Aggregate fields are derived at scoring time and can be re-derived exactly
/// from the stored per-parameter scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    pub site_id: SiteId,
    pub month: Month,
    pub year: i32,
    pub parameters: BTreeMap<ParameterKey, ParameterEntry>,
    pub total_score: f64,
    pub percentage: f64,
    pub rating: Rating,
    pub updated_at: DateTime<Utc>,
}

impl MetricRecord {
    pub fn actual(&self, key: ParameterKey) -> f64 {
        self.parameters.get(&key).map(|entry| entry.actual).unwrap_or(0.0)
    }

    pub fn target(&self, key: ParameterKey) -> f64 {
        self.parameters.get(&key).map(|entry| entry.target).unwrap_or(0.0)
    }
}
