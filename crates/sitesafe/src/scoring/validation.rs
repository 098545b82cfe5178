use std::collections::BTreeMap;

use super::catalog::ParameterKey;
use super::domain::{MetricsSubmission, TargetActual};

/// Rejections raised at the submission boundary, before any scoring runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{column}: Must be a number")]
    NotANumber { column: String },
    #[error("{column}: Cannot be negative")]
    Negative { column: String },
    #[error("year {year} is outside the supported reporting range")]
    YearOutOfRange { year: i32 },
}

const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

/// Boundary guard for raw metric values.
///
/// The scoring engine itself is total over well-formed input and performs no
/// validation; everything reaching it has passed through here first.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsGuard;

impl MetricsGuard {
    pub fn validate_submission(&self, submission: &MetricsSubmission) -> Result<(), ValidationError> {
        self.validate_year(submission.year)?;
        self.validate_parameters(&submission.parameters)
    }

    pub fn validate_year(&self, year: i32) -> Result<(), ValidationError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ValidationError::YearOutOfRange { year });
        }
        Ok(())
    }

    pub fn validate_parameters(
        &self,
        parameters: &BTreeMap<ParameterKey, TargetActual>,
    ) -> Result<(), ValidationError> {
        for (key, pair) in parameters {
            check_value(pair.target, key, "Target")?;
            check_value(pair.actual, key, "Actual")?;
        }
        Ok(())
    }
}

fn check_value(value: f64, key: &ParameterKey, suffix: &str) -> Result<(), ValidationError> {
    let column = || format!("{}{}", key.column_label(), suffix);

    if !value.is_finite() {
        return Err(ValidationError::NotANumber { column: column() });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { column: column() });
    }
    Ok(())
}
