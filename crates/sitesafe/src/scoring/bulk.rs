use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::catalog::ParameterKey;
use super::domain::TargetActual;

/// One raw month row of a bulk import, before validation or scoring.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkRow {
    /// Raw month cell as supplied; resolved against the canonical month
    /// names during import.
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub parameters: BTreeMap<ParameterKey, TargetActual>,
    /// Cell-level problem found while parsing a CSV row. Never set for JSON
    /// rows; serde ignores it on input.
    #[serde(skip)]
    pub issue: Option<String>,
}

/// Failure detail for one rejected row, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkRowError {
    pub month: String,
    pub error: String,
}

/// Transient summary of one batch: `success + failed` equals the row count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkImportResult {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<BulkRowError>,
}

impl BulkImportResult {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, month: Option<&str>, error: impl Into<String>) {
        self.failed += 1;
        self.errors.push(BulkRowError {
            month: month
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or("unknown")
                .to_string(),
            error: error.into(),
        });
    }
}

/// Document-level CSV failures. Cell-level problems are captured per row
/// instead so one bad cell never aborts the batch.
#[derive(Debug, thiserror::Error)]
pub enum CsvImportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("import file has no Month column")]
    MissingMonthColumn,
}

/// Parse a bulk-import CSV document into raw rows.
///
/// Headers follow the distributed template: a `Month` column plus
/// `<Parameter>Target` / `<Parameter>Actual` pairs. Unknown columns are
/// ignored and a parameter whose cells are both empty is simply omitted from
/// the row.
pub fn parse_csv_rows<R: Read>(reader: R) -> Result<Vec<BulkRow>, CsvImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let month_index = headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case("Month"))
        .ok_or(CsvImportError::MissingMonthColumn)?;

    let columns: Vec<(ParameterKey, Option<usize>, Option<usize>)> = ParameterKey::ALL
        .iter()
        .map(|&key| {
            let label = key.column_label();
            let target = find_column(&headers, label, "Target");
            let actual = find_column(&headers, label, "Actual");
            (key, target, actual)
        })
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(parse_row(&record, month_index, &columns));
    }

    Ok(rows)
}

fn find_column(headers: &csv::StringRecord, label: &str, suffix: &str) -> Option<usize> {
    headers.iter().position(|header| {
        // The split point must land on a char boundary; headers with
        // multi-byte characters are simply unknown columns.
        header.len() == label.len() + suffix.len()
            && header.is_char_boundary(label.len())
            && header[..label.len()].eq_ignore_ascii_case(label)
            && header[label.len()..].eq_ignore_ascii_case(suffix)
    })
}

fn parse_row(
    record: &csv::StringRecord,
    month_index: usize,
    columns: &[(ParameterKey, Option<usize>, Option<usize>)],
) -> BulkRow {
    let month = record
        .get(month_index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let mut parameters = BTreeMap::new();
    let mut issue = None;

    for &(key, target_index, actual_index) in columns {
        let target_cell = cell(record, target_index);
        let actual_cell = cell(record, actual_index);

        if target_cell.is_none() && actual_cell.is_none() {
            continue;
        }

        let target = match parse_cell(target_cell, key, "Target") {
            Ok(value) => value,
            Err(message) => {
                issue.get_or_insert(message);
                continue;
            }
        };
        let actual = match parse_cell(actual_cell, key, "Actual") {
            Ok(value) => value,
            Err(message) => {
                issue.get_or_insert(message);
                continue;
            }
        };

        parameters.insert(key, TargetActual { target, actual });
    }

    BulkRow {
        month,
        parameters,
        issue,
    }
}

fn cell<'a>(record: &'a csv::StringRecord, index: Option<usize>) -> Option<&'a str> {
    index
        .and_then(|index| record.get(index))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_cell(cell: Option<&str>, key: ParameterKey, suffix: &str) -> Result<f64, String> {
    // An empty cell next to a populated sibling reads as zero, matching how
    // the template has always been filled in.
    let Some(raw) = cell else {
        return Ok(0.0);
    };

    raw.parse::<f64>()
        .map_err(|_| format!("{}{}: Must be a number", key.column_label(), suffix))
}
