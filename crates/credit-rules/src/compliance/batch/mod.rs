//! Bulk applicant uploads: CSV parsing and per-row validation.

mod parser;
mod rules;

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use parser::{normalize_header, parse_csv, CsvRow, ParsedCsv};
pub use rules::{BatchValidator, NUMERIC_COLUMNS, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read batch file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable CSV header: {0}")]
    Csv(#[from] csv::Error),
}

/// A row-scoped error or warning. Row 0 refers to the file as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchIssue {
    pub row: u64,
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl BatchIssue {
    pub fn new(row: u64, field: impl Into<String>, message: impl Into<String>) -> Self {
        BatchIssue {
            row,
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchValidationResult {
    pub valid: bool,
    pub errors: Vec<BatchIssue>,
    pub warnings: Vec<BatchIssue>,
    pub valid_rows: usize,
    pub invalid_rows: usize,
}

impl BatchValidationResult {
    pub fn total_rows(&self) -> usize {
        self.valid_rows + self.invalid_rows
    }

    /// One-line summary; error and warning counts appear only when non-zero.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("Total rows: {}", self.total_rows()),
            format!("Valid: {}", self.valid_rows),
            format!("Invalid: {}", self.invalid_rows),
        ];
        if !self.errors.is_empty() {
            parts.push(format!("Errors: {}", self.errors.len()));
        }
        if !self.warnings.is_empty() {
            parts.push(format!("Warnings: {}", self.warnings.len()));
        }
        parts.join(" | ")
    }
}

/// Parse and validate an upload with the default compliance thresholds.
pub fn validate_batch_csv<R: Read>(reader: R) -> Result<BatchValidationResult, BatchError> {
    let parsed = parse_csv(reader)?;
    Ok(BatchValidator::default().validate(&parsed))
}

pub fn validate_batch_file<P: AsRef<Path>>(path: P) -> Result<BatchValidationResult, BatchError> {
    let file = std::fs::File::open(path)?;
    validate_batch_csv(file)
}

#[cfg(test)]
mod tests;
