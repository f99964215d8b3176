use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::{BatchError, BatchIssue};

/// One data row keyed by normalised column name. `line` is the file line the row starts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    pub line: u64,
    pub cells: BTreeMap<String, String>,
}

impl CsvRow {
    /// Trimmed cell text; blank cells read as absent.
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// A parsed upload: normalised header, well-formed rows and row-scoped parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedCsv {
    pub fields: Vec<String>,
    pub rows: Vec<CsvRow>,
    pub errors: Vec<BatchIssue>,
}

/// `Monthly Income ` -> `monthly_income`.
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

pub fn parse_csv<R: Read>(reader: R) -> Result<ParsedCsv, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let fields: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut parsed = ParsedCsv {
        fields,
        ..Default::default()
    };
    if parsed.fields.iter().all(String::is_empty) {
        parsed.fields.clear();
        return Ok(parsed);
    }

    for (index, result) in csv_reader.records().enumerate() {
        let fallback_line = index as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err
                    .position()
                    .map(|position| position.line())
                    .unwrap_or(fallback_line);
                parsed.errors.push(BatchIssue::new(
                    line,
                    "unknown",
                    format!("Failed to parse row: {err}"),
                ));
                continue;
            }
        };

        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or(fallback_line);

        if record.len() != parsed.fields.len() {
            parsed.errors.push(BatchIssue::new(
                line,
                "unknown",
                format!(
                    "Column count mismatch: expected {}, got {}",
                    parsed.fields.len(),
                    record.len()
                ),
            ));
            continue;
        }

        let cells = parsed
            .fields
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        parsed.rows.push(CsvRow { line, cells });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_normalised() {
        assert_eq!(normalize_header("  Monthly   Income "), "monthly_income");
        assert_eq!(normalize_header("Customer_ID"), "customer_id");
    }

    #[test]
    fn mismatched_rows_become_row_errors() {
        let data = "Customer ID,Loan Amount\nC-1,5000\nC-2\n\nC-3,\"7,500\"\n";
        let parsed = parse_csv(data.as_bytes()).expect("parsed");

        assert_eq!(parsed.fields, ["customer_id", "loan_amount"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].line, 5);
        assert_eq!(parsed.rows[1].cell("loan_amount"), Some("7,500"));
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 3);
        assert_eq!(
            parsed.errors[0].message,
            "Column count mismatch: expected 2, got 1"
        );
    }

    #[test]
    fn empty_input_has_no_fields() {
        let parsed = parse_csv("".as_bytes()).expect("parsed");
        assert!(parsed.fields.is_empty());
        assert!(parsed.rows.is_empty());
    }
}
