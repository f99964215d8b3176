use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::parser::{CsvRow, ParsedCsv};
use super::{BatchIssue, BatchValidationResult};
use crate::compliance::engine::{normalize_status, ComplianceEngine};
use crate::FieldMap;

pub const REQUIRED_COLUMNS: &[&str] = &["customer_id"];

pub const OPTIONAL_COLUMNS: &[&str] = &[
    "loan_amount",
    "loan_term_months",
    "monthly_income",
    "monthly_expenses",
    "savings_balance",
    "checking_balance",
    "total_debt",
    "credit_utilization_ratio",
    "credit_history_length",
    "number_of_credit_accounts",
    "payment_history_score",
    "number_of_late_payments",
    "number_of_defaults",
    "employment_status",
    "years_employed",
    "age",
    "phone_number",
    "id_number",
    "region",
    "urban_rural",
];

pub const NUMERIC_COLUMNS: &[&str] = &[
    "loan_amount",
    "loan_term_months",
    "monthly_income",
    "monthly_expenses",
    "savings_balance",
    "checking_balance",
    "total_debt",
    "credit_utilization_ratio",
    "credit_history_length",
    "number_of_credit_accounts",
    "payment_history_score",
    "number_of_late_payments",
    "number_of_defaults",
    "years_employed",
    "age",
];

const RECOMMENDED_COLUMNS: &[&str] = &[
    "monthly_income",
    "loan_amount",
    "years_employed",
    "age",
    "phone_number",
];

const EMPLOYMENT_STATUSES: &[&str] = &["employed", "self_employed", "unemployed", "retired"];
const LOCATION_TYPES: &[&str] = &["urban", "rural"];
const MAX_CUSTOMER_ID_LEN: usize = 50;
const LARGE_BATCH_ROWS: usize = 10_000;

static PHONE_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
static NATIONAL_ID_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn matches(pattern: &'static OnceLock<Option<Regex>>, source: &str, text: &str) -> bool {
    pattern
        .get_or_init(|| Regex::new(source).ok())
        .as_ref()
        .is_some_and(|regex| regex.is_match(text))
}

fn is_phone_number(text: &str) -> bool {
    matches(&PHONE_PATTERN, r"^(\+251|0)[0-9]{9}$", text)
}

fn is_national_id(text: &str) -> bool {
    matches(&NATIONAL_ID_PATTERN, r"^[0-9]{10}$", text)
}

/// Applies header, cell and compliance checks to every parsed row.
#[derive(Debug, Clone, Default)]
pub struct BatchValidator {
    engine: ComplianceEngine,
}

#[derive(Default)]
struct RowReport {
    errors: Vec<BatchIssue>,
    warnings: Vec<BatchIssue>,
}

impl BatchValidator {
    pub fn new(engine: ComplianceEngine) -> Self {
        Self { engine }
    }

    pub fn validate(&self, parsed: &ParsedCsv) -> BatchValidationResult {
        let mut result = BatchValidationResult::default();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !parsed.fields.iter().any(|field| field == column))
            .collect();
        if !missing.is_empty() {
            result.errors.push(BatchIssue::new(
                0,
                "header",
                format!("Missing required columns: {}", missing.join(", ")),
            ));
        }

        let absent: Vec<&str> = RECOMMENDED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !parsed.fields.iter().any(|field| field == column))
            .collect();
        if !parsed.fields.is_empty() && !absent.is_empty() {
            result.warnings.push(BatchIssue::new(
                0,
                "header",
                format!("Recommended columns missing: {}", absent.join(", ")),
            ));
        }

        if parsed.rows.is_empty() && parsed.errors.is_empty() {
            result
                .errors
                .push(BatchIssue::new(0, "file", "No data rows found"));
        } else if parsed.rows.len() > LARGE_BATCH_ROWS {
            result.warnings.push(BatchIssue::new(
                0,
                "file",
                format!(
                    "Large batch of {} rows (over {LARGE_BATCH_ROWS}) may take longer to process",
                    parsed.rows.len()
                ),
            ));
        }

        for row in &parsed.rows {
            let report = self.validate_row(row);
            if report.errors.is_empty() {
                result.valid_rows += 1;
            } else {
                result.invalid_rows += 1;
                result.errors.extend(report.errors);
            }
            result.warnings.extend(report.warnings);
        }

        result.errors.extend(parsed.errors.iter().cloned());
        result.valid = result.errors.is_empty();

        info!(
            rows = result.total_rows(),
            valid_rows = result.valid_rows,
            invalid_rows = result.invalid_rows,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "batch validated"
        );
        result
    }

    fn validate_row(&self, row: &CsvRow) -> RowReport {
        let line = row.line;
        let mut report = RowReport::default();
        let mut fields = FieldMap::new();

        for column in REQUIRED_COLUMNS {
            if row.cell(column).is_none() {
                report.errors.push(
                    BatchIssue::new(
                        line,
                        *column,
                        format!("Required field '{column}' is missing or empty"),
                    )
                    .with_value(row.cells.get(*column).cloned().unwrap_or_default()),
                );
            }
        }

        if let Some(customer_id) = row.cell("customer_id") {
            if customer_id.chars().count() > MAX_CUSTOMER_ID_LEN {
                report.errors.push(
                    BatchIssue::new(
                        line,
                        "customer_id",
                        "Customer ID must be between 1 and 50 characters",
                    )
                    .with_value(customer_id),
                );
            }
        }

        if let Some(phone) = row.cell("phone_number") {
            if !is_phone_number(phone) {
                report.errors.push(
                    BatchIssue::new(
                        line,
                        "phone_number",
                        "Invalid Ethiopian phone number format. Expected: +251XXXXXXXXX or 0XXXXXXXXX",
                    )
                    .with_value(phone),
                );
            }
        }

        if let Some(id_number) = row.cell("id_number") {
            if !is_national_id(id_number) {
                report.errors.push(
                    BatchIssue::new(
                        line,
                        "id_number",
                        "Invalid Ethiopian ID number format. Expected: 10 digits",
                    )
                    .with_value(id_number),
                );
            }
        }

        for column in NUMERIC_COLUMNS {
            let Some(cell) = row.cell(column) else {
                continue;
            };
            let number = match cell.parse::<f64>() {
                Ok(number) if number.is_finite() => number,
                _ => {
                    report.errors.push(
                        BatchIssue::new(
                            line,
                            *column,
                            format!("Field '{column}' must be a valid number"),
                        )
                        .with_value(cell),
                    );
                    continue;
                }
            };

            if self.check_range(line, column, number, &mut report) {
                fields.insert(column.to_string(), json!(number));
            }
        }

        if let Some(status) = row.cell("employment_status") {
            if EMPLOYMENT_STATUSES.contains(&normalize_status(status).as_str()) {
                fields.insert("employment_status".into(), Value::String(status.to_string()));
            } else {
                report.errors.push(
                    BatchIssue::new(
                        line,
                        "employment_status",
                        format!(
                            "Invalid employment status. Must be one of: {}",
                            EMPLOYMENT_STATUSES.join(", ")
                        ),
                    )
                    .with_value(status),
                );
            }
        }

        if let Some(location) = row.cell("urban_rural") {
            if !LOCATION_TYPES.contains(&location.to_lowercase().as_str()) {
                report.errors.push(
                    BatchIssue::new(
                        line,
                        "urban_rural",
                        format!(
                            "Invalid location type. Must be one of: {}",
                            LOCATION_TYPES.join(", ")
                        ),
                    )
                    .with_value(location),
                );
            }
        }

        let compliance = self.engine.evaluate_core(&fields);
        report.errors.extend(compliance.violations.into_iter().map(|issue| BatchIssue {
            row: line,
            field: issue.field,
            message: issue.message,
            value: issue.value,
        }));
        report.warnings.extend(compliance.warnings.into_iter().map(|issue| BatchIssue {
            row: line,
            field: issue.field,
            message: issue.message,
            value: issue.value,
        }));

        debug!(
            row = line,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "batch row checked"
        );
        report
    }

    /// Column-specific bounds. Returns whether the value may feed the compliance checks.
    fn check_range(&self, line: u64, column: &str, number: f64, report: &mut RowReport) -> bool {
        match column {
            "loan_amount" if !(1_000.0..=5_000_000.0).contains(&number) => {
                report.warnings.push(
                    BatchIssue::new(
                        line,
                        column,
                        format!(
                            "Loan amount {number} is outside NBE limits (1,000 - 5,000,000 ETB)"
                        ),
                    )
                    .with_value(number),
                );
                true
            }
            "loan_term_months" if !(1.0..=60.0).contains(&number) => {
                report.errors.push(
                    BatchIssue::new(
                        line,
                        column,
                        format!("Loan term {number} is outside NBE limits (1 - 60 months)"),
                    )
                    .with_value(number),
                );
                false
            }
            "payment_history_score" if !(0.0..=100.0).contains(&number) => {
                report.errors.push(
                    BatchIssue::new(
                        line,
                        column,
                        "Payment history score must be between 0 and 100",
                    )
                    .with_value(number),
                );
                false
            }
            _ => true,
        }
    }
}
