use proptest::prelude::*;

use super::*;

const HEADER: &str = "customer_id,loan_amount,loan_term_months,monthly_income,employment_status,years_employed,age,phone_number,urban_rural";

fn run(csv: &str) -> BatchValidationResult {
    validate_batch_csv(csv.as_bytes()).expect("readable csv")
}

fn messages(issues: &[BatchIssue]) -> Vec<(u64, &str, &str)> {
    issues
        .iter()
        .map(|issue| (issue.row, issue.field.as_str(), issue.message.as_str()))
        .collect()
}

#[test]
fn clean_upload_is_valid() {
    let csv = format!(
        "{HEADER}\nC-1,120000,24,30000,employed,4,34,0911223344,Urban\nC-2,50000,12,20000,Self_Employed,2,29,+251911223344,rural\n"
    );
    let result = run(&csv);

    assert!(result.valid, "unexpected errors: {:?}", result.errors);
    assert_eq!(result.valid_rows, 2);
    assert_eq!(result.invalid_rows, 0);
    assert_eq!(result.summary(), "Total rows: 2 | Valid: 2 | Invalid: 0");
}

#[test]
fn missing_customer_column_is_a_header_error() {
    let result = run("loan_amount,monthly_income,years_employed,age,phone_number\n5000,9000,1,30,0911223344\n");

    assert!(!result.valid);
    assert_eq!(
        messages(&result.errors)[0],
        (0, "header", "Missing required columns: customer_id")
    );
    // the row itself also lacks a customer id
    assert_eq!(result.invalid_rows, 1);
}

#[test]
fn recommended_columns_are_a_warning() {
    let result = run("customer_id,loan_amount\nC-1,5000\n");

    assert!(result.valid);
    assert_eq!(
        messages(&result.warnings),
        [(
            0,
            "header",
            "Recommended columns missing: monthly_income, years_employed, age, phone_number"
        )]
    );
}

#[test]
fn header_only_upload_has_no_rows() {
    let result = run(&format!("{HEADER}\n"));
    assert!(!result.valid);
    assert_eq!(messages(&result.errors), [(0, "file", "No data rows found")]);
}

#[test]
fn cell_errors_are_scoped_to_their_row() {
    let csv = format!(
        "{HEADER}\nC-1,abc,24,30000,employed,4,34,12345,suburban\nC-2,50000,72,20000,freelance,2,29,0911223344,urban\n"
    );
    let result = run(&csv);

    assert_eq!(result.valid_rows, 0);
    assert_eq!(result.invalid_rows, 2);
    assert_eq!(
        messages(&result.errors),
        [
            (
                2,
                "phone_number",
                "Invalid Ethiopian phone number format. Expected: +251XXXXXXXXX or 0XXXXXXXXX"
            ),
            (2, "loan_amount", "Field 'loan_amount' must be a valid number"),
            (2, "urban_rural", "Invalid location type. Must be one of: urban, rural"),
            (3, "loan_term_months", "Loan term 72 is outside NBE limits (1 - 60 months)"),
            (
                3,
                "employment_status",
                "Invalid employment status. Must be one of: employed, self_employed, unemployed, retired"
            ),
        ]
    );
}

#[test]
fn compliance_rules_run_per_row() {
    let csv = format!(
        "{HEADER}\nC-1,200000,12,30000,employed,4,34,0911223344,urban\nC-2,60000,12,18000,retired,30,50,0911223344,urban\nC-3,500,12,18000,employed,0.25,30,0911223344,urban\n"
    );
    let result = run(&csv);

    assert_eq!(
        messages(&result.errors),
        [
            (
                2,
                "loan_amount",
                "Total monthly payment (16666.67 ETB) exceeds 1/3 of monthly income (10000.00 ETB) - NBE compliance violation"
            ),
            (3, "age", "Retirement status typically requires age 55 or older"),
        ]
    );
    assert_eq!(result.valid_rows, 1);

    let row_four: Vec<&str> = result
        .warnings
        .iter()
        .filter(|warning| warning.row == 4)
        .map(|warning| warning.field.as_str())
        .collect();
    assert_eq!(row_four, ["loan_amount", "employment_status"]);
}

#[test]
fn unemployed_row_with_income_is_invalid_without_tenure_column() {
    let result = run("customer_id,employment_status,monthly_income\nC-1,unemployed,5000\n");

    assert_eq!(result.valid_rows, 0);
    assert_eq!(result.invalid_rows, 1);
    assert_eq!(
        messages(&result.errors),
        [(
            2,
            "employment_status",
            "Cannot have monthly income if employment status is unemployed"
        )]
    );
}

#[test]
fn malformed_rows_are_reported_after_row_errors() {
    let csv = format!("{HEADER}\nC-1,5000\n,5000,12,30000,employed,4,34,0911223344,urban\n");
    let result = run(&csv);

    assert_eq!(
        messages(&result.errors),
        [
            (3, "customer_id", "Required field 'customer_id' is missing or empty"),
            (2, "unknown", "Column count mismatch: expected 9, got 2"),
        ]
    );
    assert_eq!(
        result.summary(),
        "Total rows: 1 | Valid: 0 | Invalid: 1 | Errors: 2"
    );
}

#[test]
fn overlong_customer_id_is_rejected() {
    let id = "C".repeat(51);
    let result = run(&format!("customer_id\n{id}\n"));
    assert_eq!(
        result.errors[0].message,
        "Customer ID must be between 1 and 50 characters"
    );
}

#[test]
fn result_serializes_with_camel_case_counts() {
    let result = run("customer_id,id_number\nC-1,12345\n");
    let json = serde_json::to_value(&result).expect("serializable");
    assert_eq!(json["validRows"], 0);
    assert_eq!(json["invalidRows"], 1);
    assert_eq!(json["errors"][0]["value"], "12345");
}

fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,7}",
        "-?[0-9]{1,3}\\.[0-9]",
        "[a-z_]{0,8}",
        Just("employed".to_string()),
        Just("0911223344".to_string()),
    ]
}

proptest! {
    #[test]
    fn validation_is_idempotent(rows in proptest::collection::vec(proptest::collection::vec(cell(), 1..10), 0..12)) {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for row in &rows {
            csv.push_str(&row.join(","));
            csv.push('\n');
        }

        let parsed = parse_csv(csv.as_bytes()).expect("readable csv");
        let validator = BatchValidator::default();
        let first = serde_json::to_string(&validator.validate(&parsed)).expect("json");
        let second = serde_json::to_string(&validator.validate(&parsed)).expect("json");
        prop_assert_eq!(first, second);
    }
}
